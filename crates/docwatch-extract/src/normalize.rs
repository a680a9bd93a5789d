//! Canonical rendering and comparison normalization.

use crate::types::{ExtractionKind, ExtractionResult};

/// Renders an [`ExtractionResult`] as the canonical, display-ready status
/// string.
///
/// Structured results become a fixed two-column tab-separated table with a
/// `Status\tDate` header, preserving source row order. Unstructured and
/// unavailable results pass their text through verbatim.
#[must_use]
pub fn render_canonical(result: &ExtractionResult) -> String {
    match result.kind {
        ExtractionKind::Structured => {
            let mut out = String::from("Status\tDate");
            for record in &result.records {
                out.push('\n');
                out.push_str(&record.label);
                out.push('\t');
                out.push_str(&record.date);
            }
            out
        }
        ExtractionKind::Unstructured | ExtractionKind::Unavailable => result.raw_text.clone(),
    }
}

/// Collapses every run of whitespace (including newlines) to a single space
/// and trims the ends. Used only for change comparison; the persisted and
/// displayed text is never collapsed.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
