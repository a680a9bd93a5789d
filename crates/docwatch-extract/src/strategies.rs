//! Ordered extraction strategies with a first-match-wins runner.
//!
//! Each strategy is a pure `markup -> Option<ExtractionResult>` function.
//! The runner tries them in fixed order and returns the first result; when
//! every strategy comes up empty the page is reported as `Unavailable`,
//! which is a normal outcome, not an error.

use docwatch_core::StatusVocabulary;

use crate::error::ExtractError;
use crate::html;
use crate::types::{ExtractionResult, StatusRecord};

/// Attribute substrings that mark likely result/status containers.
const CONTAINER_HINTS: &[&str] = &["result", "status", "alert", "log", "card-body"];

/// Window around a strong-phrase match in the full-document scan.
const SCAN_WINDOW_BEFORE: usize = 500;
const SCAN_WINDOW_AFTER: usize = 1500;

/// Minimum cleaned-text length for a full-document window to count as a
/// real status message rather than a stray menu entry.
const MIN_SCAN_TEXT_LEN: usize = 100;

/// Tunables for the extraction strategies.
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    /// Text length at which a candidate container is accepted even without
    /// a strong status phrase.
    pub min_container_len: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            min_container_len: 100,
        }
    }
}

type Strategy = fn(&str, &StatusVocabulary, ExtractOptions) -> Option<ExtractionResult>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("table-scan", scan_tables),
    ("container-scan", scan_containers),
    ("document-scan", scan_document),
];

/// Runs the strategy chain over one page.
///
/// # Errors
///
/// Returns [`ExtractError::Parse`] only when `page` is not valid UTF-8.
/// "Nothing found" is reported as [`ExtractionResult::unavailable`].
pub fn extract(
    page: &[u8],
    vocab: &StatusVocabulary,
    opts: ExtractOptions,
) -> Result<ExtractionResult, ExtractError> {
    let markup = std::str::from_utf8(page).map_err(|e| ExtractError::Parse { source: e })?;

    for (name, strategy) in STRATEGIES {
        if let Some(result) = strategy(markup, vocab, opts) {
            tracing::debug!(strategy = name, kind = %result.kind, "extraction strategy matched");
            return Ok(result);
        }
        tracing::trace!(strategy = name, "strategy found nothing, trying next");
    }

    tracing::debug!("no strategy matched; reporting unavailable");
    Ok(ExtractionResult::unavailable())
}

/// Strategy 1: structured table scan.
///
/// A table is relevant if its text mentions any vocabulary keyword. Data
/// rows (`<td>` cells) yield one [`StatusRecord`] from the first two
/// non-empty cell texts; `<th>`-only header rows are skipped. Succeeds only
/// if at least one well-formed record comes out.
fn scan_tables(
    markup: &str,
    vocab: &StatusVocabulary,
    _opts: ExtractOptions,
) -> Option<ExtractionResult> {
    for table in html::table_bodies(markup) {
        let table_text = html::strip_tags(table);
        if !vocab.contains_keyword(&table_text) {
            continue;
        }

        let mut records = Vec::new();
        for row in html::row_bodies(table) {
            if html::is_header_row(row) {
                continue;
            }
            let cells: Vec<String> = html::data_cells(row)
                .into_iter()
                .filter(|c| !c.is_empty())
                .collect();
            if cells.len() >= 2 {
                let mut it = cells.into_iter();
                records.push(StatusRecord {
                    label: it.next().unwrap_or_default(),
                    date: it.next().unwrap_or_default(),
                });
            }
        }

        if !records.is_empty() {
            tracing::debug!(rows = records.len(), "status table parsed");
            return Some(ExtractionResult::structured(records));
        }
        tracing::trace!("keyword-bearing table had no well-formed rows");
    }
    None
}

/// Strategy 2: container scan.
///
/// Accepts the first element whose `id`/`class` matches the result/status
/// heuristics and whose text either carries a strong status phrase or
/// exceeds the configured length threshold.
fn scan_containers(
    markup: &str,
    vocab: &StatusVocabulary,
    opts: ExtractOptions,
) -> Option<ExtractionResult> {
    for container in html::candidate_containers(markup, CONTAINER_HINTS) {
        if container.text.is_empty() {
            continue;
        }
        let has_strong_phrase = vocab
            .strong_phrases()
            .any(|p| html::find_case_insensitive(&container.text, p).is_some());
        if has_strong_phrase || container.text.chars().count() > opts.min_container_len {
            tracing::debug!(
                marker = %container.marker,
                len = container.text.len(),
                "result container accepted"
            );
            return Some(ExtractionResult::unstructured(container.text));
        }
        tracing::trace!(marker = %container.marker, "container too short, no strong phrase");
    }
    None
}

/// Strategy 3: full-document heuristic scan.
///
/// Anchors on the first strong phrase found anywhere in the raw markup and
/// strips a bounded window of surrounding markup down to text.
fn scan_document(
    markup: &str,
    vocab: &StatusVocabulary,
    _opts: ExtractOptions,
) -> Option<ExtractionResult> {
    for phrase in vocab.strong_phrases() {
        let Some(pos) = html::find_case_insensitive(markup, phrase) else {
            continue;
        };
        let start = html::floor_char_boundary(markup, pos.saturating_sub(SCAN_WINDOW_BEFORE));
        let end = html::floor_char_boundary(markup, pos + SCAN_WINDOW_AFTER);
        let text = html::strip_tags(&markup[start..end]);
        if text.chars().count() > MIN_SCAN_TEXT_LEN {
            tracing::debug!(phrase, "status context found by document scan");
            return Some(ExtractionResult::unstructured(text));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExtractionKind;

    fn vocab() -> StatusVocabulary {
        StatusVocabulary::default()
    }

    fn run(markup: &str) -> ExtractionResult {
        extract(markup.as_bytes(), &vocab(), ExtractOptions::default()).unwrap()
    }

    #[test]
    fn keyword_table_yields_structured_records_in_source_order() {
        let markup = "<html><body><table>\
            <tr><td>Application submitted</td><td>2024-01-01</td></tr>\
            <tr><td>Document issued</td><td>2024-03-15</td></tr>\
            </table></body></html>";
        let result = run(markup);
        assert_eq!(result.kind, ExtractionKind::Structured);
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0].label, "Application submitted");
        assert_eq!(result.records[0].date, "2024-01-01");
        assert_eq!(result.records[1].label, "Document issued");
        assert_eq!(result.records[1].date, "2024-03-15");
    }

    #[test]
    fn header_rows_are_not_records() {
        let markup = "<table>\
            <tr><th>Status</th><th>Date</th></tr>\
            <tr><td>Document issued</td><td>2024-03-15</td></tr>\
            </table>";
        let result = run(markup);
        assert_eq!(result.kind, ExtractionKind::Structured);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].label, "Document issued");
    }

    #[test]
    fn keyword_table_without_well_formed_rows_falls_through() {
        // Relevant table, but every row has a single cell: strategy 1 must
        // fail and the short page has nothing else to offer.
        let markup = "<table><tr><td>Document issued</td></tr></table>";
        let result = run(markup);
        assert_eq!(result.kind, ExtractionKind::Unavailable);
    }

    #[test]
    fn short_result_container_without_keyword_is_unavailable() {
        let markup = r#"<div id="result">No record found</div>"#;
        let result = run(markup);
        assert_eq!(result.kind, ExtractionKind::Unavailable);
        assert_eq!(result.raw_text, crate::types::UNAVAILABLE_DIAGNOSTIC);
    }

    #[test]
    fn container_with_strong_phrase_is_unstructured() {
        let markup = r#"<div class="status-box">Data sent for verification</div>"#;
        let result = run(markup);
        assert_eq!(result.kind, ExtractionKind::Unstructured);
        assert_eq!(result.raw_text, "Data sent for verification");
    }

    #[test]
    fn long_container_without_keyword_is_unstructured() {
        let filler = "word ".repeat(40);
        let markup = format!(r#"<div id="statusResultId">{filler}</div>"#);
        let result = run(&markup);
        assert_eq!(result.kind, ExtractionKind::Unstructured);
        assert!(result.raw_text.starts_with("word word"));
    }

    #[test]
    fn document_scan_extracts_window_around_strong_phrase() {
        let before = "<p>x</p>".repeat(100);
        let after = "<span>detail</span>".repeat(60);
        let markup = format!("{before}<p>Application submitted and queued</p>{after}");
        let result = run(&markup);
        assert_eq!(result.kind, ExtractionKind::Unstructured);
        assert!(result.raw_text.contains("Application submitted and queued"));
    }

    #[test]
    fn empty_page_is_unavailable_not_an_error() {
        assert_eq!(run("").kind, ExtractionKind::Unavailable);
        assert_eq!(run("<<<>>garbage<").kind, ExtractionKind::Unavailable);
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let bad = [0xff, 0xfe, b'<', b'p', b'>'];
        let err = extract(&bad, &vocab(), ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, ExtractError::Parse { .. }));
    }

    #[test]
    fn table_inside_frame_markup_is_still_found() {
        let markup = "<iframe><table>\
            <tr><td>Документ видано</td><td>2024-05-01</td></tr>\
            </table></iframe>";
        let result = run(markup);
        assert_eq!(result.kind, ExtractionKind::Structured);
        assert_eq!(result.records[0].label, "Документ видано");
    }

    #[test]
    fn custom_vocabulary_drives_relevance() {
        let custom: StatusVocabulary = StatusVocabulary {
            keywords: vec![docwatch_core::KeywordEntry {
                phrase: "parcel dispatched".to_string(),
                stage: docwatch_core::StatusStage::Issued,
                strong: true,
            }],
            unavailable_phrases: vec![],
        };
        let markup = "<table><tr><td>parcel dispatched</td><td>today</td></tr></table>";
        let result = extract(markup.as_bytes(), &custom, ExtractOptions::default()).unwrap();
        assert_eq!(result.kind, ExtractionKind::Structured);

        // Same page against the default vocabulary finds nothing.
        let result = run(markup);
        assert_eq!(result.kind, ExtractionKind::Unavailable);
    }
}
