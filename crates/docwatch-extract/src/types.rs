//! Extraction output types.

/// Fixed diagnostic text returned when no strategy finds a status. This text
/// flows through normalization and change detection like any real status, so
/// a monitoring user sees "currently unobtainable" instead of silence.
pub const UNAVAILABLE_DIAGNOSTIC: &str = "Could not extract a document status from the page. \
     The portal may be blocking automated access or the page structure has changed.";

/// One row of the portal's status history: a lifecycle stage label and the
/// date text associated with it. The date is opaque text; the portal does
/// not guarantee a structured format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    pub label: String,
    pub date: String,
}

/// Confidence tier of an extraction attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionKind {
    /// A well-formed status table was found and parsed into records.
    Structured,
    /// A plausible free-text status message was found.
    Unstructured,
    /// No strategy produced a confident result.
    Unavailable,
}

impl ExtractionKind {
    /// Numeric confidence: Structured > Unstructured > Unavailable.
    #[must_use]
    pub fn confidence(self) -> u8 {
        match self {
            ExtractionKind::Structured => 2,
            ExtractionKind::Unstructured => 1,
            ExtractionKind::Unavailable => 0,
        }
    }
}

impl std::fmt::Display for ExtractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionKind::Structured => write!(f, "structured"),
            ExtractionKind::Unstructured => write!(f, "unstructured"),
            ExtractionKind::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// The extractor's output for one page. Created fresh per attempt, never
/// mutated; a fallback attempt supersedes it with a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub kind: ExtractionKind,
    /// Populated in the `Structured` case, in source row order.
    pub records: Vec<StatusRecord>,
    /// Populated in the `Unstructured` and `Unavailable` cases.
    pub raw_text: String,
}

impl ExtractionResult {
    #[must_use]
    pub fn structured(records: Vec<StatusRecord>) -> Self {
        Self {
            kind: ExtractionKind::Structured,
            records,
            raw_text: String::new(),
        }
    }

    #[must_use]
    pub fn unstructured(text: String) -> Self {
        Self {
            kind: ExtractionKind::Unstructured,
            records: Vec::new(),
            raw_text: text,
        }
    }

    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            kind: ExtractionKind::Unavailable,
            records: Vec::new(),
            raw_text: UNAVAILABLE_DIAGNOSTIC.to_string(),
        }
    }
}
