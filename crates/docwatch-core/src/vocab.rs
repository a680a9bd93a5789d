//! Status-keyword vocabulary used by the extraction strategies.
//!
//! The vocabulary is configuration, not parsing logic: strategies only use it
//! for relevance scoring (does this table/container/page mention a known
//! lifecycle phrase?). The built-in default mirrors the phrases the target
//! portal has been observed to use, in English and Ukrainian, and can be
//! replaced wholesale by a YAML file (`DOCWATCH_VOCAB_PATH`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Canonical lifecycle stage a keyword phrase maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusStage {
    Submitted,
    Verification,
    Personalization,
    Produced,
    Arrived,
    Issued,
    /// Phrases like "Status" / "Date" that mark a status table without
    /// naming a specific stage.
    General,
}

/// One phrase the portal uses for a lifecycle stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub phrase: String,
    pub stage: StatusStage,
    /// Strong phrases are specific enough to anchor a full-document scan.
    /// Weak phrases (single words) only score tables and containers.
    #[serde(default)]
    pub strong: bool,
}

/// The full keyword vocabulary plus the phrases that signal a
/// "temporarily unavailable / blocked" page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusVocabulary {
    pub keywords: Vec<KeywordEntry>,
    pub unavailable_phrases: Vec<String>,
}

impl StatusVocabulary {
    /// Load a vocabulary from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::VocabRead`] if the file cannot be read and
    /// [`ConfigError::VocabParse`] if it is not valid vocabulary YAML.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::VocabRead {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_yaml::from_str(&raw).map_err(|e| ConfigError::VocabParse {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Returns `true` if `text` contains any known keyword phrase
    /// (case-insensitive).
    #[must_use]
    pub fn contains_keyword(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .any(|k| lower.contains(&k.phrase.to_lowercase()))
    }

    /// Returns `true` if `text` contains any configured unavailable phrase
    /// (case-insensitive).
    #[must_use]
    pub fn matches_unavailable(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.unavailable_phrases
            .iter()
            .any(|p| lower.contains(&p.to_lowercase()))
    }

    /// Iterator over the strong phrases, for full-document anchoring.
    pub fn strong_phrases(&self) -> impl Iterator<Item = &str> {
        self.keywords
            .iter()
            .filter(|k| k.strong)
            .map(|k| k.phrase.as_str())
    }
}

impl Default for StatusVocabulary {
    fn default() -> Self {
        fn entry(phrase: &str, stage: StatusStage, strong: bool) -> KeywordEntry {
            KeywordEntry {
                phrase: phrase.to_string(),
                stage,
                strong,
            }
        }

        Self {
            keywords: vec![
                entry("Application submitted", StatusStage::Submitted, true),
                entry("Data sent for verification", StatusStage::Verification, true),
                entry(
                    "Data sent for personalization",
                    StatusStage::Personalization,
                    true,
                ),
                entry("document was produced", StatusStage::Produced, true),
                entry("document arrived", StatusStage::Arrived, true),
                entry("Document issued", StatusStage::Issued, true),
                entry("Заяву подано", StatusStage::Submitted, true),
                entry("Дані відправлено на перевірку", StatusStage::Verification, true),
                entry("Документ виготовлено", StatusStage::Produced, true),
                entry("Документ видано", StatusStage::Issued, true),
                entry("submitted", StatusStage::Submitted, false),
                entry("verification", StatusStage::Verification, false),
                entry("personalization", StatusStage::Personalization, false),
                entry("produced", StatusStage::Produced, false),
                entry("issued", StatusStage::Issued, false),
                entry("Status", StatusStage::General, false),
                entry("Date", StatusStage::General, false),
            ],
            unavailable_phrases: vec![
                "temporarily unavailable".to_string(),
                "тимчасово недоступні".to_string(),
                "тимчасово недоступна".to_string(),
                "тимчасово недоступний".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_vocab_matches_known_phrase() {
        let vocab = StatusVocabulary::default();
        assert!(vocab.contains_keyword("Your Application submitted on Monday"));
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let vocab = StatusVocabulary::default();
        assert!(vocab.contains_keyword("DOCUMENT ISSUED"));
    }

    #[test]
    fn no_keyword_no_match() {
        let vocab = StatusVocabulary::default();
        assert!(!vocab.contains_keyword("nothing to see here"));
    }

    #[test]
    fn unavailable_phrase_is_case_insensitive() {
        let vocab = StatusVocabulary::default();
        assert!(vocab.matches_unavailable("Services are Temporarily Unavailable, sorry"));
        assert!(!vocab.matches_unavailable("all services operating normally"));
    }

    #[test]
    fn strong_phrases_excludes_weak_tokens() {
        let vocab = StatusVocabulary::default();
        let strong: Vec<&str> = vocab.strong_phrases().collect();
        assert!(strong.contains(&"Document issued"));
        assert!(!strong.contains(&"issued"));
    }

    #[test]
    fn vocabulary_parses_from_yaml() {
        let yaml = r"
keywords:
  - phrase: Request received
    stage: submitted
    strong: true
  - phrase: ready
    stage: issued
unavailable_phrases:
  - out of service
";
        let vocab: StatusVocabulary = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(vocab.keywords.len(), 2);
        assert!(vocab.keywords[0].strong);
        assert!(!vocab.keywords[1].strong);
        assert_eq!(vocab.keywords[1].stage, StatusStage::Issued);
        assert!(vocab.matches_unavailable("OUT OF SERVICE"));
    }
}
