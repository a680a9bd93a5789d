//! Last-observed-status persistence and change detection.
//!
//! The baseline is a single flat-text file. The change detector is its sole
//! reader and writer: it reads at the start of the comparison and rewrites
//! the file on every cycle, changed or not, so future comparisons always run
//! against the freshest text.

use std::path::PathBuf;

use docwatch_extract::collapse_whitespace;

use crate::error::MonitorError;

/// Storage for the last observed canonical status.
pub trait BaselineStore: Send + Sync {
    /// Returns the stored status, or `None` if nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Baseline`] on an I/O failure other than
    /// "not found".
    fn load(&self) -> Result<Option<String>, MonitorError>;

    /// Overwrites the stored status.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Baseline`] on an I/O failure.
    fn store(&self, status: &str) -> Result<(), MonitorError>;
}

/// Flat-text file store.
pub struct FileBaselineStore {
    path: PathBuf,
}

impl FileBaselineStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl BaselineStore for FileBaselineStore {
    fn load(&self) -> Result<Option<String>, MonitorError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text.trim_end_matches(['\n', '\r']).to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MonitorError::Baseline {
                path: self.path.display().to_string(),
                source: e,
            }),
        }
    }

    fn store(&self, status: &str) -> Result<(), MonitorError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| MonitorError::Baseline {
                    path: self.path.display().to_string(),
                    source: e,
                })?;
            }
        }
        std::fs::write(&self.path, status).map_err(|e| MonitorError::Baseline {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}

/// Compares `current` against the stored baseline and persists `current` as
/// the new baseline.
///
/// Comparison collapses whitespace runs on both sides so formatting-only
/// differences (extra blank lines, indentation) do not count as changes.
/// The *uncollapsed* `current` is what gets persisted. A missing baseline
/// (first ever cycle) counts as changed.
///
/// # Errors
///
/// Returns [`MonitorError::Baseline`] if the store cannot be read or written.
pub fn detect_change(store: &dyn BaselineStore, current: &str) -> Result<bool, MonitorError> {
    let changed = match store.load()? {
        Some(last) => collapse_whitespace(current) != collapse_whitespace(&last),
        None => true,
    };
    store.store(current)?;
    Ok(changed)
}
