use std::path::PathBuf;

/// Runtime configuration for the monitor, assembled from environment
/// variables by [`crate::load_app_config`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// The document-lookup code submitted to the portal.
    pub record_code: String,
    /// Origin of the status portal, e.g. `https://passport.example.gov`.
    pub portal_base_url: String,
    /// Path of the direct status endpoint used by the fallback fetcher.
    /// The record code is appended as the `sessionId` query parameter.
    pub fallback_status_path: String,
    pub check_interval_secs: u64,
    pub fetch_timeout_secs: u64,
    pub fallback_timeout_secs: u64,
    pub translate_timeout_secs: u64,
    pub fetch_max_retries: u32,
    pub fetch_backoff_base_secs: u64,
    /// Minimum text length for a result container to count as a status
    /// message on its own (without a keyword match).
    pub min_container_len: usize,
    /// Optional YAML file overriding the built-in status vocabulary.
    pub vocab_path: Option<PathBuf>,
    /// How often the vocabulary watcher re-reads the file.
    pub vocab_poll_interval_secs: u64,
    /// Flat-text file holding the last observed canonical status.
    pub baseline_path: PathBuf,
    /// Directory for page dumps when extraction comes up empty.
    pub page_dump_dir: Option<PathBuf>,
    pub translate_url: String,
    pub translate_source_lang: String,
    pub translate_target_lang: String,
    pub user_agent: String,
    pub log_level: String,
    /// Optional webhook receiving `(status, changed)` after each cycle.
    pub notify_webhook_url: Option<String>,
}
