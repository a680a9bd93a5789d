use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error(transparent)]
    Extract(#[from] docwatch_extract::ExtractError),

    #[error("baseline file {path}: {source}")]
    Baseline {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("translation failed: {reason}")]
    Translate { reason: String },

    #[error("notification failed: {reason}")]
    Notify { reason: String },
}
