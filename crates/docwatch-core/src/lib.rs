mod app_config;
mod config;
pub mod vocab;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use vocab::{KeywordEntry, StatusStage, StatusVocabulary};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read vocabulary file {path}: {source}")]
    VocabRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid vocabulary file {path}: {source}")]
    VocabParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
