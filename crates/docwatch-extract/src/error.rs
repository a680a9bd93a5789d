use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The page bytes cannot be interpreted as text at all. The only hard
    /// failure the extractor produces; "nothing found" is a normal
    /// `Unavailable` result, not an error.
    #[error("page markup is not valid UTF-8 text: {source}")]
    Parse {
        #[source]
        source: std::str::Utf8Error,
    },
}
