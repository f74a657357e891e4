use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("Failed to parse model output: {0}")]
    ParseError(String),

    #[error("Play Store API error: {0}")]
    PlayStoreApi(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No data: {0}")]
    NoData(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    // Per-review failures the classifier absorbs via retry and fallback;
    // everything else is phase-fatal.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::LLMApi(_) | Error::ParseError(_) | Error::Network(_)
        )
    }
}
