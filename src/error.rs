use thiserror::Error;

/// Errors a handler, the fetch capability or the host can report.
///
/// Malformed markup and missing attributes never show up here: tree coercion
/// degrades to a partial tree and absent attributes read as empty.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Validation service returned no envelope: {0}")]
    ServiceUnavailable(String),
    #[error("Timeout: Request took longer than {0} seconds")]
    Timeout(u64),
    #[error("Unknown page handler '{0}'")]
    UnknownHandler(String),
    #[error("Unknown seed generator '{0}'")]
    UnknownSeedGenerator(String),
    #[error("Handler task failed: {0}")]
    TaskFailed(String),
}

impl From<url::ParseError> for HandlerError {
    fn from(err: url::ParseError) -> Self {
        HandlerError::InvalidUrl(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HandlerError>;
