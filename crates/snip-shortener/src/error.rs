use snip_core::CoreError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ShortenError {
    #[error("original url cannot be empty")]
    EmptyUrl,
    #[error("original url already shortened: {0}")]
    DuplicateUrl(String),
    #[error("short url not found: {0}")]
    NotFound(String),
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("code generation failed: {0}")]
    Generator(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<CoreError> for ShortenError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidShortCode(message) => Self::InvalidShortCode(message),
        }
    }
}
