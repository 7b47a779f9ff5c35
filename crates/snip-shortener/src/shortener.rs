use crate::error::ShortenError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use snip_core::ShortCode;

type Result<T> = std::result::Result<T, ShortenError>;

/// A shortened URL as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortenedUrl {
    /// The short code the mapping is stored under.
    pub short_code: ShortCode,
    /// The original URL that was shortened.
    pub original_url: String,
    /// When the mapping was created or last regenerated.
    pub created_at: String,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens a URL, allocating a fresh short code for it.
    async fn create(&self, original_url: &str) -> Result<ShortenedUrl>;

    /// Resolves a short code to its stored mapping.
    async fn resolve(&self, code: &ShortCode) -> Result<ShortenedUrl>;

    /// Replaces the short code of an existing mapping with a freshly
    /// generated one and returns the new code.
    async fn regenerate(&self, code: &ShortCode) -> Result<ShortCode>;

    /// Deletes the mapping stored under a short code.
    async fn delete(&self, code: &ShortCode) -> Result<()>;
}
