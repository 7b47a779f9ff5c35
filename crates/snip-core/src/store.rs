use crate::error::Result;
use crate::mapping::UrlMapping;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// A read-only view of a mapping store.
///
/// This trait provides only the read operations from [`UrlStore`].
/// Existence probes run outside the store's write lock; callers using
/// them in a check-then-act sequence must treat the subsequent mutation
/// as the authoritative step.
#[async_trait]
pub trait ReadUrlStore: Send + Sync + 'static {
    /// Retrieves the mapping stored under a short code.
    /// Returns `None` if the code does not exist.
    async fn resolve(&self, code: &ShortCode) -> Result<Option<UrlMapping>>;

    /// Checks whether a short code is present in the store.
    async fn short_exists(&self, code: &ShortCode) -> Result<bool>;

    /// Checks whether an original URL has already been shortened.
    async fn original_exists(&self, original_url: &str) -> Result<bool>;
}

/// A mapping store with atomic mutation.
///
/// Implementations serialize the mutating operations against each other
/// so that each one is a single atomic transition of the mapping's
/// lifecycle: absent -> present (insert), present -> present' with a new
/// code (regenerate), present -> absent (delete).
#[async_trait]
pub trait UrlStore: ReadUrlStore {
    /// Inserts a new mapping under the given short code.
    /// Returns `Err(DuplicateUrl)` if the original URL is already present.
    async fn insert(&self, code: &ShortCode, mapping: UrlMapping) -> Result<()>;

    /// Deletes the mapping stored under a short code.
    /// Returns `true` if the mapping existed and was removed.
    async fn delete(&self, code: &ShortCode) -> Result<bool>;

    /// Atomically replaces the short code and creation timestamp of the
    /// mapping currently stored under `old_code`.
    /// Returns `true` if such a mapping existed.
    async fn regenerate(
        &self,
        new_code: &ShortCode,
        old_code: &ShortCode,
        created_at: &str,
    ) -> Result<bool>;
}
