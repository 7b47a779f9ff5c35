use crate::error::ShortenError;
use crate::shortener::{ShortenedUrl, Shortener};
use async_trait::async_trait;
use jiff::Timestamp;
use snip_core::{format_timestamp, ShortCode, StorageError, UrlMapping, UrlStore};
use snip_generator::{Generator, GeneratorError};
use std::sync::Arc;
use tracing::{info, warn};

/// A concrete implementation of the `Shortener` trait.
///
/// Wraps a `UrlStore` and a `Generator`. The store is the single source
/// of truth for uniqueness: the upfront existence checks are advisory,
/// and a duplicate slipping through between check and insert surfaces as
/// the same recoverable error. Generated codes are not re-checked
/// against allocated ones; collisions are left to the size of the code
/// space.
#[derive(Debug)]
pub struct ShortenerService<S, G> {
    store: Arc<S>,
    generator: Arc<G>,
}

impl<S, G> Clone for ShortenerService<S, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
        }
    }
}

impl<S: UrlStore, G: Generator> ShortenerService<S, G> {
    /// Creates a new `ShortenerService` over the given store and
    /// generator.
    pub fn new(store: S, generator: G) -> Self {
        Self {
            store: Arc::new(store),
            generator: Arc::new(generator),
        }
    }

    fn next_code(&self) -> Result<ShortCode, ShortenError> {
        self.generator.generate().map_err(generator_to_shorten_error)
    }

    fn now() -> String {
        format_timestamp(Timestamp::now())
    }
}

#[async_trait]
impl<S: UrlStore, G: Generator> Shortener for ShortenerService<S, G> {
    async fn create(&self, original_url: &str) -> Result<ShortenedUrl, ShortenError> {
        if original_url.is_empty() {
            return Err(ShortenError::EmptyUrl);
        }

        if self
            .store
            .original_exists(original_url)
            .await
            .map_err(storage_to_shorten_error)?
        {
            return Err(ShortenError::DuplicateUrl(original_url.to_owned()));
        }

        let code = self.next_code()?;
        let mapping = UrlMapping {
            original_url: original_url.to_owned(),
            created_at: Self::now(),
        };

        // The insert can still lose a race between the check above and
        // here; the store's uniqueness constraint reports it as the same
        // recoverable duplicate.
        self.store
            .insert(&code, mapping.clone())
            .await
            .map_err(storage_to_shorten_error)?;

        info!(short_code = %code, "shortened url");
        Ok(ShortenedUrl {
            short_code: code,
            original_url: mapping.original_url,
            created_at: mapping.created_at,
        })
    }

    async fn resolve(&self, code: &ShortCode) -> Result<ShortenedUrl, ShortenError> {
        let mapping = self
            .store
            .resolve(code)
            .await
            .map_err(storage_to_shorten_error)?
            .ok_or_else(|| ShortenError::NotFound(code.to_string()))?;

        Ok(ShortenedUrl {
            short_code: code.clone(),
            original_url: mapping.original_url,
            created_at: mapping.created_at,
        })
    }

    async fn regenerate(&self, code: &ShortCode) -> Result<ShortCode, ShortenError> {
        if !self
            .store
            .short_exists(code)
            .await
            .map_err(storage_to_shorten_error)?
        {
            return Err(ShortenError::NotFound(code.to_string()));
        }

        let new_code = self.next_code()?;
        let replaced = self
            .store
            .regenerate(&new_code, code, &Self::now())
            .await
            .map_err(storage_to_shorten_error)?;

        // A concurrent regenerate or delete can win between the check
        // and the update; everyone but the winner sees not-found.
        if !replaced {
            warn!(short_code = %code, "mapping vanished during regenerate");
            return Err(ShortenError::NotFound(code.to_string()));
        }

        info!(old_code = %code, new_code = %new_code, "regenerated short code");
        Ok(new_code)
    }

    async fn delete(&self, code: &ShortCode) -> Result<(), ShortenError> {
        let deleted = self
            .store
            .delete(code)
            .await
            .map_err(storage_to_shorten_error)?;

        if !deleted {
            return Err(ShortenError::NotFound(code.to_string()));
        }

        info!(short_code = %code, "deleted mapping");
        Ok(())
    }
}

/// Converts a StorageError to a ShortenError.
fn storage_to_shorten_error(e: StorageError) -> ShortenError {
    match e {
        StorageError::DuplicateUrl(url) => ShortenError::DuplicateUrl(url),
        other => ShortenError::Storage(other.to_string()),
    }
}

fn generator_to_shorten_error(e: GeneratorError) -> ShortenError {
    ShortenError::Generator(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use snip_generator::SeqGenerator;
    use snip_storage::MemoryUrlStore;

    fn test_service() -> ShortenerService<MemoryUrlStore, SeqGenerator> {
        ShortenerService::new(MemoryUrlStore::new(), SeqGenerator::with_prefix("sn"))
    }

    struct FailingGenerator;

    impl Generator for FailingGenerator {
        fn generate(&self) -> Result<ShortCode, GeneratorError> {
            Err(GeneratorError::Entropy("no entropy".to_string()))
        }
    }

    #[tokio::test]
    async fn create_assigns_generated_code() {
        let service = test_service();

        let created = service.create("http://example.com").await.unwrap();

        assert_eq!(created.short_code.as_str(), "sn000000");
        assert_eq!(created.original_url, "http://example.com");
        assert_eq!(created.created_at.len(), 19);
    }

    #[tokio::test]
    async fn create_rejects_empty_url() {
        let service = test_service();

        let err = service.create("").await.unwrap_err();
        assert!(matches!(err, ShortenError::EmptyUrl));
    }

    #[tokio::test]
    async fn create_rejects_already_shortened_url() {
        let service = test_service();

        service.create("http://example.com").await.unwrap();
        let err = service.create("http://example.com").await.unwrap_err();
        assert!(matches!(err, ShortenError::DuplicateUrl(_)));
    }

    #[tokio::test]
    async fn resolve_round_trips_created_mapping() {
        let service = test_service();

        let created = service.create("http://example.com").await.unwrap();
        let resolved = service.resolve(&created.short_code).await.unwrap();

        assert_eq!(resolved, created);
    }

    #[tokio::test]
    async fn resolve_unknown_code_not_found() {
        let service = test_service();

        let err = service
            .resolve(&ShortCode::new_unchecked("ghost123"))
            .await
            .unwrap_err();
        assert!(matches!(err, ShortenError::NotFound(_)));
    }

    #[tokio::test]
    async fn regenerate_replaces_code() {
        let service = test_service();

        let created = service.create("http://example.com").await.unwrap();
        let new_code = service.regenerate(&created.short_code).await.unwrap();

        assert_ne!(new_code, created.short_code);

        let err = service.resolve(&created.short_code).await.unwrap_err();
        assert!(matches!(err, ShortenError::NotFound(_)));

        let resolved = service.resolve(&new_code).await.unwrap();
        assert_eq!(resolved.original_url, "http://example.com");
    }

    #[tokio::test]
    async fn regenerate_unknown_code_not_found() {
        let service = test_service();

        let err = service
            .regenerate(&ShortCode::new_unchecked("ghost123"))
            .await
            .unwrap_err();
        assert!(matches!(err, ShortenError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_removes_mapping() {
        let service = test_service();

        let created = service.create("http://example.com").await.unwrap();
        service.delete(&created.short_code).await.unwrap();

        let err = service.resolve(&created.short_code).await.unwrap_err();
        assert!(matches!(err, ShortenError::NotFound(_)));

        // The URL can be shortened again once its mapping is gone.
        service.create("http://example.com").await.unwrap();
    }

    #[tokio::test]
    async fn delete_unknown_code_not_found() {
        let service = test_service();

        let err = service
            .delete(&ShortCode::new_unchecked("ghost123"))
            .await
            .unwrap_err();
        assert!(matches!(err, ShortenError::NotFound(_)));
    }

    #[tokio::test]
    async fn generator_failure_fails_the_operation() {
        let service = ShortenerService::new(MemoryUrlStore::new(), FailingGenerator);

        let err = service.create("http://example.com").await.unwrap_err();
        assert!(matches!(err, ShortenError::Generator(_)));
    }

    #[tokio::test]
    async fn concurrent_creates_of_same_url_have_single_winner() {
        let service = test_service();
        let mut handles = vec![];

        for _ in 0..10 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.create("http://example.com").await
            }));
        }

        let mut created = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(ShortenError::DuplicateUrl(_)) => duplicates += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(duplicates, 9);
    }
}
