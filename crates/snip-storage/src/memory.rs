use async_trait::async_trait;
use dashmap::DashMap;
use snip_core::error::{Result, StorageError};
use snip_core::{ReadUrlStore, ShortCode, UrlMapping, UrlStore};
use tokio::sync::Mutex;

/// In-memory row for a URL mapping.
#[derive(Debug, Clone)]
struct Row {
    original_url: String,
    created_at: String,
}

/// In-memory implementation of the `UrlStore` trait using DashMap.
///
/// Two maps are kept: short codes to rows, and a reverse map from
/// original URL to short code backing the uniqueness check on
/// `original_url`. Mutating operations hold the write lock so the two
/// maps never diverge; reads go straight to the shards.
#[derive(Debug)]
pub struct MemoryUrlStore {
    codes: DashMap<String, Row>,
    urls: DashMap<String, String>,
    write_lock: Mutex<()>,
}

impl MemoryUrlStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self {
            codes: DashMap::new(),
            urls: DashMap::new(),
            write_lock: Mutex::new(()),
        }
    }
}

impl Default for MemoryUrlStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadUrlStore for MemoryUrlStore {
    async fn resolve(&self, code: &ShortCode) -> Result<Option<UrlMapping>> {
        Ok(self.codes.get(code.as_str()).map(|row| UrlMapping {
            original_url: row.original_url.clone(),
            created_at: row.created_at.clone(),
        }))
    }

    async fn short_exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.codes.contains_key(code.as_str()))
    }

    async fn original_exists(&self, original_url: &str) -> Result<bool> {
        Ok(self.urls.contains_key(original_url))
    }
}

#[async_trait]
impl UrlStore for MemoryUrlStore {
    async fn insert(&self, code: &ShortCode, mapping: UrlMapping) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        if self.urls.contains_key(&mapping.original_url) {
            return Err(StorageError::DuplicateUrl(mapping.original_url));
        }

        self.urls
            .insert(mapping.original_url.clone(), code.as_str().to_owned());
        self.codes.insert(
            code.as_str().to_owned(),
            Row {
                original_url: mapping.original_url,
                created_at: mapping.created_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, code: &ShortCode) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let Some((_, row)) = self.codes.remove(code.as_str()) else {
            return Ok(false);
        };
        self.urls.remove(&row.original_url);
        Ok(true)
    }

    async fn regenerate(
        &self,
        new_code: &ShortCode,
        old_code: &ShortCode,
        created_at: &str,
    ) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let Some((_, row)) = self.codes.remove(old_code.as_str()) else {
            return Ok(false);
        };
        self.urls
            .insert(row.original_url.clone(), new_code.as_str().to_owned());
        self.codes.insert(
            new_code.as_str().to_owned(),
            Row {
                original_url: row.original_url,
                created_at: created_at.to_owned(),
            },
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    fn mapping(url: &str, created_at: &str) -> UrlMapping {
        UrlMapping {
            original_url: url.to_string(),
            created_at: created_at.to_string(),
        }
    }

    #[tokio::test]
    async fn insert_and_resolve() {
        let store = MemoryUrlStore::new();

        store
            .insert(&code("abc123"), mapping("https://example.com", "2024-01-01 00:00:00"))
            .await
            .unwrap();

        let result = store.resolve(&code("abc123")).await.unwrap().unwrap();
        assert_eq!(result.original_url, "https://example.com");
        assert_eq!(result.created_at, "2024-01-01 00:00:00");
    }

    #[tokio::test]
    async fn resolve_nonexistent() {
        let store = MemoryUrlStore::new();

        assert!(store.resolve(&code("nope")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_original_url_rejected() {
        let store = MemoryUrlStore::new();

        store
            .insert(&code("abc123"), mapping("https://example.com", "2024-01-01 00:00:00"))
            .await
            .unwrap();

        let err = store
            .insert(&code("xyz789"), mapping("https://example.com", "2024-06-01 00:00:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::DuplicateUrl(_)));

        // The existing row must be left untouched by the failed insert.
        let result = store.resolve(&code("abc123")).await.unwrap().unwrap();
        assert_eq!(result.created_at, "2024-01-01 00:00:00");
        assert!(store.resolve(&code("xyz789")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_existing() {
        let store = MemoryUrlStore::new();

        store
            .insert(&code("abc123"), mapping("https://example.com", "2024-01-01 00:00:00"))
            .await
            .unwrap();

        assert!(store.delete(&code("abc123")).await.unwrap());
        assert!(!store.short_exists(&code("abc123")).await.unwrap());
        // The original URL is free to be shortened again.
        assert!(!store.original_exists("https://example.com").await.unwrap());
    }

    #[tokio::test]
    async fn delete_nonexistent() {
        let store = MemoryUrlStore::new();

        assert!(!store.delete(&code("nope")).await.unwrap());
    }

    #[tokio::test]
    async fn regenerate_replaces_code_and_timestamp() {
        let store = MemoryUrlStore::new();

        store
            .insert(&code("oldcode1"), mapping("https://example.com", "2024-01-01 00:00:00"))
            .await
            .unwrap();

        let replaced = store
            .regenerate(&code("newcode1"), &code("oldcode1"), "2024-06-01 12:30:45")
            .await
            .unwrap();
        assert!(replaced);

        assert!(store.resolve(&code("oldcode1")).await.unwrap().is_none());
        let result = store.resolve(&code("newcode1")).await.unwrap().unwrap();
        assert_eq!(result.original_url, "https://example.com");
        assert_eq!(result.created_at, "2024-06-01 12:30:45");
        // Reverse map follows the new code.
        assert!(store.original_exists("https://example.com").await.unwrap());
    }

    #[tokio::test]
    async fn regenerate_nonexistent() {
        let store = MemoryUrlStore::new();

        let replaced = store
            .regenerate(&code("newcode1"), &code("ghost"), "2024-06-01 12:30:45")
            .await
            .unwrap();
        assert!(!replaced);
    }

    #[tokio::test]
    async fn exists_probes() {
        let store = MemoryUrlStore::new();

        assert!(!store.short_exists(&code("abc123")).await.unwrap());
        assert!(!store.original_exists("https://example.com").await.unwrap());

        store
            .insert(&code("abc123"), mapping("https://example.com", "2024-01-01 00:00:00"))
            .await
            .unwrap();

        assert!(store.short_exists(&code("abc123")).await.unwrap());
        assert!(store.original_exists("https://example.com").await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_distinct_inserts() {
        let store = Arc::new(MemoryUrlStore::new());
        let mut handles = vec![];

        for i in 0..10u64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let c = ShortCode::new_unchecked(format!("code{:04}", i));
                let m = mapping(&format!("https://example{}.com", i), "2024-01-01 00:00:00");
                store.insert(&c, m).await.unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        for i in 0..10u64 {
            let c = ShortCode::new_unchecked(format!("code{:04}", i));
            let result = store.resolve(&c).await.unwrap().unwrap();
            assert_eq!(result.original_url, format!("https://example{}.com", i));
        }
    }

    #[tokio::test]
    async fn concurrent_inserts_of_same_url_have_single_winner() {
        let store = Arc::new(MemoryUrlStore::new());
        let mut handles = vec![];

        for i in 0..10u64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let c = ShortCode::new_unchecked(format!("code{:04}", i));
                store
                    .insert(&c, mapping("https://example.com", "2024-01-01 00:00:00"))
                    .await
            }));
        }

        let mut inserted = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => inserted += 1,
                Err(StorageError::DuplicateUrl(_)) => duplicates += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(inserted, 1);
        assert_eq!(duplicates, 9);
    }
}
