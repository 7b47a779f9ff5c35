use async_trait::async_trait;
use snip_core::error::{Result, StorageError};
use snip_core::{ReadUrlStore, ShortCode, UrlMapping, UrlStore};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tokio::sync::Mutex;

/// SQLite implementation of the mapping store.
///
/// `original_url` is the table's primary key, making the database the
/// final arbiter of URL uniqueness under concurrent inserts. `short_url`
/// carries a plain secondary index for lookups; short-code uniqueness
/// rests on the size of the code space rather than a constraint.
///
/// Mutating operations are serialized through a single write lock.
/// Reads bypass it.
#[derive(Debug)]
pub struct SqliteUrlStore {
    pool: SqlitePool,
    write_lock: Mutex<()>,
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS urls (
    original_url TEXT PRIMARY KEY,
    short_url    TEXT NOT NULL,
    created_at   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_urls_short_url ON urls (short_url);
"#;

impl SqliteUrlStore {
    /// Creates a store from an existing connection pool. The schema must
    /// already exist.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Mutex::new(()),
        }
    }

    /// Opens (creating if missing) the database file at `path` and
    /// ensures the schema exists.
    pub async fn connect(path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Opens a private in-memory database.
    ///
    /// Every pool connection would otherwise see its own empty database,
    /// so the pool is pinned to a single connection. Intended for tests.
    pub async fn connect_in_memory() -> Result<Self> {
        let options =
            SqliteConnectOptions::from_str("sqlite::memory:").map_err(map_sqlx_error)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadUrlStore for SqliteUrlStore {
    async fn resolve(&self, code: &ShortCode) -> Result<Option<UrlMapping>> {
        let row = sqlx::query(
            r#"
            SELECT original_url, created_at
            FROM urls
            WHERE short_url = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
        let created_at: String = row.try_get("created_at").map_err(map_sqlx_error)?;

        Ok(Some(UrlMapping {
            original_url,
            created_at,
        }))
    }

    async fn short_exists(&self, code: &ShortCode) -> Result<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1
            FROM urls
            WHERE short_url = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(exists)
    }

    async fn original_exists(&self, original_url: &str) -> Result<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1
            FROM urls
            WHERE original_url = ?
            LIMIT 1
            "#,
        )
        .bind(original_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(exists)
    }
}

#[async_trait]
impl UrlStore for SqliteUrlStore {
    async fn insert(&self, code: &ShortCode, mapping: UrlMapping) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let result = sqlx::query(
            r#"
            INSERT INTO urls (original_url, short_url, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&mapping.original_url)
        .bind(code.as_str())
        .bind(&mapping.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(StorageError::DuplicateUrl(mapping.original_url))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn delete(&self, code: &ShortCode) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let result = sqlx::query(
            r#"
            DELETE FROM urls
            WHERE short_url = ?
            "#,
        )
        .bind(code.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn regenerate(
        &self,
        new_code: &ShortCode,
        old_code: &ShortCode,
        created_at: &str,
    ) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let result = sqlx::query(
            r#"
            UPDATE urls
            SET short_url = ?, created_at = ?
            WHERE short_url = ?
            "#,
        )
        .bind(new_code.as_str())
        .bind(created_at)
        .bind(old_code.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
