//! SQLite-backed cache
//!
//! One table of documents: verb, canonical key, the decoded mapping as
//! JSON, and an `updated_at` stamp in epoch milliseconds. Multiple client
//! instances may point at the same file; upserts make overlapping writes
//! last-writer-wins.

use crate::cache::{CacheKey, ResponseCache};
use crate::error::{ClientError, Result};
use crate::protocol::response::DecodedResult;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS response_cache (
        verb TEXT NOT NULL,
        cache_key TEXT NOT NULL,
        document TEXT NOT NULL,
        updated_at INTEGER NOT NULL,
        PRIMARY KEY (verb, cache_key)
    );
"#;

/// Cache persisted in a SQLite database
pub struct SqliteCache {
    pool: SqlitePool,
}

impl SqliteCache {
    /// Open (or create) the database behind `uri`, e.g. `sqlite://cache.db`
    pub async fn connect(uri: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(uri)
            .map_err(|e| ClientError::cache(format!("invalid cache URI {uri:?}: {e}")))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| ClientError::cache(format!("failed to open cache store: {e}")))?;

        sqlx::raw_sql(SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| ClientError::cache(format!("failed to initialize cache schema: {e}")))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl ResponseCache for SqliteCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<DecodedResult>> {
        let row = sqlx::query(
            "SELECT document, updated_at FROM response_cache WHERE verb = ? AND cache_key = ?",
        )
        .bind(key.verb())
        .bind(key.params())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ClientError::cache(format!("cache lookup failed: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let document: String = row
            .try_get("document")
            .map_err(|e| ClientError::cache(format!("cache row missing document: {e}")))?;
        let millis: i64 = row
            .try_get("updated_at")
            .map_err(|e| ClientError::cache(format!("cache row missing stamp: {e}")))?;

        let mut value: DecodedResult = serde_json::from_str(&document)
            .map_err(|e| ClientError::cache(format!("stored document is not valid: {e}")))?;
        value.updated_at = stamp_from_millis(millis);

        Ok(Some(value))
    }

    async fn put(&self, key: &CacheKey, value: &DecodedResult) -> Result<()> {
        let mut stored = value.clone();
        stored.updated_at = None;

        let document = serde_json::to_string(&stored)
            .map_err(|e| ClientError::cache(format!("failed to serialize document: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO response_cache (verb, cache_key, document, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (verb, cache_key)
            DO UPDATE SET document = excluded.document, updated_at = excluded.updated_at
            "#,
        )
        .bind(key.verb())
        .bind(key.params())
        .bind(document)
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| ClientError::cache(format!("cache store failed: {e}")))?;

        Ok(())
    }
}

fn stamp_from_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}
