//! In-memory cache
//!
//! Useful for tests and single-process runs that want read-your-writes
//! caching without a backing store on disk.

use crate::cache::{CacheKey, ResponseCache};
use crate::error::Result;
use crate::protocol::response::DecodedResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

struct StoredEntry {
    value: DecodedResult,
    updated_at: DateTime<Utc>,
}

/// Cache backed by a process-local map, last-writer-wins
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<CacheKey, StoredEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Check if the cache holds no entries
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl ResponseCache for MemoryCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<DecodedResult>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).map(|entry| {
            let mut value = entry.value.clone();
            value.updated_at = Some(entry.updated_at);
            value
        }))
    }

    async fn put(&self, key: &CacheKey, value: &DecodedResult) -> Result<()> {
        let mut stored = value.clone();
        // The stamp lives beside the document, not inside it
        stored.updated_at = None;

        self.entries.write().await.insert(
            key.clone(),
            StoredEntry {
                value: stored,
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }
}
