//! Optional write-through cache for decoded results
//!
//! Lookups are exact-match on a canonical key; stores are last-writer-wins.
//! Which implementation a client carries is decided at construction time —
//! [`NullCache`] when no backing store is configured.

pub mod memory;
#[cfg(feature = "sqlite-cache")]
pub mod sqlite;

pub use memory::MemoryCache;
#[cfg(feature = "sqlite-cache")]
pub use sqlite::SqliteCache;

use crate::error::Result;
use crate::protocol::command::Command;
use crate::protocol::response::DecodedResult;
use async_trait::async_trait;

/// Canonical cache key: verb plus name-sorted rendered parameters
///
/// Sorting makes the key independent of argument order, so an equivalent
/// prior call always hits. The session pair never appears here; it is
/// injected after key construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    verb: String,
    params: String,
}

impl CacheKey {
    /// Build a key from rendered (name, value) pairs
    pub fn new(verb: &str, params: &[(String, String)]) -> Self {
        let mut sorted: Vec<&(String, String)> = params.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));

        let params = sorted
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");

        Self {
            verb: verb.to_string(),
            params,
        }
    }

    /// Build a key from a command's parameters
    pub fn from_command(command: &Command) -> Self {
        Self::new(command.verb().as_str(), &command.rendered_params())
    }

    /// The command verb this key belongs to
    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// The canonical parameter serialization
    pub fn params(&self) -> &str {
        &self.params
    }
}

/// Storage interface the core programs against
///
/// Implementations stamp entries on `put` and inject the stored stamp as
/// `updated_at` on a `get` hit. Concurrent access from multiple client
/// instances must be tolerated; the only guarantee required on overlapping
/// `put`s is last-writer-wins.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Look up a previously stored result for exactly this key
    async fn get(&self, key: &CacheKey) -> Result<Option<DecodedResult>>;

    /// Store a decoded result, stamping it with the current time
    async fn put(&self, key: &CacheKey, value: &DecodedResult) -> Result<()>;
}

/// Cache that stores nothing
///
/// Selected when no backing store is configured; `get` always misses and
/// `put` discards.
#[derive(Debug, Default)]
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResponseCache for NullCache {
    async fn get(&self, _key: &CacheKey) -> Result<Option<DecodedResult>> {
        Ok(None)
    }

    async fn put(&self, _key: &CacheKey, _value: &DecodedResult) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::command::{ParamValue, Verb};

    #[test]
    fn test_key_is_order_independent() {
        let a = CacheKey::new(
            "ANIME",
            &[
                ("aid".to_string(), "1".to_string()),
                ("amask".to_string(), "80".to_string()),
            ],
        );
        let b = CacheKey::new(
            "ANIME",
            &[
                ("amask".to_string(), "80".to_string()),
                ("aid".to_string(), "1".to_string()),
            ],
        );
        assert_eq!(a, b);
        assert_eq!(a.params(), "aid=1&amask=80");
    }

    #[test]
    fn test_key_distinguishes_params_and_verbs() {
        let a = CacheKey::new("ANIME", &[("aid".to_string(), "1".to_string())]);
        let b = CacheKey::new("ANIME", &[("aid".to_string(), "2".to_string())]);
        let c = CacheKey::new("CHARACTER", &[("aid".to_string(), "1".to_string())]);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_key_from_command_excludes_session() {
        let cmd = Command::new(Verb::Anime)
            .arg("amask", ParamValue::Mask(0x80))
            .arg("aid", 1u32);
        let key = CacheKey::from_command(&cmd);
        assert_eq!(key.verb(), "ANIME");
        assert_eq!(key.params(), "aid=1&amask=80");
    }

    #[tokio::test]
    async fn test_null_cache_always_misses() {
        let cache = NullCache::new();
        let key = CacheKey::new("ANIME", &[]);
        let value = DecodedResult::new(230);

        cache.put(&key, &value).await.unwrap();
        assert!(cache.get(&key).await.unwrap().is_none());
    }
}
