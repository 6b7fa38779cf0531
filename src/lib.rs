//! Typed client for the AniDB UDP API
//!
//! Sends ASCII commands as single datagrams, tracks the session across
//! stateless exchanges, and decodes the delimiter-separated replies into
//! typed key/value results — including the per-command field masks that
//! change the arity and meaning of the payload. An optional write-through
//! cache can short-circuit network calls for data commands.
//!
//! ```no_run
//! use anidb_udp::{AnimeQuery, Client, ClientConfig, protocol::masks::anime};
//!
//! # async fn run() -> anidb_udp::Result<()> {
//! let config = ClientConfig {
//!     client_name: "myclient".to_string(),
//!     client_version: "1".to_string(),
//!     username: "user".to_string(),
//!     password: "secret".into(),
//!     ..ClientConfig::default()
//! };
//!
//! let client = Client::connect(config).await?;
//! client.auth().await?;
//!
//! let mask = anime::AID | anime::YEAR | anime::ROMAJI_NAME;
//! let result = client.anime(AnimeQuery::ById(1), mask, true).await?;
//! println!("{} -> {:?}", result.code, result.get("romaji_name"));
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod security;
pub mod transport;

// Re-export main types
pub use cache::{CacheKey, MemoryCache, NullCache, ResponseCache};
#[cfg(feature = "sqlite-cache")]
pub use cache::SqliteCache;
pub use client::{AnimeQuery, Client};
pub use config::ClientConfig;
pub use error::{ClientError, ResponseCode, Result};
pub use protocol::fields::{FieldError, FieldKind, FieldValue};
pub use protocol::response::{DecodedResult, RawResponse};
pub use protocol::session::SessionState;
pub use security::SecureString;
pub use transport::Transport;
