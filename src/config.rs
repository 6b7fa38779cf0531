//! Client configuration
//!
//! The configuration is an explicit value handed to [`crate::Client`] at
//! construction time. How the fields are sourced (file, environment,
//! hardcoded) is the caller's concern.

use crate::security::SecureString;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration consumed by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Registered client name, appended to every AUTH command
    pub client_name: String,
    /// Registered client version
    pub client_version: String,
    /// AniDB UDP API host
    pub server_host: String,
    /// AniDB UDP API port
    pub server_port: u16,
    /// Account username
    pub username: String,
    /// Account password
    pub password: SecureString,
    /// Connection string for the cache backing store, if any
    pub cache_uri: Option<String>,
    /// Local UDP port to bind; the server replies to the source port
    pub local_port: u16,
    /// Reply deadline per request
    pub timeout_seconds: u64,
    /// Request NAT information on AUTH/PING exchanges
    pub nat: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client_name: String::new(),
            client_version: String::new(),
            server_host: crate::protocol::DEFAULT_SERVER.to_string(),
            server_port: crate::protocol::DEFAULT_PORT,
            username: String::new(),
            password: SecureString::default(),
            cache_uri: None,
            local_port: 8000,
            timeout_seconds: 30,
            nat: false,
        }
    }
}

impl ClientConfig {
    /// Reply deadline as a [`Duration`]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
