//! Shared test harness: a transport that replays a scripted conversation
//! and records every datagram the client sends.

#![allow(dead_code)]

use anidb_udp::{Client, ClientConfig, ClientError, MemoryCache, ResponseCache, Result, Transport};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One step of a scripted conversation
pub enum ScriptedReply {
    /// Reply with this datagram
    Reply(String),
    /// Simulate an expired reply deadline
    Timeout,
}

/// Transport that pops one scripted reply per exchange
///
/// Panics when the script is exhausted, so an unexpected network call
/// fails the test by itself.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<ScriptedReply>>,
    sent: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new(script: impl IntoIterator<Item = ScriptedReply>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn with_replies(replies: &[&str]) -> Arc<Self> {
        Self::new(
            replies
                .iter()
                .map(|reply| ScriptedReply::Reply(reply.to_string())),
        )
    }

    /// Datagrams sent so far, decoded as UTF-8
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn exchange(&self, datagram: &[u8]) -> Result<Vec<u8>> {
        let wire = String::from_utf8(datagram.to_vec()).expect("client sent non-UTF-8");
        self.sent.lock().unwrap().push(wire);

        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("transport script exhausted: unexpected network call");

        match step {
            ScriptedReply::Reply(text) => Ok(text.into_bytes()),
            ScriptedReply::Timeout => Err(ClientError::NetworkTimeout(Duration::from_secs(30))),
        }
    }
}

/// Newtype wrapper so a shared `Arc<ScriptedTransport>` can be handed to the
/// client as a `Box<dyn Transport>`. A direct `impl Transport for
/// Arc<ScriptedTransport>` would violate the orphan rule in this test crate,
/// since both `Arc` and `Transport` are foreign here.
pub struct SharedTransport(pub Arc<ScriptedTransport>);

#[async_trait]
impl Transport for SharedTransport {
    async fn exchange(&self, datagram: &[u8]) -> Result<Vec<u8>> {
        self.0.exchange(datagram).await
    }
}

pub fn test_config() -> ClientConfig {
    ClientConfig {
        client_name: "testclient".to_string(),
        client_version: "1".to_string(),
        username: "user".to_string(),
        password: "secret".into(),
        ..ClientConfig::default()
    }
}

/// Client over a scripted transport with an in-memory cache
pub fn scripted_client(replies: &[&str]) -> (Client, Arc<ScriptedTransport>) {
    scripted_client_with_cache(replies, Box::new(MemoryCache::new()))
}

pub fn scripted_client_with_cache(
    replies: &[&str],
    cache: Box<dyn ResponseCache>,
) -> (Client, Arc<ScriptedTransport>) {
    let transport = ScriptedTransport::with_replies(replies);
    let client = Client::with_transport(
        test_config(),
        Box::new(SharedTransport(transport.clone())),
        cache,
    );
    (client, transport)
}

/// The standard scripted login exchange
pub const LOGIN_ACCEPTED: &str = "200 iQUO2 LOGIN ACCEPTED";

pub async fn login(client: &Client) {
    let result = client.auth().await.expect("auth failed");
    assert_eq!(result.code, 200);
}
