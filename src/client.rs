//! High-level client
//!
//! One method per protocol verb. Each call is a single request/response
//! exchange; the whole build → send → receive → session-update sequence
//! runs under one lock, because the server correlates session identity
//! rather than per-request ids.
//!
//! Domain outcomes come back as status codes on the result; see
//! [`crate::error`] for what raises instead.

use crate::cache::{CacheKey, NullCache, ResponseCache};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::protocol::command::{Command, ParamValue, Verb};
use crate::protocol::fields::{FieldError, FieldKind, FieldSpec, FieldValue, decode_record};
use crate::protocol::masks::{anime, decode_masked};
use crate::protocol::response::{DecodedResult, RawResponse};
use crate::protocol::session::{SessionManager, SessionState};
use crate::protocol::{PROTOCOL_VERSION, WIRE_ENCODING};
use crate::transport::{Transport, UdpTransport};
use log::{debug, trace, warn};
use tokio::sync::Mutex;

// Reply template for PING with NAT info requested
static PING_FIELDS: &[FieldSpec] = &[FieldSpec::new("port", FieldKind::Int)];

// Reply template for ANIMEDESC (233)
static ANIMEDESC_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("current_part", FieldKind::Int),
    FieldSpec::new("max_parts", FieldKind::Int),
    FieldSpec::new("description", FieldKind::Str),
];

// Reply template for CHARACTER (235)
static CHARACTER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("charid", FieldKind::Int),
    FieldSpec::new("name_kanji", FieldKind::Str),
    FieldSpec::new("name_transcription", FieldKind::Str),
    FieldSpec::new("pic", FieldKind::Str),
    FieldSpec::new("anime_blocks", FieldKind::BlockList),
    FieldSpec::new("episode_list", FieldKind::IntList),
    FieldSpec::new("last_updated_date", FieldKind::Date),
    FieldSpec::new("type", FieldKind::Int),
    FieldSpec::new("gender", FieldKind::Str),
];

/// Selector for the ANIME command
#[derive(Debug, Clone)]
pub enum AnimeQuery {
    /// Look up by anime id; cacheable
    ById(u64),
    /// Look up by name; bypasses the cache
    ByName(String),
}

/// AniDB UDP API client
pub struct Client {
    config: ClientConfig,
    transport: Box<dyn Transport>,
    cache: Box<dyn ResponseCache>,
    session: Mutex<SessionManager>,
}

impl Client {
    /// Connect to the configured server, selecting the cache from the
    /// configuration
    ///
    /// Returns a ready client or a typed construction error; nothing is
    /// deferred to first use.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let cache = Self::cache_from_config(&config).await?;
        Self::connect_with_cache(config, cache).await
    }

    /// Connect with an explicit cache adapter
    pub async fn connect_with_cache(
        config: ClientConfig,
        cache: Box<dyn ResponseCache>,
    ) -> Result<Self> {
        let transport = UdpTransport::connect(
            config.local_port,
            &config.server_host,
            config.server_port,
            config.request_timeout(),
        )
        .await?;

        Ok(Self::with_transport(config, Box::new(transport), cache))
    }

    /// Assemble a client over an arbitrary transport
    pub fn with_transport(
        config: ClientConfig,
        transport: Box<dyn Transport>,
        cache: Box<dyn ResponseCache>,
    ) -> Self {
        Self {
            config,
            transport,
            cache,
            session: Mutex::new(SessionManager::new()),
        }
    }

    async fn cache_from_config(config: &ClientConfig) -> Result<Box<dyn ResponseCache>> {
        match &config.cache_uri {
            #[cfg(feature = "sqlite-cache")]
            Some(uri) => Ok(Box::new(crate::cache::SqliteCache::connect(uri).await?)),
            #[cfg(not(feature = "sqlite-cache"))]
            Some(uri) => {
                warn!(
                    "cache URI {uri:?} configured but the sqlite-cache feature is disabled; \
                     proceeding without cache"
                );
                Ok(Box::new(NullCache::new()))
            }
            None => {
                warn!("no cache backing store configured; proceeding without cache");
                Ok(Box::new(NullCache::new()))
            }
        }
    }

    /// Current session state
    pub async fn session_state(&self) -> SessionState {
        self.session.lock().await.state().clone()
    }

    /// PING the server; with `nat`, the reply carries the server-seen port
    pub async fn ping(&self, nat: bool) -> Result<DecodedResult> {
        let mut command = Command::new(Verb::Ping);
        if nat {
            command = command.arg("nat", 1i64);
        }

        let raw = self.exchange(&command).await?;
        let mut result = DecodedResult::new(raw.code);

        if raw.code == 300 {
            if nat && let Some(record) = raw.first_record() {
                let (fields, errors) = decode_record(PING_FIELDS, &record, 0);
                warn_field_errors(&errors);
                result.fields = fields;
                result.field_errors = errors;
            }
        } else {
            attach_message(&mut result, &raw);
        }

        Ok(result)
    }

    /// Obtain a new session with the configured credentials
    ///
    /// 200/201 authenticate and put the token in the `session` field (plus
    /// `nat` when requested); 500 and friends come back in-band with the
    /// session untouched.
    pub async fn auth(&self) -> Result<DecodedResult> {
        let cfg = &self.config;
        let mut command = Command::new(Verb::Auth)
            .arg("user", cfg.username.as_str())
            .arg("pass", cfg.password.expose_secret())
            .arg("protover", i64::from(PROTOCOL_VERSION))
            .arg("client", cfg.client_name.as_str())
            .arg("clientver", cfg.client_version.as_str())
            .arg("enc", WIRE_ENCODING);
        if cfg.nat {
            command = command.arg("nat", 1i64);
        }

        let mut session = self.session.lock().await;
        session.begin_login();
        let raw = self.round_trip(&command, &mut session).await?;
        let extracted = session.complete_login(raw.code, &raw.text, cfg.nat)?;
        drop(session);

        let mut result = DecodedResult::new(raw.code);
        match extracted {
            Some((token, nat_addr)) => {
                result
                    .fields
                    .insert("session".to_string(), FieldValue::Str(token));
                if let Some(addr) = nat_addr {
                    result.fields.insert("nat".to_string(), FieldValue::Str(addr));
                }
            }
            None => attach_message(&mut result, &raw),
        }

        Ok(result)
    }

    /// Drop the current session; 203 and 403 both clear it
    pub async fn logout(&self) -> Result<DecodedResult> {
        let command = Command::new(Verb::Logout);

        let mut session = self.session.lock().await;
        let raw = self.round_trip(&command, &mut session).await?;
        session.complete_logout(raw.code);
        drop(session);

        let mut result = DecodedResult::new(raw.code);
        attach_message(&mut result, &raw);
        Ok(result)
    }

    /// Change the reply encoding for the current session
    pub async fn encoding(&self, name: &str) -> Result<DecodedResult> {
        let command = Command::new(Verb::Encoding).arg("name", name);
        let raw = self.exchange(&command).await?;

        let mut result = DecodedResult::new(raw.code);
        attach_message(&mut result, &raw);
        Ok(result)
    }

    /// Retrieve anime data for the fields selected by `mask`
    ///
    /// Flag constants live in [`crate::protocol::masks::anime`]. Only
    /// id-based lookups participate in the cache.
    pub async fn anime(
        &self,
        query: AnimeQuery,
        mask: u64,
        use_cache: bool,
    ) -> Result<DecodedResult> {
        let command = match &query {
            AnimeQuery::ById(aid) => Command::new(Verb::Anime)
                .arg("aid", *aid)
                .arg("amask", ParamValue::Mask(mask)),
            AnimeQuery::ByName(name) => Command::new(Verb::Anime)
                .arg("aname", name.clone())
                .arg("amask", ParamValue::Mask(mask)),
        };

        let decode = move |raw: &RawResponse| {
            let mut result = DecodedResult::new(raw.code);
            if raw.code == 230 {
                if let Some(record) = raw.first_record() {
                    let (fields, errors) = decode_masked(anime::FIELDS, mask, &record, 0);
                    warn_field_errors(&errors);
                    result.fields = fields;
                    result.field_errors = errors;
                }
            } else {
                attach_message(&mut result, raw);
            }
            result
        };

        match query {
            AnimeQuery::ById(_) => self.cached_exchange(&command, use_cache, decode).await,
            AnimeQuery::ByName(_) => {
                warn!("ANIME by name bypasses the cache; query by aid to reuse stored results");
                let raw = self.exchange(&command).await?;
                Ok(decode(&raw))
            }
        }
    }

    /// Retrieve one part of an anime description
    pub async fn anime_desc(&self, aid: u64, part: u32, use_cache: bool) -> Result<DecodedResult> {
        let command = Command::new(Verb::AnimeDesc).arg("aid", aid).arg("part", part);

        self.cached_exchange(&command, use_cache, |raw| {
            let mut result = DecodedResult::new(raw.code);
            if raw.code == 233 {
                if let Some(record) = raw.first_record() {
                    let (fields, errors) = decode_record(ANIMEDESC_FIELDS, &record, 0);
                    warn_field_errors(&errors);
                    result.fields = fields;
                    result.field_errors = errors;
                }
            } else {
                attach_message(&mut result, raw);
            }
            result
        })
        .await
    }

    /// Retrieve character data
    pub async fn character(&self, charid: u64, use_cache: bool) -> Result<DecodedResult> {
        let command = Command::new(Verb::Character).arg("charid", charid);

        self.cached_exchange(&command, use_cache, |raw| {
            let mut result = DecodedResult::new(raw.code);
            if raw.code == 235 {
                if let Some(record) = raw.first_record() {
                    let (fields, errors) = decode_record(CHARACTER_FIELDS, &record, 0);
                    warn_field_errors(&errors);
                    result.fields = fields;
                    result.field_errors = errors;
                }
            } else {
                attach_message(&mut result, raw);
            }
            result
        })
        .await
    }

    // Cache-aware exchange: a bypassed lookup still refreshes the store.
    async fn cached_exchange<F>(
        &self,
        command: &Command,
        use_cache: bool,
        decode: F,
    ) -> Result<DecodedResult>
    where
        F: FnOnce(&RawResponse) -> DecodedResult,
    {
        let key = CacheKey::from_command(command);

        if use_cache {
            if let Some(hit) = self.cache.get(&key).await? {
                debug!("cache hit for {} {}", key.verb(), key.params());
                return Ok(hit);
            }
        }

        let raw = self.exchange(command).await?;
        let result = decode(&raw);

        if result.is_success() {
            self.cache.put(&key, &result).await?;
        }

        Ok(result)
    }

    async fn exchange(&self, command: &Command) -> Result<RawResponse> {
        let mut session = self.session.lock().await;
        self.round_trip(command, &mut session).await
    }

    // The critical section: token injection, the datagram exchange and the
    // session-state observation happen under the caller's session lock.
    async fn round_trip(
        &self,
        command: &Command,
        session: &mut SessionManager,
    ) -> Result<RawResponse> {
        let token = if command.requires_session() {
            Some(session.token()?.to_string())
        } else {
            None
        };

        let wire = command.encode(token.as_deref())?;
        log_outbound(command.verb(), &wire);

        let reply = self.transport.exchange(wire.as_bytes()).await?;
        let text = String::from_utf8(reply)
            .map_err(|_| ClientError::malformed("reply is not valid UTF-8"))?;
        trace!("received: {text}");

        let raw = RawResponse::parse(&text)?;
        session.observe(raw.code)?;
        Ok(raw)
    }
}

// The AUTH wire carries the password; an escaped '&' inside it would defeat
// any segment-wise masking, so the command is not echoed at all.
fn log_outbound(verb: Verb, wire: &str) {
    if verb == Verb::Auth {
        debug!("sending AUTH (credentials omitted)");
    } else {
        debug!("sending {wire}");
    }
}

fn attach_message(result: &mut DecodedResult, raw: &RawResponse) {
    if !raw.text.is_empty() {
        result
            .fields
            .insert("message".to_string(), FieldValue::Str(raw.text.clone()));
    }
}

fn warn_field_errors(errors: &[FieldError]) {
    for error in errors {
        warn!(
            "field `{}` in record {} failed to decode, omitting (raw: {:?})",
            error.field, error.record, error.raw
        );
    }
}
