//! Command values and the wire-format encoder
//!
//! A command is a verb plus an ordered parameter list, immutable once
//! built. Encoding produces `VERB k1=v1&k2=v2` with protocol escaping; the
//! session token is injected as the trailing `s=` pair at encode time, so
//! it never participates in cache keys.

use crate::error::{ClientError, Result};
use crate::protocol::codec::encode_value;

/// Supported protocol verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Auth,
    Logout,
    Encoding,
    Ping,
    Anime,
    AnimeDesc,
    Character,
}

impl Verb {
    /// Wire name of the verb
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Auth => "AUTH",
            Verb::Logout => "LOGOUT",
            Verb::Encoding => "ENCODING",
            Verb::Ping => "PING",
            Verb::Anime => "ANIME",
            Verb::AnimeDesc => "ANIMEDESC",
            Verb::Character => "CHARACTER",
        }
    }

    /// Check if the verb needs a live session token
    pub fn requires_session(&self) -> bool {
        !matches!(self, Verb::Auth | Verb::Ping | Verb::Encoding)
    }

    /// Check if replies to this verb may be served from / stored to cache
    pub fn cacheable(&self) -> bool {
        matches!(self, Verb::Anime | Verb::AnimeDesc | Verb::Character)
    }

    /// Parameters that must be present for the verb to encode
    fn required_params(&self) -> &'static [&'static str] {
        match self {
            Verb::Auth => &["user", "pass", "protover", "client", "clientver"],
            Verb::Encoding => &["name"],
            Verb::Anime => &["amask"],
            Verb::AnimeDesc => &["aid", "part"],
            Verb::Character => &["charid"],
            Verb::Logout | Verb::Ping => &[],
        }
    }
}

/// Parameter value with its canonical wire rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    /// Bitmask, rendered as lowercase hex
    Mask(u64),
}

impl ParamValue {
    /// Render the value in its canonical wire form
    pub fn render(&self) -> String {
        match self {
            ParamValue::Str(s) => s.clone(),
            ParamValue::Int(n) => n.to_string(),
            ParamValue::Mask(m) => format!("{m:x}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        ParamValue::Int(value as i64)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<u16> for ParamValue {
    fn from(value: u16) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

/// An immutable command: verb plus ordered parameters
#[derive(Debug, Clone)]
pub struct Command {
    verb: Verb,
    params: Vec<(String, ParamValue)>,
}

impl Command {
    /// Create a command with no parameters
    pub fn new(verb: Verb) -> Self {
        Self {
            verb,
            params: Vec::new(),
        }
    }

    /// Append a parameter, preserving insertion order
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// The command's verb
    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Check if the command needs a live session token
    pub fn requires_session(&self) -> bool {
        self.verb.requires_session()
    }

    /// Check if the command may go through the cache adapter
    pub fn cacheable(&self) -> bool {
        self.verb.cacheable()
    }

    /// Rendered (name, value) pairs with empty values dropped
    ///
    /// This is what the wire encoder emits and what cache keys are built
    /// from; the session pair is not part of it.
    pub fn rendered_params(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(key, value)| (key.clone(), value.render()))
            .filter(|(_, rendered)| !rendered.is_empty())
            .collect()
    }

    /// Encode the command into its wire form
    ///
    /// `session` must carry the live token for verbs that need one.
    pub fn encode(&self, session: Option<&str>) -> Result<String> {
        let mut pairs = self.rendered_params();

        for required in self.verb.required_params() {
            if !pairs.iter().any(|(key, _)| key == required) {
                return Err(ClientError::encoding(format!(
                    "{} requires parameter `{required}`",
                    self.verb.as_str()
                )));
            }
        }

        for (key, value) in &pairs {
            validate_wire_text(key)?;
            validate_wire_text(value)?;
        }

        if self.requires_session() {
            let token = session.ok_or(ClientError::NoActiveSession)?;
            pairs.push(("s".to_string(), token.to_string()));
        }

        if pairs.is_empty() {
            return Ok(self.verb.as_str().to_string());
        }

        let body = pairs
            .iter()
            .map(|(key, value)| format!("{key}={}", encode_value(value)))
            .collect::<Vec<_>>()
            .join("&");

        Ok(format!("{} {body}", self.verb.as_str()))
    }
}

// Newlines are escaped and carriage returns dropped by the codec; any other
// control character has no wire representation.
fn validate_wire_text(text: &str) -> Result<()> {
    if let Some(bad) = text
        .chars()
        .find(|c| c.is_control() && *c != '\n' && *c != '\r')
    {
        return Err(ClientError::encoding(format!(
            "value contains unrepresentable character {bad:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::codec::decode_value;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_ping_encodes_bare_verb() {
        let cmd = Command::new(Verb::Ping);
        assert_eq!(cmd.encode(None).unwrap(), "PING");
        assert!(!cmd.requires_session());
        assert!(!cmd.cacheable());
    }

    #[test]
    fn test_auth_parameter_order_is_preserved() {
        let cmd = Command::new(Verb::Auth)
            .arg("user", "alice")
            .arg("pass", "secret")
            .arg("protover", 3u16)
            .arg("client", "testclient")
            .arg("clientver", 1u16)
            .arg("enc", "UTF8");

        assert_eq!(
            cmd.encode(None).unwrap(),
            "AUTH user=alice&pass=secret&protover=3&client=testclient&clientver=1&enc=UTF8"
        );
    }

    #[test]
    fn test_ampersand_and_newline_are_escaped() {
        let cmd = Command::new(Verb::Auth)
            .arg("user", "a&b")
            .arg("pass", "line1\nline2")
            .arg("protover", 3u16)
            .arg("client", "c")
            .arg("clientver", 1u16);

        let encoded = cmd.encode(None).unwrap();
        assert!(encoded.contains("user=a&amp;b"));
        assert!(encoded.contains("pass=line1<br />line2"));
    }

    #[test]
    fn test_empty_values_are_omitted() {
        let cmd = Command::new(Verb::Ping).arg("nat", "").arg("tag", "x");
        assert_eq!(cmd.encode(None).unwrap(), "PING tag=x");
    }

    #[test]
    fn test_missing_required_parameter() {
        let cmd = Command::new(Verb::Anime).arg("aid", 1u32);
        let err = cmd.encode(Some("tok")).unwrap_err();
        assert!(matches!(err, ClientError::Encoding { .. }));
        assert!(err.to_string().contains("amask"));

        // An empty rendering counts as absent
        let cmd = Command::new(Verb::Encoding).arg("name", "");
        assert!(cmd.encode(None).is_err());
    }

    #[test]
    fn test_session_injection() {
        let cmd = Command::new(Verb::Anime)
            .arg("aid", 1u32)
            .arg("amask", ParamValue::Mask(0xb2f0e0fc000000));

        let encoded = cmd.encode(Some("iQUO2")).unwrap();
        assert_eq!(encoded, "ANIME aid=1&amask=b2f0e0fc000000&s=iQUO2");

        assert!(matches!(
            cmd.encode(None).unwrap_err(),
            ClientError::NoActiveSession
        ));
    }

    #[test]
    fn test_session_not_in_cache_key_params() {
        let cmd = Command::new(Verb::Anime)
            .arg("aid", 1u32)
            .arg("amask", ParamValue::Mask(0x80));
        let params = cmd.rendered_params();
        assert!(!params.iter().any(|(key, _)| key == "s"));
    }

    #[test]
    fn test_mask_renders_lowercase_hex() {
        assert_eq!(ParamValue::Mask(0xB2F0E0FC000000).render(), "b2f0e0fc000000");
        assert_eq!(ParamValue::Mask(0x80).render(), "80");
    }

    #[test]
    fn test_unrepresentable_value_fails() {
        let cmd = Command::new(Verb::Ping).arg("tag", "a\u{0007}b");
        assert!(matches!(
            cmd.encode(None).unwrap_err(),
            ClientError::Encoding { .. }
        ));
    }

    // Reference decoder for the round-trip property: split on `&`, rejoin
    // segments without `=` (they belong to an escaped ampersand), unescape.
    fn reference_decode(wire: &str) -> (String, BTreeMap<String, String>) {
        let (verb, body) = match wire.split_once(' ') {
            Some((verb, body)) => (verb, body),
            None => (wire, ""),
        };

        let mut segments: Vec<String> = Vec::new();
        for segment in body.split('&') {
            if segment.contains('=') || segments.is_empty() {
                segments.push(segment.to_string());
            } else {
                let last = segments.last_mut().unwrap();
                last.push('&');
                last.push_str(segment);
            }
        }

        let mut params = BTreeMap::new();
        for segment in segments.iter().filter(|s| !s.is_empty()) {
            let (key, value) = segment.split_once('=').unwrap();
            params.insert(key.to_string(), decode_value(value));
        }
        (verb.to_string(), params)
    }

    proptest! {
        #[test]
        fn prop_encode_then_decode_recovers_params(
            values in proptest::collection::btree_map(
                "[a-z][a-z0-9]{0,7}",
                "[a-zA-Z0-9 &@._!#-]{0,24}",
                0..6,
            )
        ) {
            let mut cmd = Command::new(Verb::Ping);
            for (key, value) in &values {
                cmd = cmd.arg(key.clone(), value.clone());
            }

            let wire = cmd.encode(None).unwrap();
            let (verb, decoded) = reference_decode(&wire);

            let expected: BTreeMap<String, String> = values
                .into_iter()
                .filter(|(_, v)| !v.is_empty())
                .collect();

            prop_assert_eq!(verb, "PING");
            prop_assert_eq!(decoded, expected);
        }
    }
}
