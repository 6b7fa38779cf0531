//! Reply decoding
//!
//! [`RawResponse`] captures the minimal wire grammar: a status line and
//! zero or more payload records. [`DecodedResult`] is the typed mapping
//! handed back to callers, with the status code in-band so domain outcomes
//! (e.g. "no such anime") can be branched on without error handling.

use crate::error::{ClientError, Result};
use crate::protocol::codec::{parse_status_line, split_fields};
use crate::protocol::fields::{FieldError, FieldValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A reply split into status code, status text and raw payload lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub code: u16,
    pub text: String,
    payload: Vec<String>,
}

impl RawResponse {
    /// Parse a reply datagram
    ///
    /// Fails with [`crate::ClientError::MalformedResponse`] when the reply
    /// does not start with a three-digit status code; no partial data is
    /// returned in that case.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut lines = raw.lines();
        let status_line = lines.next().unwrap_or("");
        let (code, text) = parse_status_line(status_line)?;

        let mut payload: Vec<String> = lines.map(str::to_string).collect();
        while payload.last().is_some_and(|line| line.is_empty()) {
            payload.pop();
        }

        Ok(Self {
            code,
            text,
            payload,
        })
    }

    /// Raw payload lines, one record per line
    pub fn payload(&self) -> &[String] {
        &self.payload
    }

    /// Payload records split into unescaped positional fields
    pub fn records(&self) -> Vec<Vec<String>> {
        self.payload.iter().map(|line| split_fields(line)).collect()
    }

    /// Fields of the first record, if any payload came back
    pub fn first_record(&self) -> Option<Vec<String>> {
        self.payload.first().map(|line| split_fields(line))
    }
}

/// Typed result of a command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedResult {
    /// Server status code
    pub code: u16,
    /// Decoded field mapping; missing keys mean "not provided"
    pub fields: BTreeMap<String, FieldValue>,
    /// Fields that failed their decode rule and were omitted
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<FieldError>,
    /// Stamp of the stored entry, present only when served from cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl DecodedResult {
    /// Create an empty result for a status code
    pub fn new(code: u16) -> Self {
        Self {
            code,
            fields: BTreeMap::new(),
            field_errors: Vec::new(),
            updated_at: None,
        }
    }

    /// Create a result from a decoded mapping
    pub fn with_fields(
        code: u16,
        fields: BTreeMap<String, FieldValue>,
        field_errors: Vec<FieldError>,
    ) -> Self {
        Self {
            code,
            fields,
            field_errors,
            updated_at: None,
        }
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Check if the status code indicates success
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// Check if this result came from the cache adapter
    pub fn is_cached(&self) -> bool {
        self.updated_at.is_some()
    }

    /// Promote partial-decode diagnostics to an error
    ///
    /// The lenient default keeps partially decoded records; callers that
    /// would rather fail than miss a field can chain this.
    pub fn strict(self) -> Result<Self> {
        if let Some(first) = self.field_errors.first() {
            return Err(ClientError::field_decode(
                first.field.clone(),
                first.record,
                format!("raw content {:?}", first.raw),
            ));
        }
        Ok(self)
    }
}
