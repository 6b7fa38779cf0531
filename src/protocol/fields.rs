//! Per-field decode rules
//!
//! Responses are positional; this module binds positions to names and typed
//! decode rules. A field that fails its rule is omitted from the result and
//! reported as a [`FieldError`] so the rest of the record stays usable.

use crate::protocol::codec::{BLOCK_SEPARATOR, LIST_SEPARATOR};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Decode rule for one positional field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain string passthrough
    Str,
    /// Decimal integer
    Int,
    /// `"1"` is true, everything else false
    Bool,
    /// Unix epoch seconds
    Date,
    /// Comma-separated list of strings
    StrList,
    /// Comma-separated list of integers
    IntList,
    /// Apostrophe-separated compound sub-records, kept as raw strings
    BlockList,
}

/// Typed value of a decoded field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Bool(bool),
    Date(DateTime<Utc>),
    StrList(Vec<String>),
    IntList(Vec<i64>),
}

impl FieldValue {
    /// Borrow as a string, if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer value, if this is an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrow as a string list, if this is one
    pub fn as_str_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::StrList(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow as an integer list, if this is one
    pub fn as_int_list(&self) -> Option<&[i64]> {
        match self {
            FieldValue::IntList(items) => Some(items),
            _ => None,
        }
    }

    /// Get the date value, if this is a date
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

/// Name and decode rule for one template position
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Diagnostic for a field that failed its decode rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name from the template or mask table
    pub field: String,
    /// Zero-based record index within the reply payload
    pub record: usize,
    /// Raw content that failed to parse
    pub raw: String,
}

/// Decode one raw field under a rule
pub fn decode_field(kind: FieldKind, raw: &str) -> std::result::Result<FieldValue, String> {
    match kind {
        FieldKind::Str => Ok(FieldValue::Str(raw.to_string())),
        FieldKind::Int => raw
            .parse::<i64>()
            .map(FieldValue::Int)
            .map_err(|e| format!("not an integer: {e}")),
        FieldKind::Bool => Ok(FieldValue::Bool(raw == "1")),
        FieldKind::Date => {
            let secs = raw
                .parse::<i64>()
                .map_err(|e| format!("not an epoch timestamp: {e}"))?;
            Utc.timestamp_opt(secs, 0)
                .single()
                .map(FieldValue::Date)
                .ok_or_else(|| format!("epoch timestamp out of range: {secs}"))
        }
        FieldKind::StrList => Ok(FieldValue::StrList(split_list(raw, LIST_SEPARATOR))),
        FieldKind::IntList => {
            let mut items = Vec::new();
            for part in split_list(raw, LIST_SEPARATOR) {
                items.push(
                    part.parse::<i64>()
                        .map_err(|e| format!("list item {part:?} is not an integer: {e}"))?,
                );
            }
            Ok(FieldValue::IntList(items))
        }
        FieldKind::BlockList => Ok(FieldValue::StrList(split_list(raw, BLOCK_SEPARATOR))),
    }
}

// Empty raw content is an empty list, never a list of one empty element.
fn split_list(raw: &str, separator: char) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(separator).map(str::to_string).collect()
}

/// Decode a record against a fixed template
///
/// Walks the template in order, consuming raw fields in lock-step. When the
/// record has fewer fields than the template expects, the remaining names
/// are absent from the mapping (not defaulted). Unparsable fields are
/// omitted and reported.
pub fn decode_record(
    template: &[FieldSpec],
    raw_fields: &[String],
    record: usize,
) -> (BTreeMap<String, FieldValue>, Vec<FieldError>) {
    let mut fields = BTreeMap::new();
    let mut errors = Vec::new();

    for (spec, raw) in template.iter().zip(raw_fields.iter()) {
        match decode_field(spec.kind, raw) {
            Ok(value) => {
                fields.insert(spec.name.to_string(), value);
            }
            Err(_) => errors.push(FieldError {
                field: spec.name.to_string(),
                record,
                raw: raw.clone(),
            }),
        }
    }

    (fields, errors)
}
