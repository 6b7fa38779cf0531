//! Field-mask namespaces and the mask decode engine
//!
//! Commands that accept a bitmask return only the requested fields, in the
//! protocol's documented byte layout. Each namespace is a read-only table
//! binding bit positions to names and decode rules, declared most
//! significant relevant bit first; decoding walks the table and consumes
//! one positional field per requested bit.

pub mod anime;

use crate::protocol::fields::{FieldError, FieldKind, FieldSpec, FieldValue, decode_field};
use std::collections::BTreeMap;

/// One bit of a mask namespace
#[derive(Debug, Clone, Copy)]
pub struct MaskBit {
    pub bit: u64,
    pub field: FieldSpec,
}

impl MaskBit {
    pub const fn new(bit: u64, name: &'static str, kind: FieldKind) -> Self {
        Self {
            bit,
            field: FieldSpec::new(name, kind),
        }
    }
}

/// Expand a mask into the field names it selects, in table order
pub fn field_names(table: &[MaskBit], mask: u64) -> Vec<&'static str> {
    table
        .iter()
        .filter(|entry| mask & entry.bit != 0)
        .map(|entry| entry.field.name)
        .collect()
}

/// Decode a masked record
///
/// Consumes raw fields in lock-step with the set bits. When the server
/// returns fewer fields than bits set, the remaining names are treated as
/// absent and omitted; unparsable fields are omitted and reported.
pub fn decode_masked(
    table: &[MaskBit],
    mask: u64,
    raw_fields: &[String],
    record: usize,
) -> (BTreeMap<String, FieldValue>, Vec<FieldError>) {
    let mut fields = BTreeMap::new();
    let mut errors = Vec::new();
    let mut raw = raw_fields.iter();

    for entry in table.iter().filter(|entry| mask & entry.bit != 0) {
        let Some(value) = raw.next() else {
            break;
        };
        match decode_field(entry.field.kind, value) {
            Ok(decoded) => {
                fields.insert(entry.field.name.to_string(), decoded);
            }
            Err(_) => errors.push(FieldError {
                field: entry.field.name.to_string(),
                record,
                raw: value.clone(),
            }),
        }
    }

    (fields, errors)
}
