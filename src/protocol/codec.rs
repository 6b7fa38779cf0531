//! Wire-level escaping and splitting
//!
//! AniDB replies are plain text: a status line followed by payload lines,
//! one record per line, fields separated by `|`. Option values sent to the
//! server use HTML-form style escaping for `&` plus a newline substitution.

use crate::error::{ClientError, Result};

/// Field separator within a payload record
pub const FIELD_SEPARATOR: char = '|';

/// Secondary separator for multi-valued fields
pub const LIST_SEPARATOR: char = ',';

/// Separator between compound sub-records inside one field
pub const BLOCK_SEPARATOR: char = '\'';

/// Newline substitution for multiline option values
pub const ENCODED_NEWLINE: &str = "<br />";

/// Escape an option value for transmission
///
/// Only `&` and newlines need substitution; everything else is sent as-is
/// and encoded at the datagram level.
pub fn encode_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len() + 8);

    for ch in value.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '\n' => result.push_str(ENCODED_NEWLINE),
            '\r' => continue,
            _ => result.push(ch),
        }
    }

    result
}

/// Unescape a field value from a reply
///
/// Reverses [`encode_value`] and additionally handles the server-side
/// substitutions: backtick for apostrophe, and a lone `/` for a literal `|`.
pub fn decode_value(value: &str) -> String {
    if value == "/" {
        return "|".to_string();
    }

    let mut result = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(ch) = rest.chars().next() {
        if rest.starts_with("&amp;") {
            result.push('&');
            rest = &rest[5..];
        } else if rest.starts_with(ENCODED_NEWLINE) {
            result.push('\n');
            rest = &rest[ENCODED_NEWLINE.len()..];
        } else if ch == '`' {
            result.push('\'');
            rest = &rest[1..];
        } else {
            result.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }

    result
}

/// Parse a status line into code and status text
///
/// The code must be a three-digit integer; anything else fails the minimal
/// wire grammar.
pub fn parse_status_line(line: &str) -> Result<(u16, String)> {
    let mut parts = line.splitn(2, ' ');
    let code_token = parts.next().unwrap_or("");

    if code_token.len() != 3 || !code_token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ClientError::malformed(format!(
            "invalid status code: {code_token:?}"
        )));
    }

    let code = code_token.parse::<u16>().map_err(|_| {
        ClientError::malformed(format!("invalid status code: {code_token:?}"))
    })?;
    let text = parts.next().unwrap_or("").to_string();

    Ok((code, text))
}

/// Split a payload line into unescaped positional fields
pub fn split_fields(line: &str) -> Vec<String> {
    line.split(FIELD_SEPARATOR).map(decode_value).collect()
}
