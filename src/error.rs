//! Error types for the AniDB UDP client
//!
//! Domain-level server outcomes (e.g. "no such anime") are NOT errors; they
//! come back as status codes on [`crate::DecodedResult`]. Only transport,
//! encoding, decoding and session failures surface here.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client error taxonomy
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network I/O error
    #[error("network I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No reply datagram arrived within the deadline
    #[error("no reply within {0:?}")]
    NetworkTimeout(Duration),

    /// Command could not be encoded (missing/unrepresentable parameter)
    #[error("encoding error: {message}")]
    Encoding { message: String },

    /// Reply does not match the minimal wire grammar
    #[error("malformed response: {message}")]
    MalformedResponse { message: String },

    /// A payload field failed to parse under its declared type
    #[error("field `{field}` in record {record} failed to decode: {message}")]
    FieldDecode {
        field: String,
        record: usize,
        message: String,
    },

    /// Outbound datagram exceeds the protocol size cap
    #[error("datagram size {size} exceeds maximum {max_size}")]
    PayloadTooLarge { size: usize, max_size: usize },

    /// An authenticated command was attempted without a live session
    #[error("no active session; authenticate first")]
    NoActiveSession,

    /// The server signaled that the session is invalid or expired
    #[error("session invalid or expired (server code {code})")]
    SessionExpired { code: u16 },

    /// Cache backing store failure
    #[error("cache store error: {message}")]
    Cache { message: String },
}

impl ClientError {
    /// Create an encoding error
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a field decode error
    pub fn field_decode(
        field: impl Into<String>,
        record: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::FieldDecode {
            field: field.into(),
            record,
            message: message.into(),
        }
    }

    /// Create a payload too large error
    pub fn payload_too_large(size: usize, max_size: usize) -> Self {
        Self::PayloadTooLarge { size, max_size }
    }

    /// Create a cache store error
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Check if this error may succeed on a caller-driven retry
    ///
    /// Retry policy belongs to the caller; AniDB flood control makes blind
    /// retries dangerous, so the library only classifies.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::NetworkTimeout(_))
    }

    /// Check if this error indicates a need to re-authenticate
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            Self::NoActiveSession | Self::SessionExpired { .. }
        )
    }
}

/// Status code returned by the AniDB server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseCode(pub u16);

impl ResponseCode {
    /// Check if the code indicates success
    pub fn is_success(&self) -> bool {
        matches!(self.0, 200..=299)
    }

    /// Check if the code indicates a data reply (2xx/3xx with payload semantics)
    pub fn is_data(&self) -> bool {
        matches!(self.0, 200..=399)
    }

    /// Check if the code indicates an error reported by the server
    pub fn is_error(&self) -> bool {
        self.0 >= 500
    }

    /// Check if the code signals an invalid or expired session
    pub fn is_session_failure(&self) -> bool {
        matches!(self.0, 501 | 506)
    }

    /// Human-readable description of the code
    pub fn description(&self) -> &'static str {
        match self.0 {
            200 => "LOGIN ACCEPTED",
            201 => "LOGIN ACCEPTED - NEW VERSION AVAILABLE",
            203 => "LOGGED OUT",
            219 => "ENCODING CHANGED",
            230 => "ANIME",
            233 => "ANIME DESCRIPTION",
            235 => "CHARACTER",
            300 => "PONG",
            330 => "NO SUCH ANIME",
            335 => "NO SUCH CHARACTER",
            403 => "NOT LOGGED IN",
            500 => "LOGIN FAILED",
            501 => "LOGIN FIRST",
            502 => "ACCESS DENIED",
            503 => "CLIENT VERSION OUTDATED",
            504 => "CLIENT BANNED",
            505 => "ILLEGAL INPUT OR ACCESS DENIED",
            506 => "INVALID SESSION",
            519 => "ENCODING NOT SUPPORTED",
            555 => "BANNED",
            598 => "UNKNOWN COMMAND",
            600 => "INTERNAL SERVER ERROR",
            601 => "ANIDB OUT OF SERVICE",
            602 => "SERVER BUSY",
            604 => "TIMEOUT - DELAY AND RESUBMIT",
            _ => "UNKNOWN RESPONSE CODE",
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.description())
    }
}
