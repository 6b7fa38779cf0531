//! AniDB UDP protocol implementation
//!
//! - `codec`: wire-level escaping and line/field splitting
//! - `command`: command values and the wire-format encoder
//! - `response`: raw reply decoding and the typed result mapping
//! - `fields`: per-field decode rules and fixed response templates
//! - `masks`: field-mask namespaces and the mask decode engine
//! - `session`: authentication state machine

pub mod codec;
pub mod command;
pub mod fields;
pub mod masks;
pub mod response;
pub mod session;

pub use command::{Command, ParamValue, Verb};
pub use response::{DecodedResult, RawResponse};
pub use session::{SessionManager, SessionState};

/// Protocol version sent as the `protover` AUTH parameter
pub const PROTOCOL_VERSION: u8 = 3;

/// Default AniDB server address
pub const DEFAULT_SERVER: &str = "api.anidb.net";

/// Default AniDB UDP port
pub const DEFAULT_PORT: u16 = 9000;

/// Maximum outbound datagram size (considering PPPoE)
pub const MAX_PACKET_SIZE: usize = 1400;

/// Receive buffer size for a single reply datagram
pub const MAX_RECEIVE_SIZE: usize = 4096;

/// Encoding announced to the server via the `enc` AUTH parameter
pub const WIRE_ENCODING: &str = "UTF8";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_constants() {
        assert_eq!(PROTOCOL_VERSION, 3);
        assert_eq!(DEFAULT_SERVER, "api.anidb.net");
        assert_eq!(DEFAULT_PORT, 9000);
        assert_eq!(MAX_PACKET_SIZE, 1400);
        assert_eq!(MAX_RECEIVE_SIZE, 4096);
    }
}
