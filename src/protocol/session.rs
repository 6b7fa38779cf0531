//! Authentication state machine
//!
//! UDP exchanges are stateless; the session token issued on login is the
//! only continuity between them. This module is the single source of truth
//! for whether a command gets a token injected. It never logs in or retries
//! on its own; the caller owns that policy.

use crate::error::{ClientError, Result};
use std::fmt;

/// Session lifecycle state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No session; authenticated commands fail locally
    Unauthenticated,
    /// Live session issued by the server
    Authenticated {
        token: String,
        /// `ip:port` as seen by the server, when NAT info was requested
        nat_addr: Option<String>,
    },
    /// Server signaled the session is invalid or expired
    Expired,
}

impl SessionState {
    /// Check if a live token is held
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    /// The live token, if any
    pub fn token(&self) -> Option<&str> {
        match self {
            SessionState::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }

    /// Check if the transition to `next` is allowed by the state machine
    pub fn can_transition_to(&self, next: &SessionState) -> bool {
        use SessionState::*;

        match (self, next) {
            (Unauthenticated, Authenticated { .. }) => true,
            (Unauthenticated, Unauthenticated) => true,
            // Re-authentication replaces the token in place
            (Authenticated { .. }, Authenticated { .. }) => true,
            (Authenticated { .. }, Expired) => true,
            (Authenticated { .. }, Unauthenticated) => true,
            // A new login attempt must pass through Unauthenticated
            (Expired, Unauthenticated) => true,
            _ => false,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Unauthenticated
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Unauthenticated => write!(f, "unauthenticated"),
            SessionState::Authenticated { .. } => write!(f, "authenticated"),
            SessionState::Expired => write!(f, "expired"),
        }
    }
}

/// Tracks the session across command exchanges
#[derive(Debug, Default)]
pub struct SessionManager {
    state: SessionState,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The live token, or [`ClientError::NoActiveSession`]
    pub fn token(&self) -> Result<&str> {
        self.state.token().ok_or(ClientError::NoActiveSession)
    }

    /// Begin a login attempt; an expired session falls back to clean state
    pub fn begin_login(&mut self) {
        if self.state == SessionState::Expired {
            self.transition(SessionState::Unauthenticated);
        }
    }

    /// Apply the outcome of an AUTH exchange
    ///
    /// On 200/201 the token is the first word of the status text
    /// (`{token} LOGIN ACCEPTED`), followed by `ip:port` when NAT info was
    /// requested. Other codes (500 and friends) leave the state untouched;
    /// they come back to the caller in-band.
    pub fn complete_login(
        &mut self,
        code: u16,
        status_text: &str,
        nat: bool,
    ) -> Result<Option<(String, Option<String>)>> {
        if !matches!(code, 200 | 201) {
            return Ok(None);
        }

        let mut words = status_text.split_whitespace();
        let token = words
            .next()
            .filter(|word| *word != "LOGIN")
            .ok_or_else(|| {
                ClientError::malformed(format!("login accepted without a session token: {status_text:?}"))
            })?
            .to_string();

        let nat_addr = if nat {
            words.next().filter(|word| word.contains(':')).map(str::to_string)
        } else {
            None
        };

        self.transition(SessionState::Authenticated {
            token: token.clone(),
            nat_addr: nat_addr.clone(),
        });

        Ok(Some((token, nat_addr)))
    }

    /// Observe a status code on any exchange
    ///
    /// A session-failure code while authenticated expires the session and
    /// surfaces [`ClientError::SessionExpired`] once; everything else is
    /// the caller's to interpret.
    pub fn observe(&mut self, code: u16) -> Result<()> {
        if matches!(code, 501 | 506) && self.state.is_authenticated() {
            self.transition(SessionState::Expired);
            return Err(ClientError::SessionExpired { code });
        }
        Ok(())
    }

    /// Apply the outcome of a LOGOUT exchange
    ///
    /// 203 (logged out) and 403 (was not logged in) both clear the token.
    pub fn complete_logout(&mut self, code: u16) {
        if matches!(code, 203 | 403) {
            self.transition(SessionState::Unauthenticated);
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug_assert!(
            self.state.can_transition_to(&next),
            "invalid session transition: {} -> {}",
            self.state,
            next
        );
        self.state = next;
    }
}
