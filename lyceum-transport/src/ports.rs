//! Injection seams for the gateway.
//!
//! The gateway owns policy (timeout, retry, refresh); everything with a real
//! side effect - the wire, the token store, navigation - is injected behind
//! one of these traits so the policy is testable in isolation.

use crate::request::{PreparedRequest, WireResponse};
use async_trait::async_trait;
use lyceum_core::{Timestamp, TransportError};
use std::fmt;

/// Wire-level sender. One call is one attempt; no retries inside.
#[async_trait]
pub trait HttpSend: Send + Sync {
    async fn send(&self, request: PreparedRequest) -> Result<WireResponse, TransportError>;
}

/// Token triple produced by login and refresh responses.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionTokens {
    pub token: String,
    pub refresh_token: String,
    pub expires_at: Timestamp,
}

/// Session port: the only holder of authentication state.
///
/// Mutated exclusively by the gateway's refresh flow and by explicit
/// login/logout mutations; read by every request's header preparation.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Current bearer token, if a session exists.
    async fn token(&self) -> Option<String>;

    /// Current refresh token, if a session exists.
    async fn refresh_token(&self) -> Option<String>;

    /// Whether the current token is past its expiry.
    async fn is_expired(&self) -> bool;

    /// Tear down the session state.
    async fn clear(&self);

    /// Replace the session after a successful login or refresh.
    async fn set_from_refresh(&self, tokens: SessionTokens);
}

/// Reason attached to a sign-in redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    SessionExpired,
}

impl RedirectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SessionExpired => "session-expired",
        }
    }
}

impl fmt::Display for RedirectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigation port invoked when a session is torn down.
///
/// Keeps the transport layer free of any routing dependency; the host
/// application decides what "go to sign-in" means.
#[async_trait]
pub trait LoginRedirect: Send + Sync {
    async fn redirect_to_login(&self, callback_path: &str, reason: RedirectReason);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_reason_indicator() {
        assert_eq!(RedirectReason::SessionExpired.as_str(), "session-expired");
        assert_eq!(RedirectReason::SessionExpired.to_string(), "session-expired");
    }
}
