//! In-memory session store.
//!
//! The persisted token store lives outside the data core and is consumed
//! through the [`SessionStore`] contract only; this implementation backs
//! tests and hosts that keep the session in process memory.

use crate::ports::{SessionStore, SessionTokens};
use async_trait::async_trait;
use chrono::Utc;

/// Session store holding the token triple behind an async lock.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    tokens: tokio::sync::RwLock<Option<SessionTokens>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct with an existing session, e.g. restored by the host.
    pub fn with_tokens(tokens: SessionTokens) -> Self {
        Self {
            tokens: tokio::sync::RwLock::new(Some(tokens)),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn token(&self) -> Option<String> {
        self.tokens.read().await.as_ref().map(|t| t.token.clone())
    }

    async fn refresh_token(&self) -> Option<String> {
        self.tokens
            .read()
            .await
            .as_ref()
            .map(|t| t.refresh_token.clone())
    }

    async fn is_expired(&self) -> bool {
        match self.tokens.read().await.as_ref() {
            Some(tokens) => tokens.expires_at <= Utc::now(),
            None => true,
        }
    }

    async fn clear(&self) {
        *self.tokens.write().await = None;
    }

    async fn set_from_refresh(&self, tokens: SessionTokens) {
        *self.tokens.write().await = Some(tokens);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn tokens(expires_in_secs: i64) -> SessionTokens {
        SessionTokens {
            token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        }
    }

    #[tokio::test]
    async fn test_empty_store_is_expired() {
        let store = InMemorySessionStore::new();
        assert!(store.is_expired().await);
        assert!(store.token().await.is_none());
        assert!(store.refresh_token().await.is_none());
    }

    #[tokio::test]
    async fn test_set_and_read_tokens() {
        let store = InMemorySessionStore::new();
        store.set_from_refresh(tokens(3600)).await;
        assert_eq!(store.token().await.as_deref(), Some("access"));
        assert_eq!(store.refresh_token().await.as_deref(), Some("refresh"));
        assert!(!store.is_expired().await);
    }

    #[tokio::test]
    async fn test_past_expiry_reports_expired() {
        let store = InMemorySessionStore::with_tokens(tokens(-5));
        assert!(store.is_expired().await);
        // Token is still readable; header preparation decides what to do.
        assert!(store.token().await.is_some());
    }

    #[tokio::test]
    async fn test_clear_removes_session() {
        let store = InMemorySessionStore::with_tokens(tokens(3600));
        store.clear().await;
        assert!(store.token().await.is_none());
        assert!(store.is_expired().await);
    }
}
