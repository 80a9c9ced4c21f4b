//! Shared fixtures for endpoint tests.

use async_trait::async_trait;
use lyceum_cache::CacheRegistry;
use lyceum_core::{ClientConfig, TransportError};
use lyceum_transport::{
    Gateway, GatewayConfig, HttpSend, InMemorySessionStore, LoginRedirect, PreparedRequest,
    RedirectReason, SessionTokens, WireResponse,
};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Scripted sender: pops one reply per call, records what was sent.
#[derive(Default)]
pub(crate) struct ScriptedSender {
    script: Mutex<VecDeque<Result<WireResponse, TransportError>>>,
    seen: Mutex<Vec<PreparedRequest>>,
}

impl ScriptedSender {
    pub(crate) async fn sent(&self) -> Vec<PreparedRequest> {
        self.seen.lock().await.clone()
    }
}

#[async_trait]
impl HttpSend for ScriptedSender {
    async fn send(&self, request: PreparedRequest) -> Result<WireResponse, TransportError> {
        self.seen.lock().await.push(request);
        self.script
            .lock()
            .await
            .pop_front()
            .expect("unexpected extra send")
    }
}

/// Redirect port that records nothing; endpoint tests never tear down.
pub(crate) struct NoopRedirect;

#[async_trait]
impl LoginRedirect for NoopRedirect {
    async fn redirect_to_login(&self, _callback_path: &str, _reason: RedirectReason) {}
}

pub(crate) struct TestHarness {
    pub registry:
        crate::registry::EndpointRegistry<ScriptedSender, InMemorySessionStore, NoopRedirect>,
    pub sender: Arc<ScriptedSender>,
}

pub(crate) fn test_config() -> ClientConfig {
    serde_json::from_value(json!({
        "api_root": "https://api.example.school",
        "service_roots": {},
        "locale": "en-US",
        "request_timeout_ms": 30000,
        "retry": {"max_retries": 3, "base_delay_ms": 1000, "jitter_ms": 1000}
    }))
    .expect("static test config is valid")
}

/// Build a registry wired to a scripted sender and a live in-memory session.
pub(crate) fn harness(replies: Vec<WireResponse>) -> TestHarness {
    let sender = Arc::new(ScriptedSender {
        script: Mutex::new(replies.into_iter().map(Ok).collect()),
        seen: Mutex::new(Vec::new()),
    });
    let session = Arc::new(InMemorySessionStore::with_tokens(SessionTokens {
        token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
    }));
    let redirect = Arc::new(NoopRedirect);
    let config = test_config();

    let gateway = Gateway::new(
        Arc::clone(&sender),
        Arc::clone(&session),
        redirect,
        GatewayConfig::from_client_config(&config),
        config.root_for(lyceum_core::Service::Auth),
    );
    let registry = crate::registry::EndpointRegistry::new(
        gateway,
        Arc::new(CacheRegistry::new()),
        config,
        session,
    );
    TestHarness { registry, sender }
}

/// Wrap a payload in the uniform success envelope.
pub(crate) fn ok_envelope(data: Value) -> WireResponse {
    WireResponse::new(200, json!({"data": data, "success": true}))
}
