//! Reqwest-backed wire sender.
//!
//! Timeouts and retries live in the gateway; this sender issues exactly one
//! HTTP exchange per call and maps wire failures into the error taxonomy.

use crate::ports::HttpSend;
use crate::request::{PreparedRequest, WireResponse};
use async_trait::async_trait;
use lyceum_core::TransportError;
use serde_json::Value;

/// Production [`HttpSend`] implementation over a shared reqwest client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestSender {
    client: reqwest::Client,
}

impl ReqwestSender {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestSender {
    async fn send(&self, request: PreparedRequest) -> Result<WireResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method.into(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_send_error)?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(map_send_error)?;

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                // Keep non-JSON error bodies readable for message extraction.
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        Ok(WireResponse::new(status, body))
    }
}

fn map_send_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout { timeout_ms: 0 }
    } else if err.is_decode() {
        TransportError::InvalidResponse {
            reason: err.to_string(),
        }
    } else {
        TransportError::Network {
            reason: err.to_string(),
        }
    }
}
