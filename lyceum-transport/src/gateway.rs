//! Transport gateway: timeout, retry/backoff and auth-refresh policy.
//!
//! One `execute` call is one logical request. Each attempt gets its own
//! 30 second timeout; retryable outcomes (network failure, timeout, 408,
//! 429, 5xx) are re-attempted up to three times with exponential backoff
//! plus jitter. A 401 on the first attempt triggers exactly one token
//! refresh and one extra retry outside the retry budget; any other 401
//! tears the session down and redirects to sign-in.

use crate::ports::{HttpSend, LoginRedirect, RedirectReason, SessionStore, SessionTokens};
use crate::request::{ApiRequest, HttpMethod, PreparedRequest, WireResponse};
use lyceum_core::{ClientConfig, TransportError};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Gateway policy knobs.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Timeout applied to each attempt, not to the logical operation.
    pub attempt_timeout: Duration,
    /// Maximum retries after the initial attempt.
    pub max_retries: u32,
    /// Base backoff delay; retry *n* waits `base * 2^n` plus jitter.
    pub base_delay_ms: u64,
    /// Upper bound of the uniform jitter added to each backoff delay.
    pub jitter_ms: u64,
    /// Locale sent as `accept-language`.
    pub locale: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(30),
            max_retries: 3,
            base_delay_ms: 1000,
            jitter_ms: 1000,
            locale: "en-US".to_string(),
        }
    }
}

impl GatewayConfig {
    pub fn from_client_config(config: &ClientConfig) -> Self {
        Self {
            attempt_timeout: Duration::from_millis(config.request_timeout_ms),
            max_retries: config.retry.max_retries,
            base_delay_ms: config.retry.base_delay_ms,
            jitter_ms: config.retry.jitter_ms,
            locale: config.locale.clone(),
        }
    }
}

/// Token payload of the `/auth/refresh` success envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshPayload {
    token: String,
    refresh_token: String,
    expires_at: chrono::DateTime<chrono::Utc>,
}

/// The transport gateway.
///
/// Generic over its three ports so policy is testable without a network,
/// a token store or a router.
pub struct Gateway<H, S, R> {
    sender: Arc<H>,
    session: Arc<S>,
    redirect: Arc<R>,
    config: GatewayConfig,
    /// Root of the auth service, used by the internal refresh call.
    auth_root: String,
}

impl<H, S, R> Gateway<H, S, R>
where
    H: HttpSend,
    S: SessionStore,
    R: LoginRedirect,
{
    pub fn new(
        sender: Arc<H>,
        session: Arc<S>,
        redirect: Arc<R>,
        config: GatewayConfig,
        auth_root: impl Into<String>,
    ) -> Self {
        Self {
            sender,
            session,
            redirect,
            config,
            auth_root: auth_root.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Execute one logical request under the full policy.
    pub async fn execute(&self, request: &ApiRequest) -> Result<WireResponse, TransportError> {
        let mut attempt: u32 = 0;
        let mut refresh_used = false;

        loop {
            let prepared = self.prepare(request).await;
            debug!(
                method = %request.method,
                url = %request.url,
                attempt,
                "issuing request attempt"
            );

            let outcome = self.send_with_timeout(prepared).await;

            let error = match outcome {
                Ok(response) if response.status == 401 => {
                    if attempt == 0 && !refresh_used {
                        refresh_used = true;
                        match self.refresh_session().await {
                            Ok(()) => {
                                info!(url = %request.url, "token refreshed, retrying request");
                                // One extra retry outside the normal budget.
                                continue;
                            }
                            Err(err) => {
                                self.teardown(request).await;
                                return Err(err);
                            }
                        }
                    }
                    self.teardown(request).await;
                    return Err(TransportError::Auth {
                        reason: "session expired".to_string(),
                    });
                }
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) => Self::status_error(&response),
                Err(err) => err,
            };

            if !error.is_retryable() || attempt >= self.config.max_retries {
                return Err(error);
            }

            attempt += 1;
            let delay = self.retry_delay(attempt);
            warn!(
                url = %request.url,
                retry = attempt,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "retrying after failure"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Header preparation: bearer token (when present and unexpired), a
    /// per-request trace id, and the locale indicator.
    async fn prepare(&self, request: &ApiRequest) -> PreparedRequest {
        let mut headers = vec![
            ("content-type".to_string(), "application/json".to_string()),
            ("accept".to_string(), "application/json".to_string()),
            (
                "x-request-id".to_string(),
                uuid::Uuid::new_v4().to_string(),
            ),
            ("accept-language".to_string(), self.config.locale.clone()),
        ];
        if let Some(token) = self.session.token().await {
            if !self.session.is_expired().await {
                headers.push(("authorization".to_string(), format!("Bearer {}", token)));
            }
        }
        PreparedRequest {
            method: request.method,
            url: request.url.clone(),
            headers,
            body: request.body.clone(),
        }
    }

    async fn send_with_timeout(
        &self,
        prepared: PreparedRequest,
    ) -> Result<WireResponse, TransportError> {
        let timeout_ms = self.config.attempt_timeout.as_millis() as u64;
        match tokio::time::timeout(self.config.attempt_timeout, self.sender.send(prepared)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout { timeout_ms }),
        }
    }

    /// Issue the single token-refresh call. Not subject to retry policy.
    async fn refresh_session(&self) -> Result<(), TransportError> {
        let refresh_token =
            self.session
                .refresh_token()
                .await
                .ok_or_else(|| TransportError::Auth {
                    reason: "no refresh token".to_string(),
                })?;

        let prepared = PreparedRequest {
            method: HttpMethod::Post,
            url: format!("{}/auth/refresh", self.auth_root),
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                ("accept".to_string(), "application/json".to_string()),
                (
                    "x-request-id".to_string(),
                    uuid::Uuid::new_v4().to_string(),
                ),
                ("accept-language".to_string(), self.config.locale.clone()),
            ],
            body: Some(json!({ "refreshToken": refresh_token })),
        };

        let response = self.send_with_timeout(prepared).await?;
        if !response.is_success() {
            return Err(TransportError::Auth {
                reason: error_message(&response.body, "token refresh rejected"),
            });
        }

        let payload: RefreshPayload = serde_json::from_value(
            response
                .body
                .get("data")
                .cloned()
                .unwrap_or(Value::Null),
        )
        .map_err(|err| TransportError::Auth {
            reason: format!("malformed refresh response: {}", err),
        })?;

        self.session
            .set_from_refresh(SessionTokens {
                token: payload.token,
                refresh_token: payload.refresh_token,
                expires_at: payload.expires_at,
            })
            .await;
        Ok(())
    }

    /// Clear the session and hand navigation to the host.
    async fn teardown(&self, request: &ApiRequest) {
        warn!(path = %request.path, "session torn down, redirecting to sign-in");
        self.session.clear().await;
        self.redirect
            .redirect_to_login(&request.path, RedirectReason::SessionExpired)
            .await;
    }

    /// Map a non-success status to the error taxonomy.
    ///
    /// 408 is treated as a timeout, 429 as rate limiting; both retryable.
    fn status_error(response: &WireResponse) -> TransportError {
        match response.status {
            408 => TransportError::Timeout { timeout_ms: 0 },
            429 => TransportError::RateLimited,
            status if (500..600).contains(&status) => TransportError::Server {
                status,
                message: error_message(&response.body, "server error"),
            },
            status => TransportError::Client {
                status,
                message: error_message(&response.body, "request rejected"),
            },
        }
    }

    /// Delay before retry `n` (1-indexed): `base * 2^n` plus uniform jitter.
    fn retry_delay(&self, retry: u32) -> Duration {
        let backoff = self
            .config
            .base_delay_ms
            .saturating_mul(1u64 << retry.min(16));
        Duration::from_millis(backoff.saturating_add(jitter(self.config.jitter_ms)))
    }
}

/// Jitter in `[0, bound)` derived from the subsecond clock.
fn jitter(bound_ms: u64) -> u64 {
    if bound_ms == 0 {
        return 0;
    }
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_nanos(0))
        .subsec_nanos() as u64;
    nanos % bound_ms
}

/// Pull a human-readable message out of an arbitrary error body.
fn error_message(body: &Value, fallback: &str) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .or_else(|| body.pointer("/data/message").and_then(Value::as_str))
        .unwrap_or(fallback)
        .to_string()
}
