//! Wire envelopes shared by every endpoint.
//!
//! Success bodies arrive as `{ data, success, message? }`. Failures are
//! normalized to `{ status, data: { message, code?, details? } }` regardless
//! of the underlying transport error shape.

use crate::{EndpointError, TransportError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Uniform success envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Status discriminator of a normalized failure.
///
/// Either an HTTP status code or one of the synthetic markers used when no
/// HTTP response was received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FailureStatus {
    Http(u16),
    Synthetic(SyntheticStatus),
}

/// Synthetic status markers for failures without an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyntheticStatus {
    #[serde(rename = "FETCH_ERROR")]
    FetchError,
    #[serde(rename = "TIMEOUT_ERROR")]
    TimeoutError,
    #[serde(rename = "CUSTOM_ERROR")]
    CustomError,
}

impl fmt::Display for FailureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(code) => write!(f, "{}", code),
            Self::Synthetic(SyntheticStatus::FetchError) => f.write_str("FETCH_ERROR"),
            Self::Synthetic(SyntheticStatus::TimeoutError) => f.write_str("TIMEOUT_ERROR"),
            Self::Synthetic(SyntheticStatus::CustomError) => f.write_str("CUSTOM_ERROR"),
        }
    }
}

/// Body of a normalized failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Uniform failure envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiFailure {
    pub status: FailureStatus,
    pub data: FailureBody,
}

impl ApiFailure {
    /// Failure with an HTTP status and a plain message.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: FailureStatus::Http(status),
            data: FailureBody {
                message: message.into(),
                code: None,
                details: None,
            },
        }
    }

    /// Failure carrying a synthetic status marker.
    pub fn synthetic(status: SyntheticStatus, message: impl Into<String>) -> Self {
        Self {
            status: FailureStatus::Synthetic(status),
            data: FailureBody {
                message: message.into(),
                code: None,
                details: None,
            },
        }
    }

    /// The single human-readable message surfaced to consumers.
    pub fn message(&self) -> &str {
        &self.data.message
    }
}

impl From<&TransportError> for ApiFailure {
    fn from(err: &TransportError) -> Self {
        match err {
            TransportError::Network { reason } => {
                Self::synthetic(SyntheticStatus::FetchError, reason.clone())
            }
            TransportError::Timeout { timeout_ms } => Self::synthetic(
                SyntheticStatus::TimeoutError,
                format!("request timed out after {}ms", timeout_ms),
            ),
            TransportError::Auth { reason } => Self::http(401, reason.clone()),
            TransportError::Client { status, message } => Self::http(*status, message.clone()),
            TransportError::RateLimited => Self::http(429, "rate limited"),
            TransportError::Server { status, message } => Self::http(*status, message.clone()),
            TransportError::InvalidResponse { reason } => {
                Self::synthetic(SyntheticStatus::CustomError, reason.clone())
            }
        }
    }
}

impl From<&EndpointError> for ApiFailure {
    fn from(err: &EndpointError) -> Self {
        match err {
            EndpointError::Transport(transport) => Self::from(transport),
            EndpointError::Api { message } | EndpointError::Aggregated { message } => {
                Self::synthetic(SyntheticStatus::CustomError, message.clone())
            }
            EndpointError::Cache(cache) => {
                Self::synthetic(SyntheticStatus::CustomError, cache.to_string())
            }
            EndpointError::Decode { reason } => {
                Self::synthetic(SyntheticStatus::CustomError, reason.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_deserializes_success_body() {
        let json = r#"{"data": {"name": "9B"}, "success": true, "message": "ok"}"#;
        let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_str(json).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data["name"], "9B");
        assert_eq!(envelope.message.as_deref(), Some("ok"));
    }

    #[test]
    fn test_envelope_message_is_optional() {
        let json = r#"{"data": [], "success": true}"#;
        let envelope: ApiEnvelope<Vec<u32>> = serde_json::from_str(json).unwrap();
        assert!(envelope.message.is_none());
    }

    #[test]
    fn test_failure_status_serializes_untagged() {
        let http = ApiFailure::http(404, "not found");
        let json = serde_json::to_value(&http).unwrap();
        assert_eq!(json["status"], 404);

        let timeout = ApiFailure::synthetic(SyntheticStatus::TimeoutError, "slow");
        let json = serde_json::to_value(&timeout).unwrap();
        assert_eq!(json["status"], "TIMEOUT_ERROR");
    }

    #[test]
    fn test_failure_from_transport_error() {
        let err = TransportError::Network {
            reason: "connection refused".to_string(),
        };
        let failure = ApiFailure::from(&err);
        assert_eq!(
            failure.status,
            FailureStatus::Synthetic(SyntheticStatus::FetchError)
        );
        assert_eq!(failure.message(), "connection refused");

        let err = TransportError::Server {
            status: 503,
            message: "unavailable".to_string(),
        };
        let failure = ApiFailure::from(&err);
        assert_eq!(failure.status, FailureStatus::Http(503));
    }
}
