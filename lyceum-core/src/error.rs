//! Error types for LYCEUM operations

use thiserror::Error;

/// Transport gateway errors.
///
/// `Network`, `Timeout`, `RateLimited` and `Server` are retried inside the
/// gateway and only surfaced once the retry budget is exhausted. `Auth` is
/// surfaced after the refresh-then-teardown flow. `Client` is never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Network error: {reason}")]
    Network { reason: String },

    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Authentication failed: {reason}")]
    Auth { reason: String },

    #[error("Client error {status}: {message}")]
    Client { status: u16, message: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Invalid response: {reason}")]
    InvalidResponse { reason: String },
}

impl TransportError {
    /// Whether the gateway may retry an attempt that ended this way.
    ///
    /// Covers network/connection failures, timeouts and 429/5xx. 408 is
    /// mapped to `Timeout` during status classification.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Timeout { .. } | Self::RateLimited | Self::Server { .. }
        )
    }
}

/// Cache registry errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Failed to serialize query arguments for {endpoint_id}: {reason}")]
    ArgsSerialization { endpoint_id: String, reason: String },

    #[error("In-flight fetch for {key} was abandoned")]
    FetchAbandoned { key: String },
}

/// Endpoint registry errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EndpointError {
    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("API rejected the request: {message}")]
    Api { message: String },

    #[error("Bulk operation failed: {message}")]
    Aggregated { message: String },

    #[error("Failed to decode response: {reason}")]
    Decode { reason: String },
}

impl EndpointError {
    /// Reduce the error to the single string surfaced to consumers.
    ///
    /// Raw transport/status codes never reach the presentation layer.
    pub fn surface_message(&self) -> String {
        match self {
            Self::Transport(err) => err.to_string(),
            Self::Cache(err) => err.to_string(),
            Self::Api { message } | Self::Aggregated { message } => message.clone(),
            Self::Decode { reason } => reason.clone(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or LYCEUM_CONFIG)")]
    MissingConfigPath,

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Master error type for all LYCEUM errors.
#[derive(Debug, Error)]
pub enum LyceumError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Endpoint error: {0}")]
    Endpoint(#[from] EndpointError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for LYCEUM operations.
pub type LyceumResult<T> = Result<T, LyceumError>;
