//! Configuration loading for the LYCEUM client core.
//!
//! All fields are required unless explicitly marked optional. No defaults
//! are invented for endpoint roots; the environment owns them.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Client-wide configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Base endpoint root, e.g. `https://api.example.school`.
    pub api_root: String,
    /// Per-service root overrides; services without an override use
    /// `api_root`.
    #[serde(default)]
    pub service_roots: ServiceRoots,
    /// Locale sent as `accept-language` on every request.
    pub locale: String,
    /// Per-attempt timeout in milliseconds.
    pub request_timeout_ms: u64,
    pub retry: RetryConfig,
}

/// Optional per-service endpoint roots.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceRoots {
    pub auth: Option<String>,
    pub classroom: Option<String>,
    pub group: Option<String>,
    pub student: Option<String>,
    pub teacher: Option<String>,
    pub mark: Option<String>,
    pub attendance: Option<String>,
    pub post: Option<String>,
    pub school: Option<String>,
}

/// Retry/backoff tuning for the transport gateway.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Maximum retries after the initial attempt.
    pub max_retries: u32,
    /// Base delay in milliseconds; retry *n* waits `base * 2^n` plus jitter.
    pub base_delay_ms: u64,
    /// Upper bound of the uniform jitter added to each delay.
    pub jitter_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            jitter_ms: 1000,
        }
    }
}

impl ClientConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_root.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_root",
                reason: "must not be empty".to_string(),
            });
        }
        if !self.api_root.starts_with("http://") && !self.api_root.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "api_root",
                reason: "must be an http(s) URL".to_string(),
            });
        }
        if self.locale.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "locale",
                reason: "must not be empty".to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.retry.base_delay_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.base_delay_ms",
                reason: "must be > 0".to_string(),
            });
        }
        for (field, root) in [
            ("service_roots.auth", &self.service_roots.auth),
            ("service_roots.classroom", &self.service_roots.classroom),
            ("service_roots.group", &self.service_roots.group),
            ("service_roots.student", &self.service_roots.student),
            ("service_roots.teacher", &self.service_roots.teacher),
            ("service_roots.mark", &self.service_roots.mark),
            ("service_roots.attendance", &self.service_roots.attendance),
            ("service_roots.post", &self.service_roots.post),
            ("service_roots.school", &self.service_roots.school),
        ] {
            if let Some(root) = root {
                if root.trim().is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field,
                        reason: "override must not be empty".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Resolve the endpoint root for one service.
    pub fn root_for(&self, service: Service) -> &str {
        let root = match service {
            Service::Auth => &self.service_roots.auth,
            Service::Classroom => &self.service_roots.classroom,
            Service::Group => &self.service_roots.group,
            Service::Student => &self.service_roots.student,
            Service::Teacher => &self.service_roots.teacher,
            Service::Mark => &self.service_roots.mark,
            Service::Attendance => &self.service_roots.attendance,
            Service::Post => &self.service_roots.post,
            Service::School => &self.service_roots.school,
        };
        root.as_deref()
            .unwrap_or(&self.api_root)
            .trim_end_matches('/')
    }
}

/// Backend services addressable through the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Auth,
    Classroom,
    Group,
    Student,
    Teacher,
    Mark,
    Attendance,
    Post,
    School,
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var("LYCEUM_CONFIG").ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}
