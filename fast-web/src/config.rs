//! Runtime configuration.
//!
//! [`WebConfig`] controls how envelopes are rendered and how request bodies are
//! bound. It is installed once at startup with [`install`] (or [`crate::init`])
//! and read through [`crate::config()`] afterwards; handlers never see it.
//!
//! # Example
//! ```rust,ignore
//! use fast_web::{StatusPolicy, WebConfig};
//!
//! let config = WebConfig::new()
//!     .with_success_message("ok")
//!     .with_status_policy(StatusPolicy::Mirror)
//!     .with_max_body_bytes(512 * 1024);
//! fast_web::init(config)?;
//! ```
//!
//! The same settings load from TOML:
//!
//! ```toml
//! success_message = "ok"
//! status_policy = "mirror"
//! locale = "zh"
//!
//! [log]
//! level = "debug"
//! ```

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

use crate::error::ConfigError;
use crate::logging::LogConfig;
use crate::validation::Locale;

static CONFIG: OnceLock<WebConfig> = OnceLock::new();

/// How the HTTP status of a response relates to the envelope code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// Always answer `200 OK`; the outcome lives in the envelope code only.
    #[default]
    Uniform,
    /// Use the envelope code as the HTTP status when it is a valid status,
    /// `500` otherwise.
    Mirror,
}

impl StatusPolicy {
    /// HTTP status to send for an envelope carrying `code`.
    pub fn status_for(self, code: i32) -> StatusCode {
        match self {
            Self::Uniform => StatusCode::OK,
            Self::Mirror => u16::try_from(code)
                .ok()
                .and_then(|c| StatusCode::from_u16(c).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

/// Runtime configuration for binding and envelope rendering.
///
/// # Fields
///
/// * `success_message` - Message of every success envelope built by the
///   dispatcher. Default: `"success"`.
///
/// * `status_policy` - See [`StatusPolicy`]. Default: `Uniform`.
///
/// * `locale` - Language of generic validation messages. Default: `En`.
///
/// * `max_body_bytes` - Largest request body the binder buffers. Default: 2 MiB.
///
/// * `panic_message` - Message of the envelope produced by the recovery layer.
///   Default: `"unknown error"`.
///
/// * `log` - Logging setup used by [`crate::logging::init`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Message of success envelopes.
    pub success_message: String,
    /// HTTP status coupling.
    pub status_policy: StatusPolicy,
    /// Locale for validation messages.
    pub locale: Locale,
    /// Maximum buffered body size in bytes.
    pub max_body_bytes: usize,
    /// Message used when a handler panics.
    pub panic_message: String,
    /// Logging configuration.
    pub log: LogConfig,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            success_message: "success".to_string(),
            status_policy: StatusPolicy::Uniform,
            locale: Locale::En,
            max_body_bytes: 2 * 1024 * 1024,
            panic_message: "unknown error".to_string(),
            log: LogConfig::default(),
        }
    }
}

impl WebConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_body_bytes".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Set the success message.
    pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = message.into();
        self
    }

    /// Set the status policy.
    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }

    /// Set the validation locale.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Set the maximum body size.
    pub fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }

    /// Set the panic message.
    pub fn with_panic_message(mut self, message: impl Into<String>) -> Self {
        self.panic_message = message.into();
        self
    }

    /// Set the logging configuration.
    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }
}

/// Install the process-wide configuration.
///
/// Fails when a configuration was already installed or already read.
pub fn install(config: WebConfig) -> Result<(), ConfigError> {
    config.validate()?;
    CONFIG.set(config).map_err(|_| ConfigError::InvalidValue {
        field: "config".to_string(),
        message: "already installed".to_string(),
    })
}

/// The installed configuration, or the defaults when none was installed.
pub fn current() -> &'static WebConfig {
    CONFIG.get_or_init(WebConfig::default)
}
