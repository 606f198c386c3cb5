//! Error types for binding and dispatch
//!
//! Request-time failures never escape as transport errors. Every [`BindError`]
//! is turned into a failure [`Envelope`](crate::Envelope) by the dispatcher.
//!
//! # Example
//! ```rust,ignore
//! use fast_web::{BindError, Envelope};
//!
//! let err = BindError::decode("expected value at line 1 column 1");
//! let envelope: Envelope = err.into();
//! assert_eq!(envelope.code, 500);
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::envelope::{CODE_FAILURE, Envelope};

/// Failure while materializing a handler argument.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// The request body (or form/query) could not be decoded into the declared type.
    #[error("{0}")]
    Decode(String),

    /// The decoded value failed validation; the message is already localized.
    #[error("{0}")]
    Validation(String),

    /// The request body could not be read.
    #[error("{0}")]
    Body(String),
}

impl BindError {
    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a body read error.
    pub fn body(message: impl Into<String>) -> Self {
        Self::Body(message.into())
    }

    /// Envelope code reported for this failure.
    pub fn code(&self) -> i32 {
        CODE_FAILURE
    }

    /// Short label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::Validation(_) => "validation",
            Self::Body(_) => "body",
        }
    }
}

impl From<serde_json::Error> for BindError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<serde_urlencoded::de::Error> for BindError {
    fn from(err: serde_urlencoded::de::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<BindError> for Envelope {
    fn from(err: BindError) -> Self {
        Envelope::error(err.code(), err.to_string())
    }
}

/// Errors while loading runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`WebConfig`](crate::WebConfig).
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("invalid value for '{field}': {message}")]
    InvalidValue {
        /// Offending field.
        field: String,
        /// Why it was rejected.
        message: String,
    },
}

/// Top-level error for the runtime crate.
#[derive(Debug, Error)]
pub enum WebError {
    /// Argument binding failed.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// Configuration failed to load.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The tracing subscriber could not be installed.
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

/// Result type for runtime operations.
pub type WebResult<T> = Result<T, WebError>;
