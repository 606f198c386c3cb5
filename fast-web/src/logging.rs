//! Logging bootstrap
//!
//! Installs a `tracing` subscriber and provides the request logging layer.
//!
//! # Example
//!
//! ```rust,ignore
//! use fast_web::logging::{self, LogConfig};
//!
//! logging::init(&LogConfig::new().with_level("debug"))?;
//!
//! let app = Router::new()
//!     .merge(routes)
//!     .layer(logging::trace_layer());
//! ```

use serde::{Deserialize, Serialize};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{WebError, WebResult};

/// Logging setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive, e.g. `"info"` or `"fast_web=debug,tower_http=info"`.
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LogConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter directive.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Toggle JSON output.
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &LogConfig) -> WebResult<()> {
    let json = config.json.then(|| fmt::layer().json());
    let text = (!config.json).then(fmt::layer);

    tracing_subscriber::registry()
        .with(config.filter())
        .with(json)
        .with(text)
        .try_init()
        .map_err(|e| WebError::Logging(e.to_string()))
}

/// Per-request logging: method, path, status and latency.
pub fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}
