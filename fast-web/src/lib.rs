#![warn(missing_docs)]
//! # fast-web
//!
//! Expose plain async functions and methods as axum endpoints without
//! writing transport code.
//!
//! ## Overview
//!
//! - **Type-directed binding**: every argument is materialized from the
//!   request according to its type (path, JSON or form body, query, session
//!   token, the request context itself)
//! - **One response envelope**: whatever a handler returns is folded into
//!   `{ code, message, data }`
//! - **Declarative validation** of decoded bodies with localized messages
//! - **Token-bucket rate limiting** per route or per named group
//! - **Static route wiring** generated from `@router` doc annotations by the
//!   `fast-wgen` tool
//!
//! ## Architecture
//!
//! ```text
//!   request ──► RequestContext ──► Bind (per argument) ──► handler
//!                                                            │
//!   response ◄── Envelope ◄── ResponseEncoder ◄── ReturnSlots┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fast_web::prelude::*;
//!
//! fast_web::path_key!(UserId = "id");
//!
//! /// @router /user/{id} [GET]
//! async fn get_user(id: PathParam<UserId>) -> Result<User, ApiError> {
//!     repo::find(id.parse()?).await
//! }
//!
//! /// @router /user [POST]
//! /// @limit 10 20
//! async fn create_user(user: Body<NewUser>) -> Result<u64, ApiError> {
//!     repo::insert(user.into_inner()).await
//! }
//!
//! fast_web::init(WebConfig::default())?;
//! let app = load_routers(Router::new()).layer(fast_web::recovery::layer());
//! ```

pub mod auth;
pub mod binder;
pub mod config;
mod context;
mod descriptor;
mod dispatcher;
pub mod encoder;
mod envelope;
mod error;
pub mod handler;
pub mod logging;
pub mod rate_limit;
pub mod recovery;
pub mod validation;

#[cfg(test)]
mod tests;

// Public API
pub use auth::{MemoryTokenStore, SecToken, TokenFilterLayer, TokenStore};
pub use binder::{Bind, Body, BoxedBody, PathKey, PathParam, Unbound};
pub use config::{StatusPolicy, WebConfig};
pub use context::RequestContext;
pub use descriptor::{HandlerDescriptor, ParameterSpec, ReturnShape};
pub use dispatcher::{Dispatcher, Plain, plain, wrap};
pub use encoder::{Data, ResponseEncoder, ReturnSlots, Slot};
pub use envelope::*;
pub use error::{BindError, ConfigError, WebError, WebResult};
pub use handler::{Handler, Method, method};
pub use logging::LogConfig;
pub use rate_limit::RateLimiter;
pub use validation::{
    FieldError, Locale, Translator, Validate, ValidationResult, ValidationRules,
};

/// The process-wide configuration.
pub fn config() -> &'static WebConfig {
    config::current()
}

/// Install `config` and the tracing subscriber it describes.
///
/// Call once at startup, before serving requests.
pub fn init(config: WebConfig) -> WebResult<()> {
    let log = config.log.clone();
    config::install(config)?;
    logging::init(&log)?;
    tracing::info!(
        status_policy = ?config::current().status_policy,
        locale = ?config::current().locale,
        "fast-web initialized"
    );
    Ok(())
}

/// Prelude for convenient imports
///
/// ```rust,ignore
/// use fast_web::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Bind, Body, BoxedBody, Data, Envelope, FieldError, PageParams, PageResult, PathKey,
        PathParam, RateLimiter, RequestContext, SecToken, Validate, ValidationResult,
        ValidationRules, WebConfig, method, plain, wrap,
    };
}
