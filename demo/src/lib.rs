//! Example service wired with `fast-web`.
//!
//! Handlers live in [`api`] and carry `@router` annotations; `load_router.rs`
//! is produced from them by `fast-wgen` (run it from this directory, the
//! settings come from the doc comment of `fn main`).

pub mod api;
pub mod store;

mod load_router;

use axum::Router;
use fast_web::{TokenFilterLayer, TokenStore, logging, recovery};
use std::sync::Arc;

/// Build the application router.
pub fn app(tokens: Arc<dyn TokenStore>) -> Router {
    load_router::load_routers(Router::new())
        .layer(TokenFilterLayer::new(tokens).with_prefix("/user/me"))
        .layer(recovery::layer())
        .layer(logging::trace_layer())
}
