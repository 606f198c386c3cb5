//! Access-token filter and the [`SecToken`] capability
//!
//! The filter does not decide who may log in. It resolves the `AccessToken`
//! header (scoped by the optional `AppKey` header) through a [`TokenStore`]
//! and attaches the resulting [`SecToken`] to the request, where handlers
//! receive it by declaring a `SecToken` argument.
//!
//! # Example
//!
//! ```rust,ignore
//! use fast_web::auth::{MemoryTokenStore, TokenFilterLayer};
//!
//! let store = Arc::new(MemoryTokenStore::new());
//! let app = load_routers(Router::new())
//!     .layer(TokenFilterLayer::new(store).with_prefix("/api/sec"));
//! ```

use axum::http::Request;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::debug;

use crate::envelope::{CODE_TOKEN_EXPIRED, CODE_UNAUTHENTICATED, Envelope};

/// Header carrying the access token.
pub const ACCESS_TOKEN_HEADER: &str = "AccessToken";
/// Header carrying the application key.
pub const APP_KEY_HEADER: &str = "AppKey";

/// Session token attached to an authenticated request.
///
/// Handlers declaring a `SecToken` argument get the zero value when the
/// request passed no token filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecToken {
    /// Token presented in the `AccessToken` header.
    pub access_token: String,
    /// Token used to obtain a new access token.
    pub refresh_token: String,
    /// Application the token was issued for.
    pub app_key: String,
    /// Owner of the session.
    pub user_id: i64,
    /// Opaque session payload.
    pub data: String,
    /// Issue time.
    pub create_time: String,
    /// Expiry time.
    pub expire_time: String,
}

impl SecToken {
    /// Whether this is the zero token.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_empty()
    }
}

/// Session cache consulted by the token filter.
pub trait TokenStore: Send + Sync + 'static {
    /// Resolve a live token, or `None` if it is unknown or expired.
    fn lookup(&self, access_token: &str, app_key: Option<&str>) -> Option<SecToken>;
}

/// In-process [`TokenStore`].
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: DashMap<String, SecToken>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `token` under its access token.
    pub fn insert(&self, token: SecToken) {
        self.tokens.insert(token.access_token.clone(), token);
    }

    /// Drop a token.
    pub fn remove(&self, access_token: &str) -> Option<SecToken> {
        self.tokens.remove(access_token).map(|(_, token)| token)
    }
}

impl TokenStore for MemoryTokenStore {
    fn lookup(&self, access_token: &str, app_key: Option<&str>) -> Option<SecToken> {
        let token = self.tokens.get(access_token)?;
        match app_key {
            Some(key) if !token.app_key.is_empty() && token.app_key != key => None,
            _ => Some(token.clone()),
        }
    }
}

/// Tower layer resolving access tokens for matching paths.
#[derive(Clone)]
pub struct TokenFilterLayer {
    store: Arc<dyn TokenStore>,
    prefixes: Arc<Vec<String>>,
}

impl TokenFilterLayer {
    /// Filter every path through `store`.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            prefixes: Arc::new(Vec::new()),
        }
    }

    /// Restrict the filter to paths starting with `prefix`. May be repeated.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.prefixes).push(prefix.into());
        self
    }

    fn applies_to(&self, path: &str) -> bool {
        self.prefixes.is_empty() || self.prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }
}

impl<S> Layer<S> for TokenFilterLayer {
    type Service = TokenFilter<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TokenFilter {
            inner,
            config: self.clone(),
        }
    }
}

/// Service produced by [`TokenFilterLayer`].
#[derive(Clone)]
pub struct TokenFilter<S> {
    inner: S,
    config: TokenFilterLayer,
}

impl<S, B> Service<Request<B>> for TokenFilter<S>
where
    S: Service<Request<B>, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
    S::Error: 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        if !self.config.applies_to(req.uri().path()) {
            return Box::pin(self.inner.call(req));
        }

        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_owned)
        };
        let Some(access_token) = header(ACCESS_TOKEN_HEADER) else {
            debug!(path = %req.uri().path(), "No access token presented");
            return reject(CODE_UNAUTHENTICATED, "please login first");
        };
        let app_key = header(APP_KEY_HEADER);

        match self.config.store.lookup(&access_token, app_key.as_deref()) {
            Some(token) => {
                req.extensions_mut().insert(token);
                Box::pin(self.inner.call(req))
            }
            None => {
                debug!(path = %req.uri().path(), "Unknown access token");
                reject(CODE_TOKEN_EXPIRED, "please login again")
            }
        }
    }
}

fn reject<E: 'static>(code: i32, message: &'static str) -> BoxFuture<'static, Result<Response, E>> {
    Box::pin(async move { Ok(Envelope::error(code, message).into_response()) })
}
