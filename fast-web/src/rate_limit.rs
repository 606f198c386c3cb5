//! Token-bucket rate limiting for routes
//!
//! A [`RateLimiter`] refills `num` tokens per second up to `cap` tokens and
//! starts full. Clones share the same bucket, which is how named limiters are
//! shared by every route that references them.
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use fast_web::{RateLimiter, wrap};
//!
//! let shared = RateLimiter::new(10, 20);
//! let app = Router::new()
//!     .route("/a", get(wrap(a)).route_layer(shared.layer()))
//!     .route("/b", get(wrap(b)).route_layer(shared.layer()))
//!     .route("/c", get(wrap(c)).route_layer(RateLimiter::new(1, 1).layer()));
//! ```
//!
//! A denied request never reaches the handler and is answered with
//! `{"code": 403, "message": "server busy"}`.

use axum::http::Request;
use axum::response::{IntoResponse, Response};
use futures::future::BoxFuture;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};
use tracing::warn;

use crate::envelope::{CODE_BUSY, Envelope};

/// Message of the envelope sent when a limiter denies a request.
pub const BUSY_MESSAGE: &str = "server busy";

// =============================================================================
// Token Bucket
// =============================================================================

#[derive(Debug)]
struct TokenBucketState {
    /// Current number of tokens
    tokens: f64,
    /// Last time tokens were refilled
    last_refill: Instant,
}

/// Shared token bucket: `num` tokens per second, at most `cap` tokens.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    num: u32,
    cap: u32,
    state: Arc<Mutex<TokenBucketState>>,
}

impl RateLimiter {
    /// Create a full bucket refilling `num` tokens per second, holding at most `cap`.
    ///
    /// A zero `cap` denies every request.
    pub fn new(num: u32, cap: u32) -> Self {
        Self {
            num,
            cap,
            state: Arc::new(Mutex::new(TokenBucketState {
                tokens: f64::from(cap),
                last_refill: Instant::now(),
            })),
        }
    }

    /// Refill rate in tokens per second.
    pub fn num(&self) -> u32 {
        self.num
    }

    /// Bucket capacity.
    pub fn cap(&self) -> u32 {
        self.cap
    }

    /// Take one token if available.
    pub fn allow(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let elapsed = state.last_refill.elapsed();
        let refill = elapsed.as_secs_f64() * f64::from(self.num);
        state.tokens = (state.tokens + refill).min(f64::from(self.cap));
        state.last_refill = Instant::now();

        if state.tokens < 1.0 {
            return false;
        }
        state.tokens -= 1.0;
        true
    }

    /// Whether two handles share one bucket.
    pub fn shares_bucket_with(&self, other: &RateLimiter) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    /// Tower layer checking this bucket before the wrapped route runs.
    pub fn layer(&self) -> RateLimitLayer {
        RateLimitLayer {
            limiter: self.clone(),
        }
    }
}

/// Envelope response for a denied request.
pub fn busy_response() -> Response {
    Envelope::error(CODE_BUSY, BUSY_MESSAGE).into_response()
}

// =============================================================================
// Tower Middleware
// =============================================================================

/// Layer produced by [`RateLimiter::layer`].
#[derive(Debug, Clone)]
pub struct RateLimitLayer {
    limiter: RateLimiter,
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            limiter: self.limiter.clone(),
        }
    }
}

/// Service produced by [`RateLimitLayer`].
#[derive(Debug, Clone)]
pub struct RateLimitService<S> {
    inner: S,
    limiter: RateLimiter,
}

impl<S, B> Service<Request<B>> for RateLimitService<S>
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

    fn call(&mut self, req: Request<B>) -> Self::Future {
        if !self.limiter.allow() {
            warn!(
                path = %req.uri().path(),
                num = self.limiter.num,
                cap = self.limiter.cap,
                "Rate limit exceeded"
            );
            return Box::pin(async { Ok(busy_response()) });
        }
        Box::pin(self.inner.call(req))
    }
}
