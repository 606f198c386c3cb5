//! Adapters from [`Handler`](crate::handler::Handler) functions to axum handlers
//!
//! [`wrap`] turns any bindable function into an axum handler that answers
//! with one [`Envelope`]. [`plain`] adapts functions that already follow the
//! plain contract (one [`RequestContext`] argument, no return values) and
//! write their own response through [`RequestContext::respond`].

use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::context::RequestContext;
use crate::descriptor::HandlerDescriptor;
use crate::encoder::ResponseEncoder;
use crate::envelope::Envelope;
use crate::handler::Handler;

type ResponseFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// A bindable function behind the transport contract.
pub struct Dispatcher<H, Args> {
    handler: H,
    descriptor: Arc<HandlerDescriptor>,
    _args: PhantomData<fn() -> Args>,
}

impl<H: Clone, Args> Clone for Dispatcher<H, Args> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
            descriptor: Arc::clone(&self.descriptor),
            _args: PhantomData,
        }
    }
}

/// Wrap `handler` so it can be registered on an axum route.
///
/// The handler's shape is derived once, here, and reused for every request.
///
/// ```rust,ignore
/// async fn create(user: Body<User>) -> Result<u64, ApiError> { ... }
///
/// let router = Router::new().route("/user", post(wrap(create)));
/// ```
pub fn wrap<H, Args>(handler: H) -> Dispatcher<H, Args>
where
    H: Handler<Args>,
{
    Dispatcher {
        handler,
        descriptor: Arc::new(H::descriptor()),
        _args: PhantomData,
    }
}

impl<H, Args> Dispatcher<H, Args>
where
    H: Handler<Args>,
{
    /// Shape of the wrapped handler.
    pub fn descriptor(&self) -> &HandlerDescriptor {
        &self.descriptor
    }

    /// Bind arguments from `ctx`, call the handler and encode its result.
    ///
    /// Binding stops at the first failing argument and the handler is not
    /// called; the failure is reported as a failure envelope.
    pub async fn dispatch(&self, ctx: &RequestContext) -> Envelope {
        let started = Instant::now();
        let call = match self.handler.invoke(ctx) {
            Ok(call) => call,
            Err(err) => {
                warn!(
                    request_id = %ctx.request_id(),
                    path = %ctx.uri().path(),
                    kind = err.kind(),
                    error = %err,
                    "Argument binding failed"
                );
                return err.into();
            }
        };

        let slots = call.await;
        let envelope = ResponseEncoder::new(&crate::config().success_message).encode(slots);
        debug!(
            request_id = %ctx.request_id(),
            path = %ctx.uri().path(),
            handler = %self.descriptor,
            code = envelope.code,
            duration_ms = started.elapsed().as_millis() as u64,
            "Handler completed"
        );
        envelope
    }
}

impl<H, Args, S> axum::handler::Handler<Args, S> for Dispatcher<H, Args>
where
    H: Handler<Args>,
    Args: 'static,
    S: Send + Sync + 'static,
{
    type Future = ResponseFuture;

    fn call(self, req: Request, state: S) -> Self::Future {
        Box::pin(async move {
            let ctx =
                match RequestContext::capture(req, &state, crate::config().max_body_bytes).await {
                    Ok(ctx) => ctx,
                    Err(err) => return Envelope::from(err).into_response(),
                };
            self.dispatch(&ctx).await.into_response()
        })
    }
}

/// A function already following the plain contract.
#[derive(Clone)]
pub struct Plain<F> {
    f: F,
}

/// Register `f` without envelope handling.
///
/// The response is whatever `f` stored through [`RequestContext::respond`],
/// or an empty `200 OK` if it stored nothing.
pub fn plain<F, Fut>(f: F) -> Plain<F>
where
    F: Fn(RequestContext) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Plain { f }
}

impl<F, Fut, S> axum::handler::Handler<(RequestContext,), S> for Plain<F>
where
    F: Fn(RequestContext) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
    S: Send + Sync + 'static,
{
    type Future = ResponseFuture;

    fn call(self, req: Request, state: S) -> Self::Future {
        Box::pin(async move {
            let ctx =
                match RequestContext::capture(req, &state, crate::config().max_body_bytes).await {
                    Ok(ctx) => ctx,
                    Err(err) => return Envelope::from(err).into_response(),
                };
            (self.f)(ctx.clone()).await;
            ctx.take_response()
                .unwrap_or_else(|| StatusCode::OK.into_response())
        })
    }
}
