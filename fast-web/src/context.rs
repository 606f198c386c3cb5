//! Request-scoped context
//!
//! [`RequestContext`] is built once per request before binding. It owns the
//! request head, the matched path parameters and the buffered body, so every
//! argument binder reads from the same snapshot.

use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, FromRequestParts, RawPathParams, Request};
use axum::http::{HeaderMap, Method, Uri, header, request::Parts};
use axum::response::{IntoResponse, Response};
use std::sync::{Arc, Mutex, PoisonError};

use crate::envelope::Envelope;
use crate::error::BindError;

struct Inner {
    parts: Parts,
    path_params: Vec<(String, String)>,
    body: Bytes,
    request_id: String,
    response: Mutex<Option<Response>>,
}

/// Ambient context of one request. Cloning is cheap; clones share state.
#[derive(Clone)]
pub struct RequestContext {
    inner: Arc<Inner>,
}

impl RequestContext {
    /// Split `req`, capture path parameters and buffer at most `max_body_bytes` of body.
    pub async fn capture<S>(
        req: Request,
        state: &S,
        max_body_bytes: usize,
    ) -> Result<Self, BindError>
    where
        S: Send + Sync,
    {
        let (mut parts, body) = req.into_parts();
        let path_params = match RawPathParams::from_request_parts(&mut parts, state).await {
            Ok(params) => params
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            Err(_) => Vec::new(),
        };
        let body = axum::body::to_bytes(body, max_body_bytes)
            .await
            .map_err(|e| BindError::body(e.to_string()))?;
        Ok(Self::from_parts(parts, path_params, body))
    }

    /// Build a context from already separated pieces.
    pub fn from_parts(parts: Parts, path_params: Vec<(String, String)>, body: Bytes) -> Self {
        Self {
            inner: Arc::new(Inner {
                parts,
                path_params,
                body,
                request_id: uuid::Uuid::now_v7().to_string(),
                response: Mutex::new(None),
            }),
        }
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.inner.parts.method
    }

    /// Request URI.
    pub fn uri(&self) -> &Uri {
        &self.inner.parts.uri
    }

    /// Request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.inner.parts.headers
    }

    /// A header value, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.parts.headers.get(name)?.to_str().ok()
    }

    /// Raw query string.
    pub fn query(&self) -> Option<&str> {
        self.inner.parts.uri.query()
    }

    /// Value of the path placeholder `name`.
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.inner
            .path_params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// All path parameters in route order.
    pub fn path_params(&self) -> &[(String, String)] {
        &self.inner.path_params
    }

    /// Buffered request body.
    pub fn body(&self) -> &Bytes {
        &self.inner.body
    }

    /// Content type without parameters, lower-cased.
    pub fn content_type(&self) -> Option<String> {
        let value = self.header(header::CONTENT_TYPE.as_str())?;
        let mime = value.split(';').next().unwrap_or_default().trim();
        Some(mime.to_ascii_lowercase())
    }

    /// Whether the body is JSON (`application/json` or any `+json` type).
    pub fn is_json(&self) -> bool {
        self.content_type()
            .is_some_and(|ct| ct == "application/json" || ct.ends_with("+json"))
    }

    /// Whether the body is an urlencoded form.
    pub fn is_form(&self) -> bool {
        self.content_type()
            .is_some_and(|ct| ct == "application/x-www-form-urlencoded")
    }

    /// A request extension inserted by an earlier layer.
    pub fn extension<T: Clone + Send + Sync + 'static>(&self) -> Option<T> {
        self.inner.parts.extensions.get::<T>().cloned()
    }

    /// Identifier assigned to this request, used in log fields.
    pub fn request_id(&self) -> &str {
        &self.inner.request_id
    }

    /// Store the response a plain handler wants to send.
    pub fn respond(&self, response: impl IntoResponse) {
        let mut slot = self
            .inner
            .response
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = Some(response.into_response());
    }

    /// Remove the stored response, if any.
    pub fn take_response(&self) -> Option<Response> {
        self.inner
            .response
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("method", self.method())
            .field("uri", self.uri())
            .field("request_id", &self.inner.request_id)
            .finish_non_exhaustive()
    }
}

impl<S> FromRequest<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Envelope;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        RequestContext::capture(req, state, crate::config().max_body_bytes)
            .await
            .map_err(Envelope::from)
    }
}
