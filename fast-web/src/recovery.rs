//! Panic recovery
//!
//! Handler bodies run without panic protection. Mount [`layer`] outside the
//! routes so a panicking handler still answers with a failure envelope.

use axum::response::{IntoResponse, Response};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;

use crate::envelope::{CODE_PANIC, Envelope};

/// Panic handler used by [`layer`].
pub type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Layer converting handler panics into `{501, <panic message>}`.
pub fn layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(recover as PanicHandler)
}

fn recover(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    };
    error!(panic = %detail, "Handler panicked");
    Envelope::error(CODE_PANIC, crate::config().panic_message.clone()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_recover_hides_panic_text() {
        let response = recover(Box::new("secret detail"));
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let envelope: Envelope = serde_json::from_slice(&body).unwrap();
        assert_eq!(envelope.code, CODE_PANIC);
        assert_eq!(envelope.message, crate::config().panic_message);
    }
}
