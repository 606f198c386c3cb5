use anyhow::Context;
use fast_web::{MemoryTokenStore, SecToken, WebConfig};
use std::sync::Arc;
use tracing::info;

/// Demo service.
///
/// @genDir ./src/api
/// @genOutput ./src/load_router.rs
/// @genWrapper 1
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fast_web::init(WebConfig::default())?;

    let tokens = Arc::new(MemoryTokenStore::new());
    tokens.insert(SecToken {
        access_token: "demo-token".into(),
        user_id: 1,
        ..Default::default()
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:8080")
        .await
        .context("failed to bind 127.0.0.1:8080")?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, fast_web_demo::app(tokens)).await?;
    Ok(())
}
