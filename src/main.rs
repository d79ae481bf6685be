use std::sync::Arc;

use anyhow::Context;

use synergysphere_api::{config, routes, store::Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting SynergySphere API in {:?} mode", config.environment);
    if config.using_default_secret() {
        tracing::warn!("JWT_SECRET not set; using the insecure development default");
    }

    let app = routes::app(Arc::new(Store::new()));

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    println!("SynergySphere API listening on http://{bind_addr}");

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}
