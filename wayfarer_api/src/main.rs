use std::sync::Arc;

use anyhow::Context;
use axum::serve;
use mimalloc::MiMalloc;
use tracing::{Level, info};
use wayfarer_api::state::AppState;
use wayfarer_api::{DEFAULT_BIND_ADDRESS, build_router};
use wayfarer_intent::IntentParser;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename("./.env.local").ok();
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let state = Arc::new(AppState::new(IntentParser::from_env()));
    let app = build_router(state);

    let address =
        std::env::var("WAYFARER_BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Could not bind {address}"))?;

    info!("Listening on {}", address);
    serve(listener, app).await?;

    Ok(())
}
