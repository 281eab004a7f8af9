mod config;
mod db;
mod document_store;
mod errors;
mod intake;
mod models;
mod routes;
mod session;
mod state;
mod webhook;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::document_store::PgDocumentStore;
use crate::routes::build_router;
use crate::session::RedisSessionStore;
use crate::state::AppState;
use crate::webhook::WebhookClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cvlens v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL document store
    let db = create_pool(&config.database_url).await?;
    ensure_schema(&db).await?;
    let documents = Arc::new(PgDocumentStore::new(db));

    // Initialize Redis session store
    let redis = redis::Client::open(config.redis_url.clone())?;
    let sessions = Arc::new(RedisSessionStore::new(redis, config.session_ttl_secs));
    info!("Redis session store initialized (ttl {}s)", config.session_ttl_secs);

    // Initialize webhook client
    let webhook = WebhookClient::new(&config.webhook)?;
    info!("Webhook client initialized (url: {})", webhook.url());

    let state = AppState {
        config: config.clone(),
        sessions,
        documents,
        webhook,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
