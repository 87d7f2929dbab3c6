mod auth_client;
mod clock;
mod config;
mod errors;
mod records;
mod routes;
mod session;
mod state;
mod storage;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth_client::AuthClient;
use crate::clock::SystemClock;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{FileStore, SharedStorage};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobFinder API v{}", env!("CARGO_PKG_VERSION"));

    // Key-value storage shared by session and records
    let file_store = FileStore::open(config.storage_path()).await?;
    info!("Storage opened at {}", file_store.path().display());
    let storage = SharedStorage::new(Arc::new(file_store));

    let auth = AuthClient::new(config.auth_api_url.clone())?;
    info!("Auth client initialized ({})", config.auth_api_url);
    info!("Job edit policy: {:?}", config.job_edit_policy);

    let state = AppState::new(config.clone(), storage, Arc::new(SystemClock), auth);

    // A session left over from the previous run gets its expiry re-armed (or is evicted)
    let outcome = state.session.watch_expiry().await?;
    info!("Startup session check: {outcome:?}");

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
