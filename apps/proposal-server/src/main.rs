//! Proposal Builder Server
//!
//! Assembles PDF proposals from uploaded modules. Provides endpoints for:
//!
//! - Module upload and listing
//! - Cover page generation
//! - Export (cover + ordered modules merged into one PDF)
//! - Download from the modules, covers and exports areas
//!
//! Documents are kept on disk under the configured data directory; see
//! [`proposal_store::FsStore`].

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod config;
mod error;
mod index;
mod models;
mod service;
mod state;
#[cfg(test)]
mod tests;

use api::{
    handle_download, handle_export, handle_generate_cover, handle_health, handle_index,
    handle_list_modules, handle_upload,
};
use config::ServerConfig;
use state::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(handle_health))
        .route("/list_modules", get(handle_list_modules))
        .route("/upload", post(handle_upload))
        .route("/generate_cover", post(handle_generate_cover))
        .route("/export", post(handle_export))
        .route("/download/:area/:filename", get(handle_download))
        .nest_service("/static", ServeDir::new(&state.static_dir))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = ServerConfig::parse();

    let log_level = if config.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting proposal server on {}", config.bind_addr());

    let state = AppState::new(&config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("Server listening on http://{}", listener.local_addr()?);
    info!("Data directory: {}", config.data_dir.display());
    info!("Upload limit: {} bytes", config.max_upload_bytes);

    axum::serve(listener, app).await?;

    Ok(())
}
