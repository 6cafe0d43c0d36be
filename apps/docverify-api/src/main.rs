//! DocVerify API Server
//!
//! Serves the verification endpoint the DocVerify page calls when it is
//! configured with a remote endpoint:
//!
//! - `GET /verify?code=XXXX`: verification answer as JSON
//! - `GET /api/codes`: known codes and their status
//! - `GET /health`: liveness
//!
//! The document table is a JSON file keyed by code (see `data/codes.json`);
//! without one the built-in demo table is served.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{routing::get, Router};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;
mod state;

use api::{handle_health, handle_list_codes, handle_verify};
use state::AppState;

/// Command-line arguments for the DocVerify server
#[derive(Parser, Debug)]
#[command(name = "docverify-api")]
#[command(about = "Document verification endpoint for the DocVerify page")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3001")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// JSON document table keyed by code
    #[arg(long, env = "DOCVERIFY_TABLE")]
    table: Option<PathBuf>,

    /// Match codes exactly instead of upper-casing them
    #[arg(long)]
    no_uppercase: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Build the router with all endpoints
pub fn build_router(state: Arc<AppState>) -> Router {
    // The page is usually served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/verify", get(handle_verify))
        .route("/api/codes", get(handle_list_codes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState::load(args.table.as_deref(), !args.no_uppercase)?;
    let app = build_router(Arc::new(state));

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("DocVerify API listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
