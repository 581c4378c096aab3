//! Nihongo Shiksha · Japanese Tutor Backend (Bengali UI)
//!
//! - Axum HTTP + WebSocket API
//! - Gemini-backed dictionary analysis, sentence evaluation, and grammar Q&A
//! - One-shot voice transcription over the same generation endpoint
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                : u16 (default 3000)
//!   GEMINI_API_KEY      : enables the generation service if present
//!   GEMINI_BASE_URL     : default "https://generativelanguage.googleapis.com/v1beta"
//!   GEMINI_MODEL        : default "gemini-3-flash-preview"
//!   GEMINI_TIMEOUT_SECS : per-request timeout (default 20)
//!   TUTOR_CONFIG_PATH   : path to TOML config (prompt templates)
//!   HISTORY_PATH        : search-history file (default "data/search_history.json",
//!                         empty string disables persistence)
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

mod telemetry;
mod util;
mod error;
mod domain;
mod schema;
mod config;
mod gemini;
mod history;
mod speech;
mod state;
mod session;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (prompts, Gemini client, history store).
  let state = Arc::new(AppState::new());

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "nihongo_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  let _ = tokio::signal::ctrl_c().await;
  info!(target: "nihongo_backend", "Shutdown signal received");
}
