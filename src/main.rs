//! Combo Words · Chinese vocabulary quiz backend
//!
//! - Axum HTTP + WebSocket API over in-memory quiz sessions
//! - Vocabulary from a TOML file, inline config rows, or built-in seeds
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT             : u16 (default 3000)
//!   QUIZ_CONFIG_PATH : path to TOML config (deck defaults, grading policy, vocabulary)
//!   LOG_LEVEL        : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT       : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod error;
mod config;
mod vocab;
mod seeds;
mod grading;
mod deck;
mod shared_chars;
mod session;
mod state;
mod protocol;
mod logic;
mod routes;
mod pinyin;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

use crate::routes::build_router;
use crate::state::AppState;

const DEFAULT_PORT: u16 = 3000;

fn listen_addr(port: Option<&str>) -> SocketAddr {
  let port = port.and_then(|p| p.trim().parse::<u16>().ok()).unwrap_or(DEFAULT_PORT);
  SocketAddr::from(([0, 0, 0, 0], port))
}

/// Resolves on Ctrl-C; sessions are in memory only, so nothing is flushed.
async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    warn!(target: "combo_words", error = %e, "Could not listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "combo_words", "Shutdown requested");
}

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Vocabulary, shared-character index, deck defaults and the session store.
  let state = Arc::new(AppState::new()?);
  let app = build_router(state);

  let addr = listen_addr(std::env::var("PORT").ok().as_deref());
  let listener = TcpListener::bind(addr).await?;
  info!(target: "combo_words", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}
