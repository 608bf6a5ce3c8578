pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod logging;
pub mod models;
pub mod progress;
pub mod routes;
pub mod security;
pub mod store;
pub mod tracking;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_utils;

use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;

use config::Settings;
use db::AppState;

/// Open the database, run migrations and serve HTTP until Ctrl-C
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
  let pool = db::initialize_db(&settings.database_url)
    .await
    .context("failed to open database")?;

  let bind_addr = settings.bind_addr;
  let app = routes::build_router(Arc::new(AppState::new(pool.clone(), settings)));

  let listener = TcpListener::bind(bind_addr)
    .await
    .with_context(|| format!("failed to bind {}", bind_addr))?;
  tracing::info!(addr = %bind_addr, "listening");

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  pool.close().await;
  tracing::info!("shut down");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for Ctrl-C");
  }
}
