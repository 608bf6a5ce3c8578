//! Service metadata and liveness

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::db::AppState;

pub const SERVICE_NAME: &str = "Fitness Tracker API";

pub fn routes() -> Router<Arc<AppState>> {
  Router::new()
    .route("/", get(root))
    .route("/health", get(health))
}

async fn root() -> Json<Value> {
  Json(json!({
    "name": SERVICE_NAME,
    "version": env!("CARGO_PKG_VERSION"),
  }))
}

async fn health() -> Json<Value> {
  Json(json!({ "status": "ok" }))
}
