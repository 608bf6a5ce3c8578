//! HTTP surface
//!
//! Every module exposes `routes()` with full paths; they are merged here
//! into one router over the shared `AppState`.

pub mod auth;
pub mod exercise_templates;
pub mod exercises;
pub mod health;
pub mod plans;
pub mod progress;
pub mod workouts;

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::db::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
  Router::new()
    .merge(health::routes())
    .merge(auth::routes())
    .merge(exercises::routes())
    .merge(exercise_templates::routes())
    .merge(workouts::routes())
    .merge(plans::routes())
    .merge(progress::routes())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
