//! Test utilities and helpers for unit and HTTP-level testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Seed helpers for users, exercises, workouts and sets
//! - Mock data factories
//! - Router request helpers

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use jsonwebtoken::Algorithm;
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;

use crate::config::Settings;
use crate::db::AppState;
use crate::models::exercise::NewExercise;
use crate::models::template::NewExerciseTemplate;
use crate::tracking::Measurements;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  // Run migrations
  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Insert a user with a placeholder hash, returning its id
pub async fn seed_test_user(pool: &SqlitePool, email: &str) -> i64 {
  sqlx::query("INSERT INTO users (email, password_hash) VALUES (?1, ?2)")
    .bind(email)
    .bind("$argon2id$v=19$m=19456,t=2,p=1$not-a-real-hash")
    .execute(pool)
    .await
    .expect("Failed to insert test user")
    .last_insert_rowid()
}

pub async fn seed_test_exercise(pool: &SqlitePool, user_id: i64, name: &str, tracking_type: &str) -> i64 {
  crate::store::exercises::insert_exercise(pool, &mock_new_exercise(user_id, name, tracking_type))
    .await
    .expect("Failed to insert test exercise")
    .id
}

pub async fn seed_test_workout(pool: &SqlitePool, user_id: i64, started_at: DateTime<Utc>) -> i64 {
  sqlx::query("INSERT INTO workouts (user_id, started_at) VALUES (?1, ?2)")
    .bind(user_id)
    .bind(started_at)
    .execute(pool)
    .await
    .expect("Failed to insert test workout")
    .last_insert_rowid()
}

/// Insert a set numbered after the existing sets of the same exercise in
/// the workout
pub async fn seed_test_set(pool: &SqlitePool, workout_id: i64, exercise_id: i64, m: Measurements) -> i64 {
  sqlx::query(
    r#"
    INSERT INTO workout_sets (
      workout_id, exercise_id, set_number, reps, weight_kg, duration_seconds, distance_meters
    )
    VALUES (
      ?1, ?2,
      (SELECT COUNT(*) + 1 FROM workout_sets WHERE workout_id = ?1 AND exercise_id = ?2),
      ?3, ?4, ?5, ?6
    )
    "#,
  )
  .bind(workout_id)
  .bind(exercise_id)
  .bind(m.reps)
  .bind(m.weight_kg)
  .bind(m.duration_seconds)
  .bind(m.distance_meters)
  .execute(pool)
  .await
  .expect("Failed to insert test set")
  .last_insert_rowid()
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

pub fn mock_new_exercise(user_id: i64, name: &str, tracking_type: &str) -> NewExercise {
  NewExercise {
    user_id,
    template_id: None,
    name: name.to_string(),
    muscle_group: "legs".to_string(),
    equipment: "barbell".to_string(),
    category: "strength".to_string(),
    tracking_type: tracking_type.to_string(),
  }
}

pub fn mock_lift_measurements(weight_kg: f64, reps: i64) -> Measurements {
  Measurements {
    reps: Some(reps),
    weight_kg: Some(weight_kg),
    ..Default::default()
  }
}

pub fn mock_timed_measurements(seconds: i64) -> Measurements {
  Measurements {
    duration_seconds: Some(seconds),
    ..Default::default()
  }
}

/// Three catalog entries covering strength, stretching and cardio
pub fn mock_catalog() -> Vec<NewExerciseTemplate> {
  let list = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

  vec![
    NewExerciseTemplate {
      source_id: "Barbell_Curl".to_string(),
      slug: "barbell-curl".to_string(),
      name: "Barbell Curl".to_string(),
      category: "strength".to_string(),
      equipment: "barbell".to_string(),
      tracking_type: "weight_reps".to_string(),
      force: Some("pull".to_string()),
      level: Some("beginner".to_string()),
      mechanic: Some("isolation".to_string()),
      primary_muscles: list(&["biceps"]),
      secondary_muscles: list(&["forearms"]),
      instructions: list(&["Stand up straight.", "Curl the bar."]),
    },
    NewExerciseTemplate {
      source_id: "Plank".to_string(),
      slug: "plank".to_string(),
      name: "Plank".to_string(),
      category: "stretching".to_string(),
      equipment: "body".to_string(),
      tracking_type: "time".to_string(),
      force: Some("static".to_string()),
      level: Some("beginner".to_string()),
      mechanic: None,
      primary_muscles: list(&["abdominals"]),
      secondary_muscles: Vec::new(),
      instructions: Vec::new(),
    },
    NewExerciseTemplate {
      source_id: "Running_Treadmill".to_string(),
      slug: "running-treadmill".to_string(),
      name: "Running, Treadmill".to_string(),
      category: "cardio".to_string(),
      equipment: "machine".to_string(),
      tracking_type: "time".to_string(),
      force: None,
      level: Some("beginner".to_string()),
      mechanic: None,
      primary_muscles: list(&["quadriceps"]),
      secondary_muscles: list(&["calves", "hamstrings"]),
      instructions: Vec::new(),
    },
  ]
}

pub fn test_settings() -> Settings {
  Settings {
    database_url: "sqlite::memory:".to_string(),
    jwt_secret: "test-secret".to_string(),
    jwt_algorithm: Algorithm::HS256,
    access_token_exp_minutes: 60,
    bind_addr: ([127, 0, 0, 1], 0).into(),
  }
}

pub fn test_state(pool: &SqlitePool) -> Arc<AppState> {
  Arc::new(AppState::new(pool.clone(), test_settings()))
}

/// ---------------------------------------------------------------------------
/// Router Helpers
/// ---------------------------------------------------------------------------

/// Bearer token for an existing user id
pub fn bearer(state: &AppState, user_id: i64) -> String {
  state.tokens.issue(user_id).expect("Failed to issue test token")
}

/// Drive one request through the router, returning status and JSON body
/// (`Value::Null` when the body is empty)
pub async fn send(
  app: &Router,
  method: Method,
  uri: &str,
  token: Option<&str>,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let (status, _, body) = send_raw(app, method, uri, token, body).await;
  let json = if body.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&body).expect("Response body is not JSON")
  };
  (status, json)
}

pub async fn send_raw(
  app: &Router,
  method: Method,
  uri: &str,
  token: Option<&str>,
  body: Option<Value>,
) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
  let mut request = Request::builder().method(method).uri(uri);
  if let Some(token) = token {
    request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
  }
  let request = match body {
    Some(json) => request
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(json.to_string())),
    None => request.body(Body::empty()),
  }
  .expect("Failed to build request");

  let response = app.clone().oneshot(request).await.expect("Router failed");
  let status = response.status();
  let headers = response.headers().clone();
  let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .expect("Failed to read body");

  (status, headers, bytes.to_vec())
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    // Verify key tables exist
    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('users', 'workouts', 'workout_sets')",
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 3);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_set_numbers_increase() {
    let pool = setup_test_db().await;
    let user = seed_test_user(&pool, "a@example.com").await;
    let exercise = seed_test_exercise(&pool, user, "Squat", "weight_reps").await;
    let workout = seed_test_workout(&pool, user, Utc::now()).await;

    seed_test_set(&pool, workout, exercise, mock_lift_measurements(100.0, 5)).await;
    seed_test_set(&pool, workout, exercise, mock_lift_measurements(100.0, 5)).await;

    let numbers: Vec<i64> = sqlx::query_scalar("SELECT set_number FROM workout_sets ORDER BY id")
      .fetch_all(&pool)
      .await
      .expect("Failed to read sets");
    assert_eq!(numbers, vec![1, 2]);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let m = mock_lift_measurements(80.0, 3);
    assert_approx_eq!(m.weight_kg.unwrap(), 80.0, 1e-9);
    assert_eq!(m.reps, Some(3));

    assert_eq!(mock_catalog().len(), 3);
    assert_eq!(test_settings().access_token_exp_minutes, 60);
  }
}
