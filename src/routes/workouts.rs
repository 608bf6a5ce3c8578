//! Workout sessions and the sets logged in them

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use std::sync::Arc;

use crate::auth::CurrentUser;
use crate::db::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::models::workout::{SetCreateRequest, SetUpdateRequest, WorkoutCreateRequest, WorkoutDetail};
use crate::models::{Page, Workout, WorkoutSet};
use crate::store::{exercises, workouts};
use crate::validation;

pub fn routes() -> Router<Arc<AppState>> {
  Router::new()
    .route("/workouts", post(create_workout).get(list_workouts))
    .route("/workouts/:id", get(get_workout).delete(delete_workout))
    .route("/workouts/:id/end", post(end_workout))
    .route("/workouts/:id/sets", post(add_set))
    .route("/workouts/:id/sets/:set_id", put(update_set).delete(delete_set))
}

async fn owned_workout(state: &AppState, user: &CurrentUser, id: i64) -> ApiResult<Workout> {
  workouts::find_workout(&state.db, user.id(), id)
    .await?
    .ok_or(ApiError::NotFound("Workout"))
}

/// ---------------------------------------------------------------------------
/// Workouts
/// ---------------------------------------------------------------------------

async fn create_workout(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  ApiJson(payload): ApiJson<WorkoutCreateRequest>,
) -> ApiResult<impl IntoResponse> {
  payload.validate()?;

  let started_at = payload.started_at.unwrap_or_else(Utc::now);
  let workout = workouts::insert_workout(&state.db, user.id(), started_at, payload.notes.as_deref()).await?;

  tracing::info!(user_id = user.id(), workout_id = workout.id, "started workout");
  Ok((StatusCode::CREATED, Json(workout)))
}

async fn list_workouts(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  ApiQuery(page): ApiQuery<Page>,
) -> ApiResult<Json<Vec<Workout>>> {
  validation::page(page.limit, page.offset)?;
  Ok(Json(
    workouts::list_workouts(&state.db, user.id(), page.limit, page.offset).await?,
  ))
}

async fn get_workout(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<WorkoutDetail>> {
  let workout = owned_workout(&state, &user, id).await?;
  let sets = workouts::list_sets(&state.db, workout.id).await?;
  Ok(Json(WorkoutDetail { workout, sets }))
}

/// Idempotent: a workout that already ended keeps its first end time
async fn end_workout(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Workout>> {
  let workout = owned_workout(&state, &user, id).await?;
  if workout.ended_at.is_some() {
    return Ok(Json(workout));
  }

  workouts::end_workout(&state.db, workout.id, Utc::now()).await?;
  tracing::info!(user_id = user.id(), workout_id = id, "ended workout");

  Ok(Json(owned_workout(&state, &user, id).await?))
}

async fn delete_workout(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
  if !workouts::delete_workout(&state.db, user.id(), id).await? {
    return Err(ApiError::NotFound("Workout"));
  }
  Ok(StatusCode::NO_CONTENT)
}

/// ---------------------------------------------------------------------------
/// Sets
/// ---------------------------------------------------------------------------

async fn add_set(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  ApiPath(workout_id): ApiPath<i64>,
  ApiJson(payload): ApiJson<SetCreateRequest>,
) -> ApiResult<impl IntoResponse> {
  payload.validate()?;

  let workout = owned_workout(&state, &user, workout_id).await?;
  let exercise = exercises::find_exercise(&state.db, user.id(), payload.exercise_id)
    .await?
    .ok_or(ApiError::NotFound("Exercise"))?;

  exercise
    .tracking()
    .check_required(&payload.measurements())
    .map_err(ApiError::BadRequest)?;

  let set = workouts::insert_set(&state.db, workout.id, &payload).await?;
  Ok((StatusCode::CREATED, Json(set)))
}

/// Merge the provided fields, then recheck the result against the
/// exercise's tracking type
async fn update_set(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  ApiPath((workout_id, set_id)): ApiPath<(i64, i64)>,
  ApiJson(payload): ApiJson<SetUpdateRequest>,
) -> ApiResult<Json<WorkoutSet>> {
  payload.validate()?;

  let workout = owned_workout(&state, &user, workout_id).await?;
  let mut set = workouts::find_set(&state.db, workout.id, set_id)
    .await?
    .ok_or(ApiError::NotFound("Set"))?;
  let exercise = exercises::find_exercise(&state.db, user.id(), set.exercise_id)
    .await?
    .ok_or(ApiError::NotFound("Exercise"))?;

  payload.apply(&mut set);
  exercise
    .tracking()
    .check_required(&set.measurements())
    .map_err(ApiError::BadRequest)?;

  Ok(Json(workouts::update_set(&state.db, &set).await?))
}

async fn delete_set(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  ApiPath((workout_id, set_id)): ApiPath<(i64, i64)>,
) -> ApiResult<StatusCode> {
  let workout = owned_workout(&state, &user, workout_id).await?;
  if !workouts::delete_set(&state.db, workout.id, set_id).await? {
    return Err(ApiError::NotFound("Set"));
  }
  Ok(StatusCode::NO_CONTENT)
}
