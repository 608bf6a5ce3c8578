//! Progress reports over the caller's own training data

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

use crate::auth::CurrentUser;
use crate::db::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiPath;
use crate::progress::{personal_records, ExerciseHistory, PersonalRecord, WeeklyOverview};
use crate::store::{exercises, workouts};

pub fn routes() -> Router<Arc<AppState>> {
  Router::new()
    .route("/progress/prs", get(get_personal_records))
    .route("/progress/exercises/:id/history", get(get_exercise_history))
    .route("/progress/overview", get(get_overview))
}

async fn get_personal_records(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
) -> ApiResult<Json<Vec<PersonalRecord>>> {
  let exercises = exercises::all_exercises(&state.db, user.id()).await?;
  let sets = workouts::sets_for_user(&state.db, user.id()).await?;

  Ok(Json(personal_records(&exercises, &sets)))
}

async fn get_exercise_history(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<ExerciseHistory>> {
  let exercise = exercises::find_exercise(&state.db, user.id(), id)
    .await?
    .ok_or(ApiError::NotFound("Exercise"))?;

  let sets = workouts::sets_for_exercise(&state.db, user.id(), exercise.id).await?;
  let workouts = workouts::all_workouts(&state.db, user.id()).await?;

  Ok(Json(ExerciseHistory::compute(&exercise, &sets, &workouts)))
}

async fn get_overview(State(state): State<Arc<AppState>>, user: CurrentUser) -> ApiResult<Json<WeeklyOverview>> {
  let workouts = workouts::all_workouts(&state.db, user.id()).await?;
  let sets = workouts::sets_for_user(&state.db, user.id()).await?;
  let names: HashMap<i64, String> = exercises::all_exercises(&state.db, user.id())
    .await?
    .into_iter()
    .map(|e| (e.id, e.name))
    .collect();

  let overview = WeeklyOverview::compute(Utc::now(), &workouts, &sets, &names);
  tracing::debug!(
    user_id = user.id(),
    workouts = overview.workouts_this_week,
    sets = overview.sets_this_week,
    "computed weekly overview"
  );

  Ok(Json(overview))
}
