//! The caller's exercise library

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

use crate::auth::CurrentUser;
use crate::db::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::models::exercise::{ExerciseCreateRequest, ExerciseSearch, ExerciseUpdateRequest, NewExercise};
use crate::models::Exercise;
use crate::store::{exercises, is_unique_violation, templates};
use crate::validation;

pub fn routes() -> Router<Arc<AppState>> {
  Router::new()
    .route("/exercises", post(create_exercise).get(list_exercises))
    .route(
      "/exercises/:id",
      get(get_exercise).put(update_exercise).delete(delete_exercise),
    )
    .route("/exercises/from-template/:template_id", post(create_from_template))
}

fn already_exists(e: sqlx::Error) -> ApiError {
  if is_unique_violation(&e) {
    ApiError::Conflict("Exercise already exists".to_string())
  } else {
    e.into()
  }
}

async fn create_exercise(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  ApiJson(payload): ApiJson<ExerciseCreateRequest>,
) -> ApiResult<impl IntoResponse> {
  payload.validate()?;

  let exercise = exercises::insert_exercise(&state.db, &payload.into_new(user.id()))
    .await
    .map_err(already_exists)?;

  tracing::info!(user_id = user.id(), exercise_id = exercise.id, "created exercise");
  Ok((StatusCode::CREATED, Json(exercise)))
}

async fn list_exercises(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  ApiQuery(search): ApiQuery<ExerciseSearch>,
) -> ApiResult<Json<Vec<Exercise>>> {
  validation::page(search.limit, search.offset)?;

  let items =
    exercises::list_exercises(&state.db, user.id(), search.q.as_deref(), search.limit, search.offset).await?;
  Ok(Json(items))
}

async fn get_exercise(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Exercise>> {
  exercises::find_exercise(&state.db, user.id(), id)
    .await?
    .map(Json)
    .ok_or(ApiError::NotFound("Exercise"))
}

/// Copy a catalog entry into the caller's library
async fn create_from_template(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  ApiPath(template_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
  let template = templates::find_template(&state.db, template_id)
    .await?
    .ok_or(ApiError::NotFound("Template"))?;

  let muscle_group = template
    .primary_muscles()
    .into_iter()
    .next()
    .unwrap_or_else(|| "unknown".to_string());

  let new = NewExercise {
    user_id: user.id(),
    template_id: Some(template.id),
    name: template.name,
    muscle_group,
    equipment: template.equipment,
    category: template.category,
    tracking_type: template.tracking_type,
  };

  let exercise = exercises::insert_exercise(&state.db, &new)
    .await
    .map_err(already_exists)?;

  tracing::info!(user_id = user.id(), exercise_id = exercise.id, template_id, "created exercise from template");
  Ok((StatusCode::CREATED, Json(exercise)))
}

async fn update_exercise(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  ApiPath(id): ApiPath<i64>,
  ApiJson(payload): ApiJson<ExerciseUpdateRequest>,
) -> ApiResult<Json<Exercise>> {
  payload.validate()?;

  let mut exercise = exercises::find_exercise(&state.db, user.id(), id)
    .await?
    .ok_or(ApiError::NotFound("Exercise"))?;
  payload.apply(&mut exercise);

  let updated = exercises::update_exercise(&state.db, &exercise)
    .await
    .map_err(|e| {
      if is_unique_violation(&e) {
        ApiError::Conflict("Exercise name already exists".to_string())
      } else {
        e.into()
      }
    })?;

  Ok(Json(updated))
}

async fn delete_exercise(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
  if !exercises::delete_exercise(&state.db, user.id(), id).await? {
    return Err(ApiError::NotFound("Exercise"));
  }

  tracing::info!(user_id = user.id(), exercise_id = id, "deleted exercise");
  Ok(StatusCode::NO_CONTENT)
}
