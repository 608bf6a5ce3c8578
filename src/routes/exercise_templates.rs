//! Public, read-only exercise catalog

use axum::extract::State;
use axum::http::header::HeaderName;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;

use crate::db::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiPath, ApiQuery};
use crate::models::template::{ExerciseTemplateDetail, TemplateSearch};
use crate::store::templates;
use crate::validation;

pub const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");

pub fn routes() -> Router<Arc<AppState>> {
  Router::new()
    .route("/exercise-templates", get(list_templates))
    .route("/exercise-templates/:id", get(get_template))
}

async fn list_templates(
  State(state): State<Arc<AppState>>,
  ApiQuery(search): ApiQuery<TemplateSearch>,
) -> ApiResult<impl IntoResponse> {
  validation::page(search.limit, search.offset)?;

  let (items, total) = templates::search_templates(&state.db, &search).await?;
  Ok(([(TOTAL_COUNT_HEADER, total.to_string())], Json(items)))
}

async fn get_template(
  State(state): State<Arc<AppState>>,
  ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<ExerciseTemplateDetail>> {
  templates::find_template(&state.db, id)
    .await?
    .map(|t| Json(t.into_detail()))
    .ok_or(ApiError::NotFound("Template"))
}
