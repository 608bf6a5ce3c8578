//! Workout plans: ordered lists of exercises with optional targets

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use std::sync::Arc;

use crate::auth::CurrentUser;
use crate::db::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::models::plan::{
  PlanCreateRequest, PlanDetail, PlanItemCreateRequest, PlanItemUpdateRequest, PlanReorderRequest,
};
use crate::models::{PlanItem, WorkoutPlan};
use crate::store::{exercises, plans};

pub fn routes() -> Router<Arc<AppState>> {
  Router::new()
    .route("/plans", post(create_plan).get(list_plans))
    .route("/plans/:id", get(get_plan).delete(delete_plan))
    .route("/plans/:id/items", post(add_item))
    .route("/plans/:id/items/:item_id", put(update_item).delete(delete_item))
    .route("/plans/:id/reorder", put(reorder_plan))
}

async fn owned_plan(state: &AppState, user: &CurrentUser, id: i64) -> ApiResult<WorkoutPlan> {
  plans::find_plan(&state.db, user.id(), id)
    .await?
    .ok_or(ApiError::NotFound("Plan"))
}

async fn plan_detail(state: &AppState, plan: WorkoutPlan) -> ApiResult<PlanDetail> {
  let items = plans::list_items(&state.db, plan.id).await?;
  Ok(PlanDetail { plan, items })
}

async fn create_plan(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  ApiJson(payload): ApiJson<PlanCreateRequest>,
) -> ApiResult<impl IntoResponse> {
  payload.validate()?;

  let plan = plans::insert_plan(&state.db, user.id(), &payload.name).await?;
  tracing::info!(user_id = user.id(), plan_id = plan.id, "created plan");
  Ok((StatusCode::CREATED, Json(plan)))
}

async fn list_plans(State(state): State<Arc<AppState>>, user: CurrentUser) -> ApiResult<Json<Vec<WorkoutPlan>>> {
  Ok(Json(plans::list_plans(&state.db, user.id()).await?))
}

async fn get_plan(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<PlanDetail>> {
  let plan = owned_plan(&state, &user, id).await?;
  Ok(Json(plan_detail(&state, plan).await?))
}

async fn delete_plan(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
  if !plans::delete_plan(&state.db, user.id(), id).await? {
    return Err(ApiError::NotFound("Plan"));
  }
  Ok(StatusCode::NO_CONTENT)
}

async fn add_item(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  ApiPath(plan_id): ApiPath<i64>,
  ApiJson(payload): ApiJson<PlanItemCreateRequest>,
) -> ApiResult<impl IntoResponse> {
  payload.validate()?;

  let plan = owned_plan(&state, &user, plan_id).await?;
  if exercises::find_exercise(&state.db, user.id(), payload.exercise_id)
    .await?
    .is_none()
  {
    return Err(ApiError::NotFound("Exercise"));
  }

  let item = plans::insert_item(&state.db, plan.id, &payload).await?;
  Ok((StatusCode::CREATED, Json(item)))
}

async fn update_item(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  ApiPath((plan_id, item_id)): ApiPath<(i64, i64)>,
  ApiJson(payload): ApiJson<PlanItemUpdateRequest>,
) -> ApiResult<Json<PlanItem>> {
  payload.validate()?;

  let plan = owned_plan(&state, &user, plan_id).await?;
  let mut item = plans::find_item(&state.db, plan.id, item_id)
    .await?
    .ok_or(ApiError::NotFound("Item"))?;
  payload.apply(&mut item);

  Ok(Json(plans::update_item(&state.db, &item).await?))
}

async fn delete_item(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  ApiPath((plan_id, item_id)): ApiPath<(i64, i64)>,
) -> ApiResult<StatusCode> {
  let plan = owned_plan(&state, &user, plan_id).await?;
  if !plans::delete_item(&state.db, plan.id, item_id).await? {
    return Err(ApiError::NotFound("Item"));
  }
  Ok(StatusCode::NO_CONTENT)
}

/// All-or-nothing position update
async fn reorder_plan(
  State(state): State<Arc<AppState>>,
  user: CurrentUser,
  ApiPath(plan_id): ApiPath<i64>,
  ApiJson(payload): ApiJson<PlanReorderRequest>,
) -> ApiResult<Json<PlanDetail>> {
  payload.validate()?;

  let plan = owned_plan(&state, &user, plan_id).await?;
  if !plans::reorder_items(&state.db, plan.id, &payload.items).await? {
    return Err(ApiError::NotFound("Item"));
  }

  Ok(Json(plan_detail(&state, plan).await?))
}

#[cfg(test)]
mod tests {
  use crate::routes::build_router;
  use crate::test_utils::*;
  use axum::http::{Method, StatusCode};
  use serde_json::{json, Value};

  fn item_ids(detail: &Value) -> Vec<i64> {
    detail["items"]
      .as_array()
      .unwrap()
      .iter()
      .map(|i| i["id"].as_i64().unwrap())
      .collect()
  }

  #[tokio::test]
  async fn test_plan_items_and_reorder() {
    let pool = setup_test_db().await;
    let state = test_state(&pool);
    let app = build_router(state.clone());
    let user = seed_test_user(&pool, "a@example.com").await;
    let token = bearer(&state, user);
    let squat = seed_test_exercise(&pool, user, "Squat", "weight_reps").await;

    let (status, plan) = send(&app, Method::POST, "/plans", Some(&token), Some(json!({ "name": "Leg day" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let plan_uri = format!("/plans/{}", plan["id"]);

    let mut ids = Vec::new();
    for position in [1, 2] {
      let (status, item) = send(
        &app,
        Method::POST,
        &format!("{}/items", plan_uri),
        Some(&token),
        Some(json!({ "exercise_id": squat, "position": position, "target_sets": 3 })),
      )
      .await;
      assert_eq!(status, StatusCode::CREATED);
      ids.push(item["id"].as_i64().unwrap());
    }

    let (status, detail) = send(
      &app,
      Method::PUT,
      &format!("{}/reorder", plan_uri),
      Some(&token),
      Some(json!({ "items": [
        { "item_id": ids[0], "position": 2 },
        { "item_id": ids[1], "position": 1 }
      ] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["name"], "Leg day");
    assert_eq!(item_ids(&detail), vec![ids[1], ids[0]]);

    let (status, item) = send(
      &app,
      Method::PUT,
      &format!("{}/items/{}", plan_uri, ids[0]),
      Some(&token),
      Some(json!({ "target_reps": 8 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["target_reps"], 8);
    assert_eq!(item["target_sets"], 3);
    assert_eq!(item["position"], 2);

    let (status, _) = send(&app, Method::DELETE, &format!("{}/items/{}", plan_uri, ids[0]), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, detail) = send(&app, Method::GET, &plan_uri, Some(&token), None).await;
    assert_eq!(item_ids(&detail), vec![ids[1]]);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_reorder_rejections() {
    let pool = setup_test_db().await;
    let state = test_state(&pool);
    let app = build_router(state.clone());
    let user = seed_test_user(&pool, "a@example.com").await;
    let token = bearer(&state, user);
    let squat = seed_test_exercise(&pool, user, "Squat", "weight_reps").await;

    let (_, plan) = send(&app, Method::POST, "/plans", Some(&token), Some(json!({ "name": "Leg day" }))).await;
    let plan_uri = format!("/plans/{}", plan["id"]);
    let (_, item) = send(
      &app,
      Method::POST,
      &format!("{}/items", plan_uri),
      Some(&token),
      Some(json!({ "exercise_id": squat, "position": 1 })),
    )
    .await;

    let (status, _) = send(
      &app,
      Method::PUT,
      &format!("{}/reorder", plan_uri),
      Some(&token),
      Some(json!({ "items": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
      &app,
      Method::PUT,
      &format!("{}/reorder", plan_uri),
      Some(&token),
      Some(json!({ "items": [
        { "item_id": item["id"], "position": 1 },
        { "item_id": item["id"], "position": 2 }
      ] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
      &app,
      Method::PUT,
      &format!("{}/reorder", plan_uri),
      Some(&token),
      Some(json!({ "items": [
        { "item_id": item["id"], "position": 4 },
        { "item_id": 999, "position": 1 }
      ] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Item not found");

    // Nothing moved
    let (_, detail) = send(&app, Method::GET, &plan_uri, Some(&token), None).await;
    assert_eq!(detail["items"][0]["position"], 1);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_plans_are_owner_scoped() {
    let pool = setup_test_db().await;
    let state = test_state(&pool);
    let app = build_router(state.clone());
    let alice = bearer(&state, seed_test_user(&pool, "alice@example.com").await);
    let bob_id = seed_test_user(&pool, "bob@example.com").await;
    let bob = bearer(&state, bob_id);
    let bobs_squat = seed_test_exercise(&pool, bob_id, "Squat", "weight_reps").await;

    let (_, first) = send(&app, Method::POST, "/plans", Some(&alice), Some(json!({ "name": "First" }))).await;
    let (_, second) = send(&app, Method::POST, "/plans", Some(&alice), Some(json!({ "name": "Second" }))).await;

    let (_, list) = send(&app, Method::GET, "/plans", Some(&alice), None).await;
    assert_eq!(list, json!([second, first]));

    let (status, body) = send(&app, Method::GET, &format!("/plans/{}", first["id"]), Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Plan not found");

    // Alice cannot plan with Bob's exercise
    let (status, body) = send(
      &app,
      Method::POST,
      &format!("/plans/{}/items", first["id"]),
      Some(&alice),
      Some(json!({ "exercise_id": bobs_squat, "position": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Exercise not found");

    let (status, _) = send(&app, Method::DELETE, &format!("/plans/{}", first["id"]), Some(&alice), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    teardown_test_db(pool).await;
  }
}
