//! Registration, login and the caller's own profile

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

use crate::auth::CurrentUser;
use crate::db::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::models::user::{normalize_email, LoginRequest, RegisterRequest, TokenResponse};
use crate::security::{hash_password_blocking, verify_password_blocking};
use crate::store::{is_unique_violation, users};

pub fn routes() -> Router<Arc<AppState>> {
  Router::new()
    .route("/auth/register", post(register))
    .route("/auth/login", post(login))
    .route("/auth/me", get(me))
}

fn email_taken() -> ApiError {
  ApiError::Conflict("Email already registered".to_string())
}

#[tracing::instrument(skip_all)]
async fn register(
  State(state): State<Arc<AppState>>,
  ApiJson(payload): ApiJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
  payload.validate()?;
  let email = payload.normalized_email();

  if users::find_user_by_email(&state.db, &email).await?.is_some() {
    return Err(email_taken());
  }

  let password_hash = hash_password_blocking(payload.password).await?;
  let user = users::insert_user(&state.db, &email, &password_hash)
    .await
    .map_err(|e| if is_unique_violation(&e) { email_taken() } else { e.into() })?;

  tracing::info!(user_id = user.id, "registered user");
  Ok((StatusCode::CREATED, Json(user)))
}

#[tracing::instrument(skip_all)]
async fn login(
  State(state): State<Arc<AppState>>,
  ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
  let email = normalize_email(&payload.email);

  let Some(user) = users::find_user_by_email(&state.db, &email).await? else {
    tracing::warn!("login for unknown email");
    return Err(ApiError::InvalidCredentials);
  };

  if !verify_password_blocking(payload.password, user.password_hash.clone()).await? {
    tracing::warn!(user_id = user.id, "login with wrong password");
    return Err(ApiError::InvalidCredentials);
  }

  let token = state.tokens.issue(user.id)?;
  Ok(Json(TokenResponse::bearer(token)))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<crate::models::User> {
  Json(user)
}
