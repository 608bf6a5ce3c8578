use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use std::sync::Arc;

use crate::db::AppState;
use crate::error::ApiError;
use crate::models::User;
use crate::store::users;

/// The authenticated caller, resolved from `Authorization: Bearer <token>`.
///
/// Missing, malformed, expired or forged tokens and tokens for deleted
/// users all reject with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
  pub fn id(&self) -> i64 {
    self.0.id
  }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
  let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
  let (scheme, token) = value.split_once(' ')?;
  let token = token.trim();
  (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
    let Some(token) = bearer_token(parts) else {
      return Err(ApiError::Unauthorized);
    };

    let Some(user_id) = state.tokens.verify(token) else {
      tracing::warn!(path = %parts.uri.path(), "invalid access token");
      return Err(ApiError::Unauthorized);
    };

    match users::find_user(&state.db, user_id).await? {
      Some(user) => Ok(Self(user)),
      None => {
        tracing::warn!(user_id, "token for unknown user");
        Err(ApiError::Unauthorized)
      }
    }
  }
}
