use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  #[error("{0}")]
  BadRequest(String),

  #[error("Not authenticated")]
  Unauthorized,

  #[error("Invalid credentials")]
  InvalidCredentials,

  #[error("{0} not found")]
  NotFound(&'static str),

  #[error("{0}")]
  Conflict(String),

  #[error("{0}")]
  Validation(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Password hashing failed: {0}")]
  PasswordHash(String),

  #[error("Token encoding failed: {0}")]
  Token(#[from] jsonwebtoken::errors::Error),

  #[error("Background task failed: {0}")]
  Task(#[from] tokio::task::JoinError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      Self::BadRequest(_) => StatusCode::BAD_REQUEST,
      Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::Conflict(_) => StatusCode::CONFLICT,
      Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
      Self::Database(_) | Self::PasswordHash(_) | Self::Token(_) | Self::Task(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();

    let detail = if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
      "Internal server error".to_string()
    } else {
      self.to_string()
    };

    let mut response = (status, Json(json!({ "detail": detail }))).into_response();

    if status == StatusCode::UNAUTHORIZED {
      response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }

    response
  }
}

/// Extractor rejections surface as 422 with axum's own explanation
impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::Validation(rejection.body_text())
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    Self::Validation(rejection.body_text())
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    Self::Validation(rejection.body_text())
  }
}
