use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::validation;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
  pub id: i64,
  pub email: String,
  #[serde(skip_serializing)]
  pub password_hash: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
  pub email: String,
  pub password: String,
}

impl RegisterRequest {
  pub fn validate(&self) -> ApiResult<()> {
    validation::email(self.normalized_email().as_str())?;
    validation::length("password", &self.password, 8, 128)
  }

  /// Emails are matched case-insensitively, so store them folded
  pub fn normalized_email(&self) -> String {
    normalize_email(&self.email)
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
  pub email: String,
  pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
  pub access_token: String,
  pub token_type: String,
}

impl TokenResponse {
  pub fn bearer(access_token: String) -> Self {
    Self {
      access_token,
      token_type: "bearer".to_string(),
    }
  }
}

pub fn normalize_email(email: &str) -> String {
  email.trim().to_lowercase()
}
