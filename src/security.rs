//! Password hashing and access tokens
//!
//! Passwords are stored as Argon2id PHC strings. Access tokens are HMAC
//! signed JWTs whose `sub` is the user id.

use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::{ApiError, ApiResult};

pub const ACCESS_TOKEN_TYPE: &str = "access";

/// ---------------------------------------------------------------------------
/// Passwords
/// ---------------------------------------------------------------------------

/// Hash a password with Argon2id and a fresh random salt
pub fn hash_password(password: &str) -> ApiResult<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| ApiError::PasswordHash(e.to_string()))
}

/// Check a password against a stored PHC string.
///
/// A wrong password is `Ok(false)`; only an unreadable stored hash is an error.
pub fn verify_password(password: &str, password_hash: &str) -> ApiResult<bool> {
  let parsed = PasswordHash::new(password_hash).map_err(|e| ApiError::PasswordHash(e.to_string()))?;
  Ok(
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .is_ok(),
  )
}

/// Hash on the blocking pool so the executor keeps serving requests
pub async fn hash_password_blocking(password: String) -> ApiResult<String> {
  tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

pub async fn verify_password_blocking(password: String, password_hash: String) -> ApiResult<bool> {
  tokio::task::spawn_blocking(move || verify_password(&password, &password_hash)).await?
}

/// ---------------------------------------------------------------------------
/// Access Tokens
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  pub sub: String,
  pub iat: i64,
  pub exp: i64,
  #[serde(rename = "type")]
  pub token_type: String,
}

pub struct TokenIssuer {
  algorithm: Algorithm,
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  ttl: Duration,
}

impl TokenIssuer {
  pub fn new(secret: &str, algorithm: Algorithm, ttl_minutes: i64) -> Self {
    Self {
      algorithm,
      encoding_key: EncodingKey::from_secret(secret.as_bytes()),
      decoding_key: DecodingKey::from_secret(secret.as_bytes()),
      ttl: Duration::minutes(ttl_minutes),
    }
  }

  pub fn from_settings(settings: &Settings) -> Self {
    Self::new(
      &settings.jwt_secret,
      settings.jwt_algorithm,
      settings.access_token_exp_minutes,
    )
  }

  /// Sign an access token for `user_id`, valid for the configured lifetime
  pub fn issue(&self, user_id: i64) -> ApiResult<String> {
    let now = Utc::now();
    let claims = Claims {
      sub: user_id.to_string(),
      iat: now.timestamp(),
      exp: (now + self.ttl).timestamp(),
      token_type: ACCESS_TOKEN_TYPE.to_string(),
    };
    Ok(encode(&Header::new(self.algorithm), &claims, &self.encoding_key)?)
  }

  /// Verify signature, expiry and token type, returning the user id.
  /// Every failure collapses to `None`.
  pub fn verify(&self, token: &str) -> Option<i64> {
    let mut validation = Validation::new(self.algorithm);
    // Expired means expired; no grace period past `exp`
    validation.leeway = 0;

    let claims = match decode::<Claims>(token, &self.decoding_key, &validation) {
      Ok(data) => data.claims,
      Err(e) => {
        tracing::debug!(error = %e, "rejected access token");
        return None;
      }
    };

    if claims.token_type != ACCESS_TOKEN_TYPE {
      return None;
    }
    claims.sub.parse().ok()
  }
}
