//! Runtime configuration, read once from the environment at startup.

use jsonwebtoken::Algorithm;
use std::env;
use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://fitness.db?mode=rwc";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_ACCESS_TOKEN_EXP_MINUTES: i64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("{0} must be set")]
  Missing(&'static str),

  #[error("{var} has invalid value {value:?}: {reason}")]
  Invalid {
    var: &'static str,
    value: String,
    reason: &'static str,
  },
}

#[derive(Debug, Clone)]
pub struct Settings {
  pub database_url: String,
  pub jwt_secret: String,
  pub jwt_algorithm: Algorithm,
  pub access_token_exp_minutes: i64,
  pub bind_addr: SocketAddr,
}

impl Settings {
  /// Load `.env` if present, then read the process environment
  pub fn load() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();
    Self::from_env()
  }

  pub fn from_env() -> Result<Self, ConfigError> {
    let jwt_secret = match env::var("JWT_SECRET") {
      Ok(secret) if !secret.trim().is_empty() => secret,
      _ => return Err(ConfigError::Missing("JWT_SECRET")),
    };

    Ok(Self {
      database_url: database_url(),
      jwt_secret,
      jwt_algorithm: parse_algorithm(&var_or("JWT_ALGORITHM", "HS256"))?,
      access_token_exp_minutes: parse_expiry(env::var("ACCESS_TOKEN_EXP_MINUTES").ok())?,
      bind_addr: parse_bind_addr(&var_or("BIND_ADDR", DEFAULT_BIND_ADDR))?,
    })
  }
}

/// `DATABASE_URL` alone, for commands that never issue tokens
pub fn database_url() -> String {
  var_or("DATABASE_URL", DEFAULT_DATABASE_URL)
}

fn var_or(key: &str, default: &str) -> String {
  env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Only the HMAC family; the secret is a shared key, not a PEM
fn parse_algorithm(value: &str) -> Result<Algorithm, ConfigError> {
  match value.trim().to_ascii_uppercase().as_str() {
    "HS256" => Ok(Algorithm::HS256),
    "HS384" => Ok(Algorithm::HS384),
    "HS512" => Ok(Algorithm::HS512),
    _ => Err(ConfigError::Invalid {
      var: "JWT_ALGORITHM",
      value: value.to_string(),
      reason: "expected HS256, HS384 or HS512",
    }),
  }
}

fn parse_expiry(value: Option<String>) -> Result<i64, ConfigError> {
  let Some(raw) = value else {
    return Ok(DEFAULT_ACCESS_TOKEN_EXP_MINUTES);
  };

  match raw.trim().parse::<i64>() {
    Ok(minutes) if minutes > 0 => Ok(minutes),
    _ => Err(ConfigError::Invalid {
      var: "ACCESS_TOKEN_EXP_MINUTES",
      value: raw,
      reason: "expected a positive number of minutes",
    }),
  }
}

fn parse_bind_addr(value: &str) -> Result<SocketAddr, ConfigError> {
  value.trim().parse().map_err(|_| ConfigError::Invalid {
    var: "BIND_ADDR",
    value: value.to_string(),
    reason: "expected host:port",
  })
}
