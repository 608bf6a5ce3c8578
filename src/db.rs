use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::config::Settings;
use crate::security::TokenIssuer;

pub type DbPool = SqlitePool;

/// Application state shared by every request handler
pub struct AppState {
  pub db: DbPool,
  pub settings: Settings,
  pub tokens: TokenIssuer,
}

impl AppState {
  pub fn new(db: DbPool, settings: Settings) -> Self {
    let tokens = TokenIssuer::from_settings(&settings);
    Self { db, settings, tokens }
  }
}

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(database_url: &str) -> Result<DbPool, sqlx::Error> {
  tracing::info!(url = %database_url, "initializing database");

  let options = SqliteConnectOptions::from_str(database_url)?
    .create_if_missing(true)
    .foreign_keys(true);

  // Create connection pool
  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect_with(options)
    .await?;

  // Run migrations
  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::info!("database ready");

  Ok(pool)
}
