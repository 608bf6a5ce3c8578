use sqlx::SqlitePool;

use crate::models::User;

pub async fn insert_user(pool: &SqlitePool, email: &str, password_hash: &str) -> Result<User, sqlx::Error> {
  sqlx::query_as::<_, User>(
    r#"
    INSERT INTO users (email, password_hash)
    VALUES (?1, ?2)
    RETURNING id, email, password_hash
    "#,
  )
  .bind(email)
  .bind(password_hash)
  .fetch_one(pool)
  .await
}

pub async fn find_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
  sqlx::query_as::<_, User>("SELECT id, email, password_hash FROM users WHERE email = ?1")
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn find_user(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
  sqlx::query_as::<_, User>("SELECT id, email, password_hash FROM users WHERE id = ?1")
    .bind(id)
    .fetch_optional(pool)
    .await
}
