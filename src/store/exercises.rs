use sqlx::SqlitePool;

use crate::models::exercise::{normalize_name, NewExercise};
use crate::models::Exercise;

const EXERCISE_COLUMNS: &str =
  "id, user_id, template_id, name, name_normalized, muscle_group, equipment, category, tracking_type";

pub async fn insert_exercise(pool: &SqlitePool, new: &NewExercise) -> Result<Exercise, sqlx::Error> {
  let sql = format!(
    r#"
    INSERT INTO exercises (
      user_id, template_id, name, name_normalized,
      muscle_group, equipment, category, tracking_type
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
    RETURNING {}
    "#,
    EXERCISE_COLUMNS
  );

  sqlx::query_as::<_, Exercise>(&sql)
    .bind(new.user_id)
    .bind(new.template_id)
    .bind(&new.name)
    .bind(new.name_normalized())
    .bind(&new.muscle_group)
    .bind(&new.equipment)
    .bind(&new.category)
    .bind(&new.tracking_type)
    .fetch_one(pool)
    .await
}

/// Owned exercises ordered by name, optionally filtered by a substring of
/// the normalized name
pub async fn list_exercises(
  pool: &SqlitePool,
  user_id: i64,
  q: Option<&str>,
  limit: i64,
  offset: i64,
) -> Result<Vec<Exercise>, sqlx::Error> {
  let needle = q.map(normalize_name).filter(|n| !n.is_empty());

  let sql = format!(
    r#"
    SELECT {}
    FROM exercises
    WHERE user_id = ?1
      AND (?2 IS NULL OR instr(name_normalized, ?2) > 0)
    ORDER BY name, id
    LIMIT ?3 OFFSET ?4
    "#,
    EXERCISE_COLUMNS
  );

  sqlx::query_as::<_, Exercise>(&sql)
    .bind(user_id)
    .bind(needle)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Every owned exercise, ordered by name
pub async fn all_exercises(pool: &SqlitePool, user_id: i64) -> Result<Vec<Exercise>, sqlx::Error> {
  let sql = format!(
    "SELECT {} FROM exercises WHERE user_id = ?1 ORDER BY name, id",
    EXERCISE_COLUMNS
  );

  sqlx::query_as::<_, Exercise>(&sql)
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn find_exercise(pool: &SqlitePool, user_id: i64, id: i64) -> Result<Option<Exercise>, sqlx::Error> {
  let sql = format!(
    "SELECT {} FROM exercises WHERE id = ?1 AND user_id = ?2",
    EXERCISE_COLUMNS
  );

  sqlx::query_as::<_, Exercise>(&sql)
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Write back every mutable column of an owned exercise
pub async fn update_exercise(pool: &SqlitePool, exercise: &Exercise) -> Result<Exercise, sqlx::Error> {
  let sql = format!(
    r#"
    UPDATE exercises
    SET name = ?1,
        name_normalized = ?2,
        muscle_group = ?3,
        equipment = ?4,
        category = ?5,
        tracking_type = ?6
    WHERE id = ?7 AND user_id = ?8
    RETURNING {}
    "#,
    EXERCISE_COLUMNS
  );

  sqlx::query_as::<_, Exercise>(&sql)
    .bind(&exercise.name)
    .bind(&exercise.name_normalized)
    .bind(&exercise.muscle_group)
    .bind(&exercise.equipment)
    .bind(&exercise.category)
    .bind(&exercise.tracking_type)
    .bind(exercise.id)
    .bind(exercise.user_id)
    .fetch_one(pool)
    .await
}

/// Delete an owned exercise; its sets and plan items go with it.
/// Returns false when nothing matched.
pub async fn delete_exercise(pool: &SqlitePool, user_id: i64, id: i64) -> Result<bool, sqlx::Error> {
  let result = sqlx::query("DELETE FROM exercises WHERE id = ?1 AND user_id = ?2")
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

  Ok(result.rows_affected() > 0)
}
