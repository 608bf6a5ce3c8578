use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::workout::SetCreateRequest;
use crate::models::{Workout, WorkoutSet};

/// ---------------------------------------------------------------------------
/// Workouts
/// ---------------------------------------------------------------------------

pub async fn insert_workout(
  pool: &SqlitePool,
  user_id: i64,
  started_at: DateTime<Utc>,
  notes: Option<&str>,
) -> Result<Workout, sqlx::Error> {
  sqlx::query_as::<_, Workout>(
    r#"
    INSERT INTO workouts (user_id, started_at, notes)
    VALUES (?1, ?2, ?3)
    RETURNING id, user_id, started_at, ended_at, notes
    "#,
  )
  .bind(user_id)
  .bind(started_at)
  .bind(notes)
  .fetch_one(pool)
  .await
}

/// Owned workouts, newest first
pub async fn list_workouts(
  pool: &SqlitePool,
  user_id: i64,
  limit: i64,
  offset: i64,
) -> Result<Vec<Workout>, sqlx::Error> {
  sqlx::query_as::<_, Workout>(
    r#"
    SELECT id, user_id, started_at, ended_at, notes
    FROM workouts
    WHERE user_id = ?1
    ORDER BY started_at DESC, id DESC
    LIMIT ?2 OFFSET ?3
    "#,
  )
  .bind(user_id)
  .bind(limit)
  .bind(offset)
  .fetch_all(pool)
  .await
}

/// Every owned workout, unpaginated
pub async fn all_workouts(pool: &SqlitePool, user_id: i64) -> Result<Vec<Workout>, sqlx::Error> {
  sqlx::query_as::<_, Workout>(
    "SELECT id, user_id, started_at, ended_at, notes FROM workouts WHERE user_id = ?1 ORDER BY id",
  )
  .bind(user_id)
  .fetch_all(pool)
  .await
}

pub async fn find_workout(pool: &SqlitePool, user_id: i64, id: i64) -> Result<Option<Workout>, sqlx::Error> {
  sqlx::query_as::<_, Workout>(
    "SELECT id, user_id, started_at, ended_at, notes FROM workouts WHERE id = ?1 AND user_id = ?2",
  )
  .bind(id)
  .bind(user_id)
  .fetch_optional(pool)
  .await
}

/// Stamp `ended_at` unless the workout already has one
pub async fn end_workout(pool: &SqlitePool, id: i64, ended_at: DateTime<Utc>) -> Result<(), sqlx::Error> {
  sqlx::query("UPDATE workouts SET ended_at = ?1 WHERE id = ?2 AND ended_at IS NULL")
    .bind(ended_at)
    .bind(id)
    .execute(pool)
    .await?;

  Ok(())
}

pub async fn delete_workout(pool: &SqlitePool, user_id: i64, id: i64) -> Result<bool, sqlx::Error> {
  let result = sqlx::query("DELETE FROM workouts WHERE id = ?1 AND user_id = ?2")
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

  Ok(result.rows_affected() > 0)
}

/// ---------------------------------------------------------------------------
/// Sets
/// ---------------------------------------------------------------------------

const SET_COLUMNS: &str =
  "id, workout_id, exercise_id, set_number, reps, weight_kg, duration_seconds, distance_meters";

pub async fn insert_set(
  pool: &SqlitePool,
  workout_id: i64,
  set: &SetCreateRequest,
) -> Result<WorkoutSet, sqlx::Error> {
  let sql = format!(
    r#"
    INSERT INTO workout_sets (
      workout_id, exercise_id, set_number, reps, weight_kg, duration_seconds, distance_meters
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    RETURNING {}
    "#,
    SET_COLUMNS
  );

  sqlx::query_as::<_, WorkoutSet>(&sql)
    .bind(workout_id)
    .bind(set.exercise_id)
    .bind(set.set_number)
    .bind(set.reps)
    .bind(set.weight_kg)
    .bind(set.duration_seconds)
    .bind(set.distance_meters)
    .fetch_one(pool)
    .await
}

/// Sets of one workout ordered by (exercise_id, set_number, id)
pub async fn list_sets(pool: &SqlitePool, workout_id: i64) -> Result<Vec<WorkoutSet>, sqlx::Error> {
  let sql = format!(
    "SELECT {} FROM workout_sets WHERE workout_id = ?1 ORDER BY exercise_id, set_number, id",
    SET_COLUMNS
  );

  sqlx::query_as::<_, WorkoutSet>(&sql)
    .bind(workout_id)
    .fetch_all(pool)
    .await
}

pub async fn find_set(pool: &SqlitePool, workout_id: i64, set_id: i64) -> Result<Option<WorkoutSet>, sqlx::Error> {
  let sql = format!(
    "SELECT {} FROM workout_sets WHERE id = ?1 AND workout_id = ?2",
    SET_COLUMNS
  );

  sqlx::query_as::<_, WorkoutSet>(&sql)
    .bind(set_id)
    .bind(workout_id)
    .fetch_optional(pool)
    .await
}

pub async fn update_set(pool: &SqlitePool, set: &WorkoutSet) -> Result<WorkoutSet, sqlx::Error> {
  let sql = format!(
    r#"
    UPDATE workout_sets
    SET set_number = ?1,
        reps = ?2,
        weight_kg = ?3,
        duration_seconds = ?4,
        distance_meters = ?5
    WHERE id = ?6 AND workout_id = ?7
    RETURNING {}
    "#,
    SET_COLUMNS
  );

  sqlx::query_as::<_, WorkoutSet>(&sql)
    .bind(set.set_number)
    .bind(set.reps)
    .bind(set.weight_kg)
    .bind(set.duration_seconds)
    .bind(set.distance_meters)
    .bind(set.id)
    .bind(set.workout_id)
    .fetch_one(pool)
    .await
}

pub async fn delete_set(pool: &SqlitePool, workout_id: i64, set_id: i64) -> Result<bool, sqlx::Error> {
  let result = sqlx::query("DELETE FROM workout_sets WHERE id = ?1 AND workout_id = ?2")
    .bind(set_id)
    .bind(workout_id)
    .execute(pool)
    .await?;

  Ok(result.rows_affected() > 0)
}

/// Every set the user logged, in insertion order
pub async fn sets_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<WorkoutSet>, sqlx::Error> {
  sqlx::query_as::<_, WorkoutSet>(
    r#"
    SELECT s.id, s.workout_id, s.exercise_id, s.set_number,
           s.reps, s.weight_kg, s.duration_seconds, s.distance_meters
    FROM workout_sets s
    JOIN workouts w ON w.id = s.workout_id
    WHERE w.user_id = ?1
    ORDER BY s.id
    "#,
  )
  .bind(user_id)
  .fetch_all(pool)
  .await
}

/// The user's sets for one exercise, in insertion order
pub async fn sets_for_exercise(
  pool: &SqlitePool,
  user_id: i64,
  exercise_id: i64,
) -> Result<Vec<WorkoutSet>, sqlx::Error> {
  sqlx::query_as::<_, WorkoutSet>(
    r#"
    SELECT s.id, s.workout_id, s.exercise_id, s.set_number,
           s.reps, s.weight_kg, s.duration_seconds, s.distance_meters
    FROM workout_sets s
    JOIN workouts w ON w.id = s.workout_id
    WHERE w.user_id = ?1 AND s.exercise_id = ?2
    ORDER BY s.id
    "#,
  )
  .bind(user_id)
  .bind(exercise_id)
  .fetch_all(pool)
  .await
}
