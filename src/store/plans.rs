use sqlx::SqlitePool;
use std::collections::HashSet;

use crate::models::plan::{PlanItemCreateRequest, PlanReorderItem};
use crate::models::{PlanItem, WorkoutPlan};

const ITEM_COLUMNS: &str = "id, plan_id, exercise_id, position, target_sets, target_reps, \
   target_weight_kg, target_duration_seconds, target_distance_meters";

pub async fn insert_plan(pool: &SqlitePool, user_id: i64, name: &str) -> Result<WorkoutPlan, sqlx::Error> {
  sqlx::query_as::<_, WorkoutPlan>(
    "INSERT INTO workout_plans (user_id, name) VALUES (?1, ?2) RETURNING id, user_id, name",
  )
  .bind(user_id)
  .bind(name)
  .fetch_one(pool)
  .await
}

/// Owned plans, newest id first
pub async fn list_plans(pool: &SqlitePool, user_id: i64) -> Result<Vec<WorkoutPlan>, sqlx::Error> {
  sqlx::query_as::<_, WorkoutPlan>(
    "SELECT id, user_id, name FROM workout_plans WHERE user_id = ?1 ORDER BY id DESC",
  )
  .bind(user_id)
  .fetch_all(pool)
  .await
}

pub async fn find_plan(pool: &SqlitePool, user_id: i64, id: i64) -> Result<Option<WorkoutPlan>, sqlx::Error> {
  sqlx::query_as::<_, WorkoutPlan>(
    "SELECT id, user_id, name FROM workout_plans WHERE id = ?1 AND user_id = ?2",
  )
  .bind(id)
  .bind(user_id)
  .fetch_optional(pool)
  .await
}

pub async fn delete_plan(pool: &SqlitePool, user_id: i64, id: i64) -> Result<bool, sqlx::Error> {
  let result = sqlx::query("DELETE FROM workout_plans WHERE id = ?1 AND user_id = ?2")
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

  Ok(result.rows_affected() > 0)
}

/// Items of a plan ordered by (position, id)
pub async fn list_items(pool: &SqlitePool, plan_id: i64) -> Result<Vec<PlanItem>, sqlx::Error> {
  let sql = format!(
    "SELECT {} FROM workout_plan_items WHERE plan_id = ?1 ORDER BY position, id",
    ITEM_COLUMNS
  );

  sqlx::query_as::<_, PlanItem>(&sql)
    .bind(plan_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_item(
  pool: &SqlitePool,
  plan_id: i64,
  item: &PlanItemCreateRequest,
) -> Result<PlanItem, sqlx::Error> {
  let sql = format!(
    r#"
    INSERT INTO workout_plan_items (
      plan_id, exercise_id, position, target_sets, target_reps,
      target_weight_kg, target_duration_seconds, target_distance_meters
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
    RETURNING {}
    "#,
    ITEM_COLUMNS
  );

  sqlx::query_as::<_, PlanItem>(&sql)
    .bind(plan_id)
    .bind(item.exercise_id)
    .bind(item.position)
    .bind(item.target_sets)
    .bind(item.target_reps)
    .bind(item.target_weight_kg)
    .bind(item.target_duration_seconds)
    .bind(item.target_distance_meters)
    .fetch_one(pool)
    .await
}

pub async fn find_item(pool: &SqlitePool, plan_id: i64, item_id: i64) -> Result<Option<PlanItem>, sqlx::Error> {
  let sql = format!(
    "SELECT {} FROM workout_plan_items WHERE id = ?1 AND plan_id = ?2",
    ITEM_COLUMNS
  );

  sqlx::query_as::<_, PlanItem>(&sql)
    .bind(item_id)
    .bind(plan_id)
    .fetch_optional(pool)
    .await
}

pub async fn update_item(pool: &SqlitePool, item: &PlanItem) -> Result<PlanItem, sqlx::Error> {
  let sql = format!(
    r#"
    UPDATE workout_plan_items
    SET position = ?1,
        target_sets = ?2,
        target_reps = ?3,
        target_weight_kg = ?4,
        target_duration_seconds = ?5,
        target_distance_meters = ?6
    WHERE id = ?7 AND plan_id = ?8
    RETURNING {}
    "#,
    ITEM_COLUMNS
  );

  sqlx::query_as::<_, PlanItem>(&sql)
    .bind(item.position)
    .bind(item.target_sets)
    .bind(item.target_reps)
    .bind(item.target_weight_kg)
    .bind(item.target_duration_seconds)
    .bind(item.target_distance_meters)
    .bind(item.id)
    .bind(item.plan_id)
    .fetch_one(pool)
    .await
}

pub async fn delete_item(pool: &SqlitePool, plan_id: i64, item_id: i64) -> Result<bool, sqlx::Error> {
  let result = sqlx::query("DELETE FROM workout_plan_items WHERE id = ?1 AND plan_id = ?2")
    .bind(item_id)
    .bind(plan_id)
    .execute(pool)
    .await?;

  Ok(result.rows_affected() > 0)
}

/// Apply new positions in one transaction.
///
/// Returns false, writing nothing, if any item is not part of the plan.
pub async fn reorder_items(
  pool: &SqlitePool,
  plan_id: i64,
  moves: &[PlanReorderItem],
) -> Result<bool, sqlx::Error> {
  let mut tx = pool.begin().await?;

  let owned: HashSet<i64> = sqlx::query_scalar::<_, i64>("SELECT id FROM workout_plan_items WHERE plan_id = ?1")
    .bind(plan_id)
    .fetch_all(&mut *tx)
    .await?
    .into_iter()
    .collect();

  if moves.iter().any(|m| !owned.contains(&m.item_id)) {
    tx.rollback().await?;
    return Ok(false);
  }

  for m in moves {
    sqlx::query("UPDATE workout_plan_items SET position = ?1 WHERE id = ?2 AND plan_id = ?3")
      .bind(m.position)
      .bind(m.item_id)
      .bind(plan_id)
      .execute(&mut *tx)
      .await?;
  }

  tx.commit().await?;
  Ok(true)
}
