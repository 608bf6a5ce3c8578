use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::HashSet;

use crate::models::template::{NewExerciseTemplate, TemplateSearch};
use crate::models::{ExerciseTemplate, ExerciseTemplateSummary};

/// Append the WHERE clause shared by the page query and the count query
fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, search: &TemplateSearch) {
  qb.push(" WHERE 1 = 1");

  if let Some(q) = search.q.as_deref().filter(|q| !q.is_empty()) {
    qb.push(" AND instr(lower(name), ")
      .push_bind(q.to_lowercase())
      .push(") > 0");
  }
  if let Some(category) = search.category.as_deref().filter(|c| !c.is_empty()) {
    qb.push(" AND category = ").push_bind(category.to_lowercase());
  }
  if let Some(equipment) = search.equipment.as_deref().filter(|e| !e.is_empty()) {
    qb.push(" AND equipment = ").push_bind(equipment.to_lowercase());
  }
  if let Some(tracking) = search.tracking_type.as_deref().filter(|t| !t.is_empty()) {
    qb.push(" AND tracking_type = ").push_bind(tracking.to_lowercase());
  }
  if let Some(muscle) = search.muscle.as_deref().filter(|m| !m.is_empty()) {
    let muscle = muscle.to_lowercase();
    qb.push(" AND (EXISTS (SELECT 1 FROM json_each(primary_muscles_json) WHERE lower(value) = ")
      .push_bind(muscle.clone())
      .push(") OR EXISTS (SELECT 1 FROM json_each(secondary_muscles_json) WHERE lower(value) = ")
      .push_bind(muscle)
      .push("))");
  }
}

/// One page of matching templates ordered by name, plus the unpaginated total
pub async fn search_templates(
  pool: &SqlitePool,
  search: &TemplateSearch,
) -> Result<(Vec<ExerciseTemplateSummary>, i64), sqlx::Error> {
  let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM exercise_templates");
  push_filters(&mut count, search);
  let total = count.build_query_scalar::<i64>().fetch_one(pool).await?;

  let mut page = QueryBuilder::<Sqlite>::new(
    "SELECT id, source_id, slug, name, category, equipment, tracking_type FROM exercise_templates",
  );
  push_filters(&mut page, search);
  page
    .push(" ORDER BY name, id LIMIT ")
    .push_bind(search.limit)
    .push(" OFFSET ")
    .push_bind(search.offset);

  let items = page
    .build_query_as::<ExerciseTemplateSummary>()
    .fetch_all(pool)
    .await?;

  Ok((items, total))
}

pub async fn find_template(pool: &SqlitePool, id: i64) -> Result<Option<ExerciseTemplate>, sqlx::Error> {
  sqlx::query_as::<_, ExerciseTemplate>(
    r#"
    SELECT
      id, source_id, slug, name, description, image_url, category, equipment,
      tracking_type, force, level, mechanic,
      primary_muscles_json, secondary_muscles_json, instructions_json
    FROM exercise_templates
    WHERE id = ?1
    "#,
  )
  .bind(id)
  .fetch_optional(pool)
  .await
}

/// Source ids and slugs already in the catalog
pub async fn existing_keys(pool: &SqlitePool) -> Result<(HashSet<String>, HashSet<String>), sqlx::Error> {
  let rows: Vec<(String, String)> = sqlx::query_as("SELECT source_id, slug FROM exercise_templates")
    .fetch_all(pool)
    .await?;

  Ok(rows.into_iter().unzip())
}

pub async fn insert_template(pool: &SqlitePool, template: &NewExerciseTemplate) -> Result<i64, sqlx::Error> {
  let to_json = |list: &Vec<String>| serde_json::to_string(list).unwrap_or_else(|_| "[]".to_string());

  let result = sqlx::query(
    r#"
    INSERT INTO exercise_templates (
      source_id, slug, name, category, equipment, tracking_type,
      force, level, mechanic,
      primary_muscles_json, secondary_muscles_json, instructions_json
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
    "#,
  )
  .bind(&template.source_id)
  .bind(&template.slug)
  .bind(&template.name)
  .bind(&template.category)
  .bind(&template.equipment)
  .bind(&template.tracking_type)
  .bind(&template.force)
  .bind(&template.level)
  .bind(&template.mechanic)
  .bind(to_json(&template.primary_muscles))
  .bind(to_json(&template.secondary_muscles))
  .bind(to_json(&template.instructions))
  .execute(pool)
  .await?;

  Ok(result.last_insert_rowid())
}
