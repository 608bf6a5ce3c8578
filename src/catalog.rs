//! Exercise template catalog import
//!
//! Reads a JSON array of dataset entries (the free-exercise-db layout) and
//! inserts every entry whose source id is not yet in the catalog.

use serde::Deserialize;
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::models::template::NewExerciseTemplate;
use crate::store::templates;
use crate::tracking::TrackingType;

const DEFAULT_CATEGORY: &str = "strength";
const DEFAULT_EQUIPMENT: &str = "body";
const SLUG_MAX_CHARS: usize = 100;
const SLUG_FALLBACK: &str = "exercise";

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("Failed to read dataset: {0}")]
  Read(#[from] std::io::Error),
  #[error("Failed to parse dataset: {0}")]
  Parse(#[from] serde_json::Error),
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}

/// One entry of the dataset file. Every field is optional so that a single
/// malformed entry is skipped instead of failing the whole import.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetEntry {
  pub id: Option<String>,
  pub name: Option<String>,
  pub category: Option<String>,
  pub equipment: Option<String>,
  pub force: Option<String>,
  pub level: Option<String>,
  pub mechanic: Option<String>,
  pub primary_muscles: Option<Vec<String>>,
  pub secondary_muscles: Option<Vec<String>>,
  pub instructions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
  pub created: usize,
  pub skipped: usize,
}

/// URL-safe identifier derived from a dataset id
pub fn slugify(value: &str) -> String {
  let mut slug = String::with_capacity(value.len());
  let mut pending_dash = false;

  for c in value.trim().to_lowercase().chars() {
    if c.is_ascii_alphanumeric() {
      if pending_dash && !slug.is_empty() {
        slug.push('-');
      }
      pending_dash = false;
      slug.push(c);
    } else {
      pending_dash = true;
    }
  }

  let slug: String = slug.chars().take(SLUG_MAX_CHARS).collect();
  let slug = slug.trim_end_matches('-');
  if slug.is_empty() {
    SLUG_FALLBACK.to_string()
  } else {
    slug.to_string()
  }
}

/// Strength work is logged as weight x reps, everything else by time
pub fn map_tracking_type(category: &str) -> TrackingType {
  if category.eq_ignore_ascii_case(DEFAULT_CATEGORY) {
    TrackingType::WeightReps
  } else {
    TrackingType::Time
  }
}

/// Append `-2`, `-3`, ... until the slug is free, then claim it
fn unique_slug(base: String, taken: &mut HashSet<String>) -> String {
  let mut slug = base.clone();
  let mut n = 2;
  while taken.contains(&slug) {
    slug = format!("{}-{}", base, n);
    n += 1;
  }
  taken.insert(slug.clone());
  slug
}

fn lowered_or(value: Option<String>, default: &str) -> String {
  value
    .filter(|v| !v.trim().is_empty())
    .map(|v| v.trim().to_lowercase())
    .unwrap_or_else(|| default.to_string())
}

/// Build the catalog row for an entry, or None when it lacks an id or name
fn to_template(entry: DatasetEntry, slugs: &mut HashSet<String>) -> Option<NewExerciseTemplate> {
  let source_id = entry.id.filter(|s| !s.is_empty())?;
  let name = entry.name.filter(|s| !s.is_empty())?;
  let category = lowered_or(entry.category, DEFAULT_CATEGORY);
  let equipment = lowered_or(entry.equipment, DEFAULT_EQUIPMENT);

  Some(NewExerciseTemplate {
    slug: unique_slug(slugify(&source_id), slugs),
    tracking_type: map_tracking_type(&category).as_str().to_string(),
    source_id,
    name,
    category,
    equipment,
    force: entry.force,
    level: entry.level,
    mechanic: entry.mechanic,
    primary_muscles: entry.primary_muscles.unwrap_or_default(),
    secondary_muscles: entry.secondary_muscles.unwrap_or_default(),
    instructions: entry.instructions.unwrap_or_default(),
  })
}

/// Insert every new entry; entries already present (by source id) or
/// missing an id or name are counted as skipped
pub async fn seed_templates(pool: &SqlitePool, entries: Vec<DatasetEntry>) -> Result<SeedReport, CatalogError> {
  let (mut source_ids, mut slugs) = templates::existing_keys(pool).await?;
  let mut report = SeedReport::default();

  for entry in entries {
    if entry.id.as_ref().is_some_and(|id| source_ids.contains(id)) {
      report.skipped += 1;
      continue;
    }

    let Some(template) = to_template(entry, &mut slugs) else {
      report.skipped += 1;
      continue;
    };

    templates::insert_template(pool, &template).await?;
    source_ids.insert(template.source_id);
    report.created += 1;
  }

  tracing::info!(created = report.created, skipped = report.skipped, "template seed done");
  Ok(report)
}

/// Load a dataset file and seed it
pub async fn seed_templates_from_file(pool: &SqlitePool, path: &Path) -> Result<SeedReport, CatalogError> {
  let raw = tokio::fs::read_to_string(path).await?;
  let entries: Vec<DatasetEntry> = serde_json::from_str(&raw)?;
  tracing::info!(path = %path.display(), entries = entries.len(), "loaded template dataset");

  seed_templates(pool, entries).await
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{setup_test_db, teardown_test_db};

  fn entry(id: &str, name: &str, category: Option<&str>) -> DatasetEntry {
    DatasetEntry {
      id: Some(id.to_string()),
      name: Some(name.to_string()),
      category: category.map(String::from),
      ..Default::default()
    }
  }

  #[test]
  fn test_slugify() {
    assert_eq!(slugify("Barbell_Curl"), "barbell-curl");
    assert_eq!(slugify("  3/4 Sit-Up  "), "3-4-sit-up");
    assert_eq!(slugify("__Weird__Name__"), "weird-name");
    assert_eq!(slugify("!!!"), "exercise");
    assert_eq!(slugify(""), "exercise");
    assert_eq!(slugify(&"a".repeat(150)).len(), 100);
  }

  #[test]
  fn test_map_tracking_type() {
    assert_eq!(map_tracking_type("strength"), TrackingType::WeightReps);
    assert_eq!(map_tracking_type("Strength"), TrackingType::WeightReps);
    assert_eq!(map_tracking_type("cardio"), TrackingType::Time);
    assert_eq!(map_tracking_type("stretching"), TrackingType::Time);
  }

  #[test]
  fn test_unique_slug_suffixes_collisions() {
    let mut taken = HashSet::new();
    assert_eq!(unique_slug("curl".into(), &mut taken), "curl");
    assert_eq!(unique_slug("curl".into(), &mut taken), "curl-2");
    assert_eq!(unique_slug("curl".into(), &mut taken), "curl-3");
  }

  #[test]
  fn test_dataset_entry_uses_camel_case() {
    let raw = r#"[{
      "id": "Plank",
      "name": "Plank",
      "category": "Stretching",
      "primaryMuscles": ["abdominals"],
      "secondaryMuscles": [],
      "instructions": null,
      "images": ["Plank/0.jpg"]
    }]"#;
    let entries: Vec<DatasetEntry> = serde_json::from_str(raw).unwrap();
    assert_eq!(entries[0].primary_muscles, Some(vec!["abdominals".to_string()]));
    assert_eq!(entries[0].instructions, None);
  }

  #[tokio::test]
  async fn test_seed_defaults_and_skips() {
    let pool = setup_test_db().await;

    let mut curl = entry("Barbell_Curl", "Barbell Curl", None);
    curl.primary_muscles = Some(vec!["biceps".to_string()]);
    let entries = vec![
      curl,
      entry("Running_Treadmill", "Running, Treadmill", Some("Cardio")),
      DatasetEntry {
        name: Some("No id".to_string()),
        ..Default::default()
      },
      entry("Nameless", "", Some("strength")),
      entry("Barbell_Curl", "Barbell Curl again", None),
    ];

    let report = seed_templates(&pool, entries).await.unwrap();
    assert_eq!(report, SeedReport { created: 2, skipped: 3 });

    let rows: Vec<(String, String, String, String, String)> = sqlx::query_as(
      "SELECT slug, category, equipment, tracking_type, primary_muscles_json
       FROM exercise_templates ORDER BY id",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(
      rows[0],
      (
        "barbell-curl".into(),
        "strength".into(),
        "body".into(),
        "weight_reps".into(),
        r#"["biceps"]"#.into()
      )
    );
    assert_eq!(rows[1].1, "cardio");
    assert_eq!(rows[1].3, "time");

    // Second run finds everything already present
    let again = seed_templates(&pool, vec![entry("Barbell_Curl", "Barbell Curl", None)])
      .await
      .unwrap();
    assert_eq!(again, SeedReport { created: 0, skipped: 1 });

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_from_file() {
    let pool = setup_test_db().await;
    let path = std::env::temp_dir().join(format!("catalog-seed-{}.json", std::process::id()));
    tokio::fs::write(&path, r#"[{"id": "Plank", "name": "Plank", "category": "stretching"}]"#)
      .await
      .unwrap();

    let report = seed_templates_from_file(&pool, &path).await.unwrap();
    assert_eq!(report.created, 1);

    tokio::fs::remove_file(&path).await.unwrap();
    let missing = seed_templates_from_file(&pool, &path).await;
    assert!(matches!(missing, Err(CatalogError::Read(_))));

    teardown_test_db(pool).await;
  }
}
