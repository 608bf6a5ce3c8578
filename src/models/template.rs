use serde::{Deserialize, Serialize};

/// Catalog listing row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExerciseTemplateSummary {
  pub id: i64,
  pub source_id: String,
  pub slug: String,
  pub name: String,
  pub category: String,
  pub equipment: String,
  pub tracking_type: String,
}

/// Full catalog row. Muscle and instruction lists are stored as JSON text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExerciseTemplate {
  pub id: i64,
  pub source_id: String,
  pub slug: String,
  pub name: String,
  pub description: Option<String>,
  pub image_url: Option<String>,
  pub category: String,
  pub equipment: String,
  pub tracking_type: String,
  pub force: Option<String>,
  pub level: Option<String>,
  pub mechanic: Option<String>,
  pub primary_muscles_json: String,
  pub secondary_muscles_json: String,
  pub instructions_json: String,
}

impl ExerciseTemplate {
  pub fn primary_muscles(&self) -> Vec<String> {
    parse_list(&self.primary_muscles_json)
  }

  pub fn into_detail(self) -> ExerciseTemplateDetail {
    ExerciseTemplateDetail {
      primary_muscles: parse_list(&self.primary_muscles_json),
      secondary_muscles: parse_list(&self.secondary_muscles_json),
      instructions: parse_list(&self.instructions_json),
      id: self.id,
      source_id: self.source_id,
      slug: self.slug,
      name: self.name,
      description: self.description,
      image_url: self.image_url,
      category: self.category,
      equipment: self.equipment,
      tracking_type: self.tracking_type,
      force: self.force,
      level: self.level,
      mechanic: self.mechanic,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseTemplateDetail {
  pub id: i64,
  pub source_id: String,
  pub slug: String,
  pub name: String,
  pub description: Option<String>,
  pub image_url: Option<String>,
  pub category: String,
  pub equipment: String,
  pub tracking_type: String,
  pub force: Option<String>,
  pub level: Option<String>,
  pub mechanic: Option<String>,
  pub primary_muscles: Vec<String>,
  pub secondary_muscles: Vec<String>,
  pub instructions: Vec<String>,
}

/// For inserting catalog entries (without id)
#[derive(Debug, Clone)]
pub struct NewExerciseTemplate {
  pub source_id: String,
  pub slug: String,
  pub name: String,
  pub category: String,
  pub equipment: String,
  pub tracking_type: String,
  pub force: Option<String>,
  pub level: Option<String>,
  pub mechanic: Option<String>,
  pub primary_muscles: Vec<String>,
  pub secondary_muscles: Vec<String>,
  pub instructions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateSearch {
  pub q: Option<String>,
  pub category: Option<String>,
  pub equipment: Option<String>,
  pub tracking_type: Option<String>,
  pub muscle: Option<String>,
  #[serde(default = "super::default_limit")]
  pub limit: i64,
  #[serde(default)]
  pub offset: i64,
}

impl Default for TemplateSearch {
  fn default() -> Self {
    Self {
      q: None,
      category: None,
      equipment: None,
      tracking_type: None,
      muscle: None,
      limit: super::default_limit(),
      offset: 0,
    }
  }
}

fn parse_list(json: &str) -> Vec<String> {
  serde_json::from_str(json).unwrap_or_default()
}
