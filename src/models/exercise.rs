use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::tracking::TrackingType;
use crate::validation;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Exercise {
  pub id: i64,
  #[serde(skip_serializing, default)]
  pub user_id: i64,
  pub template_id: Option<i64>,
  pub name: String,
  #[serde(skip_serializing, default)]
  pub name_normalized: String,
  pub muscle_group: String,
  pub equipment: String,
  pub category: String,
  pub tracking_type: String,
}

impl Exercise {
  pub fn tracking(&self) -> TrackingType {
    TrackingType::parse(&self.tracking_type)
  }
}

/// For inserting new exercises (without id)
#[derive(Debug, Clone)]
pub struct NewExercise {
  pub user_id: i64,
  pub template_id: Option<i64>,
  pub name: String,
  pub muscle_group: String,
  pub equipment: String,
  pub category: String,
  pub tracking_type: String,
}

impl NewExercise {
  pub fn name_normalized(&self) -> String {
    normalize_name(&self.name)
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseCreateRequest {
  pub name: String,
  pub muscle_group: String,
  pub equipment: String,
  pub category: String,
  pub tracking_type: String,
}

impl ExerciseCreateRequest {
  pub fn validate(&self) -> ApiResult<()> {
    validation::length("name", &self.name, 2, 200)?;
    validation::length("muscle_group", &self.muscle_group, 2, 50)?;
    validation::length("equipment", &self.equipment, 2, 50)?;
    validation::length("category", &self.category, 2, 50)?;
    validation::length("tracking_type", &self.tracking_type, 2, 30)
  }

  pub fn into_new(self, user_id: i64) -> NewExercise {
    NewExercise {
      user_id,
      template_id: None,
      name: self.name,
      muscle_group: self.muscle_group.to_lowercase(),
      equipment: self.equipment.to_lowercase(),
      category: self.category.to_lowercase(),
      tracking_type: self.tracking_type.to_lowercase(),
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExerciseUpdateRequest {
  pub name: Option<String>,
  pub muscle_group: Option<String>,
  pub equipment: Option<String>,
  pub category: Option<String>,
  pub tracking_type: Option<String>,
}

impl ExerciseUpdateRequest {
  pub fn validate(&self) -> ApiResult<()> {
    validation::optional_length("name", self.name.as_deref(), 2, 200)?;
    validation::optional_length("muscle_group", self.muscle_group.as_deref(), 2, 50)?;
    validation::optional_length("equipment", self.equipment.as_deref(), 2, 50)?;
    validation::optional_length("category", self.category.as_deref(), 2, 50)?;
    validation::optional_length("tracking_type", self.tracking_type.as_deref(), 2, 30)
  }

  /// Merge the provided fields into an existing exercise
  pub fn apply(self, exercise: &mut Exercise) {
    if let Some(name) = self.name {
      exercise.name_normalized = normalize_name(&name);
      exercise.name = name;
    }
    if let Some(v) = self.muscle_group {
      exercise.muscle_group = v.to_lowercase();
    }
    if let Some(v) = self.equipment {
      exercise.equipment = v.to_lowercase();
    }
    if let Some(v) = self.category {
      exercise.category = v.to_lowercase();
    }
    if let Some(v) = self.tracking_type {
      exercise.tracking_type = v.to_lowercase();
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseSearch {
  pub q: Option<String>,
  #[serde(default = "super::default_limit")]
  pub limit: i64,
  #[serde(default)]
  pub offset: i64,
}

/// Lower-case, trim, and collapse runs of whitespace to one space
pub fn normalize_name(name: &str) -> String {
  name
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}
