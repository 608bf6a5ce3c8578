use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{ApiError, ApiResult};
use crate::validation;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkoutPlan {
  pub id: i64,
  #[serde(skip_serializing, default)]
  pub user_id: i64,
  pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlanItem {
  pub id: i64,
  #[serde(skip_serializing, default)]
  pub plan_id: i64,
  pub exercise_id: i64,
  pub position: i64,
  pub target_sets: Option<i64>,
  pub target_reps: Option<i64>,
  pub target_weight_kg: Option<f64>,
  pub target_duration_seconds: Option<i64>,
  pub target_distance_meters: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDetail {
  #[serde(flatten)]
  pub plan: WorkoutPlan,
  pub items: Vec<PlanItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanCreateRequest {
  pub name: String,
}

impl PlanCreateRequest {
  pub fn validate(&self) -> ApiResult<()> {
    validation::length("name", &self.name, 2, 120)
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanItemCreateRequest {
  pub exercise_id: i64,
  pub position: i64,
  pub target_sets: Option<i64>,
  pub target_reps: Option<i64>,
  pub target_weight_kg: Option<f64>,
  pub target_duration_seconds: Option<i64>,
  pub target_distance_meters: Option<i64>,
}

impl PlanItemCreateRequest {
  pub fn validate(&self) -> ApiResult<()> {
    validation::at_least("position", Some(self.position), 1)?;
    validate_targets(
      self.target_sets,
      self.target_reps,
      self.target_weight_kg,
      self.target_duration_seconds,
      self.target_distance_meters,
    )
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanItemUpdateRequest {
  pub position: Option<i64>,
  pub target_sets: Option<i64>,
  pub target_reps: Option<i64>,
  pub target_weight_kg: Option<f64>,
  pub target_duration_seconds: Option<i64>,
  pub target_distance_meters: Option<i64>,
}

impl PlanItemUpdateRequest {
  pub fn validate(&self) -> ApiResult<()> {
    validation::at_least("position", self.position, 1)?;
    validate_targets(
      self.target_sets,
      self.target_reps,
      self.target_weight_kg,
      self.target_duration_seconds,
      self.target_distance_meters,
    )
  }

  pub fn apply(self, item: &mut PlanItem) {
    if let Some(v) = self.position {
      item.position = v;
    }
    if self.target_sets.is_some() {
      item.target_sets = self.target_sets;
    }
    if self.target_reps.is_some() {
      item.target_reps = self.target_reps;
    }
    if self.target_weight_kg.is_some() {
      item.target_weight_kg = self.target_weight_kg;
    }
    if self.target_duration_seconds.is_some() {
      item.target_duration_seconds = self.target_duration_seconds;
    }
    if self.target_distance_meters.is_some() {
      item.target_distance_meters = self.target_distance_meters;
    }
  }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PlanReorderItem {
  pub item_id: i64,
  pub position: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanReorderRequest {
  pub items: Vec<PlanReorderItem>,
}

impl PlanReorderRequest {
  pub fn validate(&self) -> ApiResult<()> {
    if self.items.is_empty() {
      return Err(ApiError::Validation("items must not be empty".to_string()));
    }

    let mut seen = HashSet::new();
    for item in &self.items {
      validation::at_least("position", Some(item.position), 1)?;
      if !seen.insert(item.item_id) {
        return Err(ApiError::Validation(format!(
          "item {} listed more than once",
          item.item_id
        )));
      }
    }

    Ok(())
  }
}

fn validate_targets(
  sets: Option<i64>,
  reps: Option<i64>,
  weight_kg: Option<f64>,
  duration_seconds: Option<i64>,
  distance_meters: Option<i64>,
) -> ApiResult<()> {
  validation::at_least("target_sets", sets, 1)?;
  validation::at_least("target_reps", reps, 1)?;
  validation::non_negative("target_weight_kg", weight_kg)?;
  validation::at_least("target_duration_seconds", duration_seconds, 1)?;
  validation::at_least("target_distance_meters", distance_meters, 1)
}
