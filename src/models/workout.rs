use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::tracking::Measurements;
use crate::validation;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Workout {
  pub id: i64,
  #[serde(skip_serializing, default)]
  pub user_id: i64,
  pub started_at: DateTime<Utc>,
  pub ended_at: Option<DateTime<Utc>>,
  pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkoutSet {
  pub id: i64,
  #[serde(skip_serializing, default)]
  pub workout_id: i64,
  pub exercise_id: i64,
  pub set_number: i64,
  pub reps: Option<i64>,
  pub weight_kg: Option<f64>,
  pub duration_seconds: Option<i64>,
  pub distance_meters: Option<i64>,
}

impl WorkoutSet {
  pub fn measurements(&self) -> Measurements {
    Measurements {
      reps: self.reps,
      weight_kg: self.weight_kg,
      duration_seconds: self.duration_seconds,
      distance_meters: self.distance_meters,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutDetail {
  #[serde(flatten)]
  pub workout: Workout,
  pub sets: Vec<WorkoutSet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkoutCreateRequest {
  pub started_at: Option<DateTime<Utc>>,
  pub notes: Option<String>,
}

impl WorkoutCreateRequest {
  pub fn validate(&self) -> ApiResult<()> {
    validation::optional_length("notes", self.notes.as_deref(), 0, 500)
  }
}

/// Payload for adding a set to a workout
#[derive(Debug, Clone, Deserialize)]
pub struct SetCreateRequest {
  pub exercise_id: i64,
  pub set_number: i64,
  pub reps: Option<i64>,
  pub weight_kg: Option<f64>,
  pub duration_seconds: Option<i64>,
  pub distance_meters: Option<i64>,
}

impl SetCreateRequest {
  pub fn validate(&self) -> ApiResult<()> {
    validation::at_least("set_number", Some(self.set_number), 1)?;
    validate_measurements(&self.measurements())
  }

  pub fn measurements(&self) -> Measurements {
    Measurements {
      reps: self.reps,
      weight_kg: self.weight_kg,
      duration_seconds: self.duration_seconds,
      distance_meters: self.distance_meters,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetUpdateRequest {
  pub set_number: Option<i64>,
  pub reps: Option<i64>,
  pub weight_kg: Option<f64>,
  pub duration_seconds: Option<i64>,
  pub distance_meters: Option<i64>,
}

impl SetUpdateRequest {
  pub fn validate(&self) -> ApiResult<()> {
    validation::at_least("set_number", self.set_number, 1)?;
    validate_measurements(&Measurements {
      reps: self.reps,
      weight_kg: self.weight_kg,
      duration_seconds: self.duration_seconds,
      distance_meters: self.distance_meters,
    })
  }

  /// Merge provided fields; absent fields keep their stored value
  pub fn apply(self, set: &mut WorkoutSet) {
    if let Some(v) = self.set_number {
      set.set_number = v;
    }
    if self.reps.is_some() {
      set.reps = self.reps;
    }
    if self.weight_kg.is_some() {
      set.weight_kg = self.weight_kg;
    }
    if self.duration_seconds.is_some() {
      set.duration_seconds = self.duration_seconds;
    }
    if self.distance_meters.is_some() {
      set.distance_meters = self.distance_meters;
    }
  }
}

fn validate_measurements(m: &Measurements) -> ApiResult<()> {
  validation::at_least("reps", m.reps, 1)?;
  validation::non_negative("weight_kg", m.weight_kg)?;
  validation::at_least("duration_seconds", m.duration_seconds, 1)?;
  validation::at_least("distance_meters", m.distance_meters, 1)
}
