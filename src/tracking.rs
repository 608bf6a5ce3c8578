//! Tracking-type policy
//!
//! An exercise's tracking type decides which measurement fields a set must
//! carry and how a set collapses into one comparable performance value.

use std::fmt;

/// ---------------------------------------------------------------------------
/// Tracking Type
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingType {
  /// Load lifted for a number of repetitions
  WeightReps,
  /// Time under effort (planks, rowing intervals)
  Time,
  /// Distance covered (runs, rides)
  Distance,
  /// Any tag we don't recognise. Never fails, never qualifies.
  Unknown,
}

impl TrackingType {
  /// Parse a stored tag. Only the exact lower-case tags are known; anything
  /// else, padded or differently cased, falls back to `Unknown`.
  pub fn parse(tag: &str) -> Self {
    match tag {
      "weight_reps" => Self::WeightReps,
      "time" => Self::Time,
      "distance" => Self::Distance,
      _ => Self::Unknown,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::WeightReps => "weight_reps",
      Self::Time => "time",
      Self::Distance => "distance",
      Self::Unknown => "unknown",
    }
  }

  /// Single scalar for a set, or `None` if the set is missing a required field.
  ///
  /// `weight_reps` scores as `weight_kg * reps` (volume of the set).
  pub fn performance_value(&self, m: &Measurements) -> Option<f64> {
    match self {
      Self::WeightReps => match (m.weight_kg, m.reps) {
        (Some(weight), Some(reps)) => Some(weight * reps as f64),
        _ => None,
      },
      Self::Time => m.duration_seconds.map(|s| s as f64),
      Self::Distance => m.distance_meters.map(|d| d as f64),
      Self::Unknown => None,
    }
  }

  pub fn qualifies(&self, m: &Measurements) -> bool {
    self.performance_value(m).is_some()
  }

  /// Check a set about to be written carries the fields this type needs.
  /// Unknown types accept anything.
  pub fn check_required(&self, m: &Measurements) -> Result<(), String> {
    match self {
      Self::WeightReps if m.reps.is_none() || m.weight_kg.is_none() => {
        Err("weight_reps requires reps and weight_kg".to_string())
      }
      Self::Time if m.duration_seconds.is_none() => {
        Err("time requires duration_seconds".to_string())
      }
      Self::Distance if m.distance_meters.is_none() => {
        Err("distance requires distance_meters".to_string())
      }
      _ => Ok(()),
    }
  }
}

impl fmt::Display for TrackingType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// ---------------------------------------------------------------------------
/// Measurements
/// ---------------------------------------------------------------------------

/// The four optional measurement fields of a set
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Measurements {
  pub reps: Option<i64>,
  pub weight_kg: Option<f64>,
  pub duration_seconds: Option<i64>,
  pub distance_meters: Option<i64>,
}
