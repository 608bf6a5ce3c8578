pub mod user;
pub mod exercise;
pub mod template;
pub mod workout;
pub mod plan;

pub use exercise::Exercise;
pub use plan::{PlanItem, WorkoutPlan};
pub use template::{ExerciseTemplate, ExerciseTemplateSummary};
pub use user::User;
pub use workout::{Workout, WorkoutSet};

use serde::Deserialize;

/// Pagination shared by list endpoints
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Page {
  #[serde(default = "default_limit")]
  pub limit: i64,
  #[serde(default)]
  pub offset: i64,
}

pub(crate) fn default_limit() -> i64 {
  50
}
