//! Database Operations
//!
//! Every query that touches user-owned rows takes the owner's id and filters
//! on it, so a row belonging to someone else reads exactly like a missing one.

pub mod exercises;
pub mod plans;
pub mod templates;
pub mod users;
pub mod workouts;

/// True when a write tripped a UNIQUE constraint
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
  err
    .as_database_error()
    .map(|db| db.is_unique_violation())
    .unwrap_or(false)
}
