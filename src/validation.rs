//! Field-level checks for request payloads.
//!
//! Every failure is an `ApiError::Validation` (422) naming the offending field.

use crate::error::{ApiError, ApiResult};

/// Check a string's length (in characters) lies within `[min, max]`
pub fn length(field: &str, value: &str, min: usize, max: usize) -> ApiResult<()> {
  let len = value.chars().count();
  if len < min || len > max {
    return Err(ApiError::Validation(format!(
      "{} must be between {} and {} characters",
      field, min, max
    )));
  }
  Ok(())
}

pub fn optional_length(field: &str, value: Option<&str>, min: usize, max: usize) -> ApiResult<()> {
  match value {
    Some(v) => length(field, v, min, max),
    None => Ok(()),
  }
}

/// Check an optional integer is at least `min`
pub fn at_least(field: &str, value: Option<i64>, min: i64) -> ApiResult<()> {
  match value {
    Some(v) if v < min => Err(ApiError::Validation(format!(
      "{} must be greater than or equal to {}",
      field, min
    ))),
    _ => Ok(()),
  }
}

/// Check an optional decimal is finite and not negative
pub fn non_negative(field: &str, value: Option<f64>) -> ApiResult<()> {
  match value {
    Some(v) if !v.is_finite() || v < 0.0 => Err(ApiError::Validation(format!(
      "{} must be a non-negative number",
      field
    ))),
    _ => Ok(()),
  }
}

/// Page bounds shared by list endpoints: limit 1..=200, offset >= 0
pub fn page(limit: i64, offset: i64) -> ApiResult<()> {
  if !(1..=200).contains(&limit) {
    return Err(ApiError::Validation(
      "limit must be between 1 and 200".to_string(),
    ));
  }
  at_least("offset", Some(offset), 0)
}

/// Minimal structural email check: one `@`, non-empty local part, dotted domain
pub fn email(value: &str) -> ApiResult<()> {
  let invalid = || ApiError::Validation("email is not a valid email address".to_string());

  let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
  if local.is_empty()
    || domain.contains('@')
    || value.chars().any(char::is_whitespace)
    || value.len() > 254
  {
    return Err(invalid());
  }

  let labels: Vec<&str> = domain.split('.').collect();
  if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
    return Err(invalid());
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_length_bounds_are_inclusive() {
    assert!(length("name", "ab", 2, 4).is_ok());
    assert!(length("name", "abcd", 2, 4).is_ok());
    assert!(length("name", "a", 2, 4).is_err());
    assert!(length("name", "abcde", 2, 4).is_err());
  }

  #[test]
  fn test_length_counts_characters_not_bytes() {
    assert!(length("name", "Übung", 2, 5).is_ok());
  }

  #[test]
  fn test_at_least_ignores_missing_values() {
    assert!(at_least("reps", None, 1).is_ok());
    assert!(at_least("reps", Some(1), 1).is_ok());
    let err = at_least("reps", Some(0), 1).unwrap_err();
    assert!(err.to_string().contains("reps"));
  }

  #[test]
  fn test_non_negative_rejects_nan_and_negatives() {
    assert!(non_negative("weight_kg", Some(0.0)).is_ok());
    assert!(non_negative("weight_kg", Some(-0.5)).is_err());
    assert!(non_negative("weight_kg", Some(f64::NAN)).is_err());
  }

  #[test]
  fn test_page_bounds() {
    assert!(page(50, 0).is_ok());
    assert!(page(0, 0).is_err());
    assert!(page(201, 0).is_err());
    assert!(page(10, -1).is_err());
  }

  #[test]
  fn test_email_shapes() {
    assert!(email("lifter@example.com").is_ok());
    assert!(email("a.b+c@sub.example.org").is_ok());
    assert!(email("no-at-sign").is_err());
    assert!(email("@example.com").is_err());
    assert!(email("user@localhost").is_err());
    assert!(email("user@exa mple.com").is_err());
    assert!(email("user@@example.com").is_err());
    assert!(email("user@example..com").is_err());
  }
}
