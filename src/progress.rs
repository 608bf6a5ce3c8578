//! Progress Reports
//!
//! Read-only reductions over rows that the caller has already scoped to one
//! owner:
//! - personal record per exercise (best single set for its tracking type)
//! - history: one best value per workout, oldest first
//! - weekly overview: counts and most-trained exercises since Monday
//!
//! Nothing in here touches the database. Handlers fetch, these compute.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{Exercise, Workout, WorkoutSet};
use crate::tracking::TrackingType;

/// Length cap for the weekly top-exercise list
pub const TOP_EXERCISES_LIMIT: usize = 5;

/// Shown when a ranked exercise id has no resolvable name
pub const UNKNOWN_EXERCISE_NAME: &str = "Unknown";

/// ---------------------------------------------------------------------------
/// Personal Records
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
    pub exercise_id: i64,
    pub exercise_name: String,
    pub tracking_type: String,
    pub best_weight_kg: Option<f64>,
    pub best_reps: Option<i64>,
    pub best_duration_seconds: Option<i64>,
    pub best_distance_meters: Option<i64>,
}

impl PersonalRecord {
    /// Record with identity only, every best-value field empty
    fn identity(exercise: &Exercise) -> Self {
        Self {
            exercise_id: exercise.id,
            exercise_name: exercise.name.clone(),
            tracking_type: exercise.tracking_type.clone(),
            best_weight_kg: None,
            best_reps: None,
            best_duration_seconds: None,
            best_distance_meters: None,
        }
    }

    /// Compute the personal record for one exercise from its sets.
    ///
    /// `weight_reps` ranks by heaviest weight alone; the reps reported are
    /// whatever the heaviest set carried. Strictly-greater comparison, so the
    /// first set in input order wins ties.
    pub fn compute<'a>(
        exercise: &Exercise,
        sets: impl IntoIterator<Item = &'a WorkoutSet>,
    ) -> Self {
        let sets: Vec<&WorkoutSet> = sets.into_iter().collect();
        let mut record = Self::identity(exercise);

        if sets.is_empty() {
            return record;
        }

        match exercise.tracking() {
            TrackingType::WeightReps => {
                let mut best: Option<(f64, Option<i64>)> = None;
                for set in &sets {
                    let Some(weight) = set.weight_kg else {
                        continue;
                    };
                    if best.map_or(true, |(best_weight, _)| weight > best_weight) {
                        best = Some((weight, set.reps));
                    }
                }
                record.best_weight_kg = best.map(|(weight, _)| weight);
                record.best_reps = best.and_then(|(_, reps)| reps);
            }
            TrackingType::Time => {
                record.best_duration_seconds =
                    positive_max(sets.iter().map(|s| s.duration_seconds));
            }
            TrackingType::Distance => {
                record.best_distance_meters =
                    positive_max(sets.iter().map(|s| s.distance_meters));
            }
            TrackingType::Unknown => {}
        }

        record
    }
}

/// Max of the values with missing treated as 0; a max of 0 means no record
fn positive_max(values: impl Iterator<Item = Option<i64>>) -> Option<i64> {
    let max = values.map(|v| v.unwrap_or(0)).max().unwrap_or(0);
    (max > 0).then_some(max)
}

/// One record per exercise, in the order the exercises are given.
/// Sets are matched to exercises by `exercise_id`, keeping input order.
pub fn personal_records(exercises: &[Exercise], sets: &[WorkoutSet]) -> Vec<PersonalRecord> {
    let mut by_exercise: HashMap<i64, Vec<&WorkoutSet>> = HashMap::new();
    for set in sets {
        by_exercise.entry(set.exercise_id).or_default().push(set);
    }

    exercises
        .iter()
        .map(|exercise| {
            let sets = by_exercise.get(&exercise.id).map(Vec::as_slice).unwrap_or(&[]);
            PersonalRecord::compute(exercise, sets.iter().copied())
        })
        .collect()
}

/// ---------------------------------------------------------------------------
/// History
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseHistory {
    pub exercise_id: i64,
    pub exercise_name: String,
    pub tracking_type: String,
    pub points: Vec<ProgressPoint>,
}

impl ExerciseHistory {
    pub fn compute(exercise: &Exercise, sets: &[WorkoutSet], workouts: &[Workout]) -> Self {
        let own_sets: Vec<WorkoutSet> = sets
            .iter()
            .filter(|s| s.exercise_id == exercise.id)
            .cloned()
            .collect();

        Self {
            exercise_id: exercise.id,
            exercise_name: exercise.name.clone(),
            tracking_type: exercise.tracking_type.clone(),
            points: history_points(exercise.tracking(), &own_sets, workouts),
        }
    }
}

/// Reduce one exercise's sets to the best value per workout.
///
/// Only sets whose workout appears in `workouts` count, so passing the
/// caller's own workouts scopes the result to that owner. Output is sorted
/// by `started_at`, ties by workout id, and does not depend on input order.
pub fn history_points(
    tracking: TrackingType,
    sets: &[WorkoutSet],
    workouts: &[Workout],
) -> Vec<ProgressPoint> {
    let started: HashMap<i64, DateTime<Utc>> =
        workouts.iter().map(|w| (w.id, w.started_at)).collect();

    // workout_id -> (started_at, best value)
    let mut best_by_workout: BTreeMap<i64, (DateTime<Utc>, f64)> = BTreeMap::new();

    for set in sets {
        let Some(&started_at) = started.get(&set.workout_id) else {
            continue;
        };
        let Some(value) = tracking.performance_value(&set.measurements()) else {
            continue;
        };

        best_by_workout
            .entry(set.workout_id)
            .and_modify(|best| {
                if value > best.1 {
                    best.1 = value;
                }
            })
            .or_insert((started_at, value));
    }

    let mut points: Vec<ProgressPoint> = best_by_workout
        .into_values()
        .map(|(timestamp, value)| ProgressPoint { timestamp, value })
        .collect();

    // Stable sort keeps workout id order for equal timestamps
    points.sort_by_key(|p| p.timestamp);
    points
}

/// ---------------------------------------------------------------------------
/// Weekly Overview
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopExercise {
    pub exercise_id: i64,
    pub exercise_name: String,
    pub sets_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyOverview {
    pub workouts_this_week: i64,
    pub sets_this_week: i64,
    pub top_exercises_this_week: Vec<TopExercise>,
}

/// Monday 00:00:00 UTC of the week containing `now`
pub fn start_of_week(now: DateTime<Utc>) -> DateTime<Utc> {
    let days_since_monday = i64::from(now.weekday().num_days_from_monday());
    (now.date_naive() - Duration::days(days_since_monday))
        .and_time(NaiveTime::MIN)
        .and_utc()
}

impl WeeklyOverview {
    /// Summarise workouts started in `[start_of_week(now), now]`.
    ///
    /// Top exercises rank by set count descending, then exercise id
    /// ascending. Ids missing from `exercise_names` show as "Unknown".
    pub fn compute(
        now: DateTime<Utc>,
        workouts: &[Workout],
        sets: &[WorkoutSet],
        exercise_names: &HashMap<i64, String>,
    ) -> Self {
        let week_start = start_of_week(now);

        let in_window: HashSet<i64> = workouts
            .iter()
            .filter(|w| w.started_at >= week_start && w.started_at <= now)
            .map(|w| w.id)
            .collect();

        let mut counts: BTreeMap<i64, i64> = BTreeMap::new();
        let mut sets_this_week = 0;

        for set in sets.iter().filter(|s| in_window.contains(&s.workout_id)) {
            sets_this_week += 1;
            *counts.entry(set.exercise_id).or_default() += 1;
        }

        let mut ranked: Vec<(i64, i64)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(TOP_EXERCISES_LIMIT);

        let top_exercises_this_week = ranked
            .into_iter()
            .map(|(exercise_id, sets_count)| TopExercise {
                exercise_id,
                exercise_name: exercise_names
                    .get(&exercise_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_EXERCISE_NAME.to_string()),
                sets_count,
            })
            .collect();

        Self {
            workouts_this_week: in_window.len() as i64,
            sets_this_week,
            top_exercises_this_week,
        }
    }
}
