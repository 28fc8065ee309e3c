//src/analytics.rs
use chrono::{DateTime, TimeZone};
use std::collections::HashMap;

use crate::models::Workout;

/// Aggregates for the dashboard cards. Derived on demand from a workout
/// collection plus a reference instant; never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DailyStats {
    pub total_workouts: usize,
    pub total_duration_minutes: u64,
    pub total_calories: u64,
    pub average_calories: u64,
    /// Counted over the FULL collection, not just the reference day.
    /// The cards intentionally cross-reference two time windows.
    pub workouts_by_type: HashMap<String, usize>,
}

/// One label/value pair of a chart series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Computes dashboard statistics for the calendar day of `reference`.
///
/// Day membership is decided in `reference`'s timezone: a workout counts
/// when its timestamp, converted to that zone and truncated to a calendar
/// day, equals the reference day. `average_calories` is the rounded mean
/// over the day's workouts, 0 when the day is empty.
pub fn compute_daily_stats<Tz: TimeZone>(workouts: &[Workout], reference: &DateTime<Tz>) -> DailyStats {
    let reference_day = reference.date_naive();
    let zone = reference.timezone();

    let mut total_workouts = 0usize;
    let mut total_duration_minutes = 0u64;
    let mut total_calories = 0u64;
    for workout in workouts {
        if workout.date.with_timezone(&zone).date_naive() == reference_day {
            total_workouts += 1;
            total_duration_minutes += u64::from(workout.duration_minutes);
            total_calories += u64::from(workout.calories);
        }
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    let average_calories = if total_workouts > 0 {
        (total_calories as f64 / total_workouts as f64).round() as u64
    } else {
        0
    };

    let mut workouts_by_type: HashMap<String, usize> = HashMap::new();
    for workout in workouts {
        *workouts_by_type.entry(workout.activity.clone()).or_insert(0) += 1;
    }

    DailyStats {
        total_workouts,
        total_duration_minutes,
        total_calories,
        average_calories,
        workouts_by_type,
    }
}

/// Builds the bounded recent-calories series: the `n` most recent
/// workouts in ascending chronological order, labeled with
/// `label_format` (a chrono format string, e.g. `"%d"`).
///
/// The descending sort is stable, so workouts sharing a timestamp keep
/// their input order across repeated calls.
pub fn compute_recent_series(workouts: &[Workout], n: usize, label_format: &str) -> Vec<ChartPoint> {
    let mut recent: Vec<&Workout> = workouts.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date)); // stable
    recent.truncate(n);
    recent.reverse();

    recent
        .into_iter()
        .map(|w| ChartPoint {
            label: w.date.format(label_format).to_string(),
            value: f64::from(w.calories),
        })
        .collect()
}

/// Builds the activity-distribution series: one point per distinct
/// activity in first-seen order. The values always sum to the input
/// length.
pub fn compute_type_distribution(workouts: &[Workout]) -> Vec<ChartPoint> {
    let mut index_by_activity: HashMap<&str, usize> = HashMap::new();
    let mut points: Vec<ChartPoint> = Vec::new();
    for workout in workouts {
        match index_by_activity.get(workout.activity.as_str()) {
            Some(&i) => points[i].value += 1.0,
            None => {
                index_by_activity.insert(workout.activity.as_str(), points.len());
                points.push(ChartPoint {
                    label: workout.activity.clone(),
                    value: 1.0,
                });
            }
        }
    }
    points
}
