//src/filter.rs
use crate::models::Workout;

/// Type filter value meaning "no activity restriction".
pub const ALL_TYPES: &str = "all";

/// Applies the list view's filter/search pipeline and returns the
/// surviving workouts newest first.
///
/// 1. Exact activity match, unless `type_filter` is `"all"`.
/// 2. Case-insensitive substring match of the trimmed `search_term`
///    against the activity or the notes (when present). An empty or
///    whitespace-only term matches everything.
/// 3. Stable sort by date descending, so equal timestamps keep input
///    order and identical inputs always yield identical output.
pub fn apply(workouts: &[Workout], type_filter: &str, search_term: &str) -> Vec<Workout> {
    let term = search_term.trim().to_lowercase();

    let mut result: Vec<Workout> = workouts
        .iter()
        .filter(|w| type_filter == ALL_TYPES || w.activity == type_filter)
        .filter(|w| {
            if term.is_empty() {
                return true;
            }
            w.activity.to_lowercase().contains(&term)
                || w.notes
                    .as_ref()
                    .is_some_and(|n| n.to_lowercase().contains(&term))
        })
        .cloned()
        .collect();

    result.sort_by(|a, b| b.date.cmp(&a.date)); // stable
    result
}

/// Distinct activity names in first-seen order, for populating the type
/// filter control.
pub fn distinct_types(workouts: &[Workout]) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    for workout in workouts {
        if !types.iter().any(|t| t == &workout.activity) {
            types.push(workout.activity.clone());
        }
    }
    types
}
