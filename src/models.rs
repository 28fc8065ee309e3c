//src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::EnumIter;

use crate::repository::RepoError;

/// A registered account as the auth service reports it.
///
/// The session keeps a read-mostly copy; it is only ever replaced
/// wholesale after an explicit profile update, never field-poked.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile_picture: Option<String>,
}

/// One logged exercise session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: String,
    pub user_id: String,
    /// Free-form activity name ("Running", "Yoga", ...). Not restricted
    /// to the quick-add known list.
    pub activity: String,
    pub duration_minutes: u32,
    pub calories: u32,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Create/update payload: a `Workout` minus `id` and `user_id`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkoutDraft {
    pub activity: String,
    pub duration_minutes: u32,
    pub calories: u32,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Partial profile update. `profile_picture` is doubly optional so a
/// patch can distinguish "leave as is" from "clear the picture".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub profile_picture: Option<Option<String>>,
}

/// Parses an ISO-8601 timestamp from caller input.
///
/// Malformed input is rejected up front as a `Validation` failure; the
/// core never coerces an unparseable date into a record.
///
/// # Errors
/// Returns `RepoError::Validation` if the text is not a valid RFC 3339
/// timestamp.
pub fn parse_workout_date(raw: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepoError::Validation(format!("invalid workout date '{raw}': {e}")))
}

/// The fixed list of activity names the quick-add parser recognizes.
/// Declaration order is match-priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum KnownActivity {
    Running,
    Walking,
    Cycling,
    Swimming,
    Weightlifting,
    Hiit,
    Yoga,
    Pilates,
    CrossFit,
    Hiking,
    Dancing,
}

impl fmt::Display for KnownActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Running => "Running",
            Self::Walking => "Walking",
            Self::Cycling => "Cycling",
            Self::Swimming => "Swimming",
            Self::Weightlifting => "Weightlifting",
            Self::Hiit => "HIIT",
            Self::Yoga => "Yoga",
            Self::Pilates => "Pilates",
            Self::CrossFit => "CrossFit",
            Self::Hiking => "Hiking",
            Self::Dancing => "Dancing",
        };
        write!(f, "{name}")
    }
}
