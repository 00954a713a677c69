use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Pure user model for inter-module communication (no serde)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
    /// Exercises in insertion order.
    pub log: Vec<Exercise>,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// User without its log, as returned by listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
}

/// A single logged exercise.
///
/// `duration` is `None` when the submitted value was not a number; the
/// sentinel is preserved through storage and rendered as `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub description: String,
    pub duration: Option<i64>,
    pub date: DateTime<Utc>,
}

/// Data for creating a new user
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewUser {
    pub username: String,
}

/// Raw exercise input; coercion and date normalization happen in the service
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewExercise {
    pub description: String,
    pub duration: String,
    pub date: Option<String>,
}

/// Optional log filters exactly as submitted by the caller.
///
/// Values stay textual: bounds go through the date normalizer and a limit
/// that is not a non-negative integer is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

/// Exercise rendered for log output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedExercise {
    pub description: String,
    pub duration: Option<i64>,
    /// Canonical calendar-day string, e.g. `Sun Jan 01 2023`
    pub date: String,
}

/// Filtered log of a single user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserLog {
    pub id: Uuid,
    pub username: String,
    pub log: Vec<FormattedExercise>,
}

impl UserLog {
    pub fn count(&self) -> usize {
        self.log.len()
    }
}
