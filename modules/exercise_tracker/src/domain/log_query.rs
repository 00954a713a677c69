//! Log query engine: date-range filtering, head limit and formatting of a
//! user's exercise log. Insertion order is preserved; entries are never
//! re-sorted by date.

use chrono::{DateTime, Utc};

use crate::contract::model::{Exercise, FormattedExercise, LogQuery};
use crate::domain::dates::{canonical_date, normalize_at};

/// Bounds resolved from a [`LogQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogBounds {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl LogBounds {
    /// Resolve textual query values once. Blank values count as absent,
    /// unparseable dates fall back to `now` like any other date input.
    pub fn resolve(query: &LogQuery, now: DateTime<Utc>) -> Self {
        Self {
            from: non_blank(query.from.as_deref()).map(|raw| normalize_at(Some(raw), now).instant),
            to: non_blank(query.to.as_deref()).map(|raw| normalize_at(Some(raw), now).instant),
            limit: non_blank(query.limit.as_deref()).and_then(parse_limit),
        }
    }

    /// Whether the calendar day of `date` lies inside the inclusive
    /// `[from, to]` window. Bounds and entries compare by UTC day, the same
    /// granularity the canonical date is rendered at.
    pub fn admits(&self, date: DateTime<Utc>) -> bool {
        let day = date.date_naive();
        self.from.map_or(true, |from| day >= from.date_naive())
            && self.to.map_or(true, |to| day <= to.date_naive())
    }
}

/// A limit only counts when it is a non-negative integer.
pub fn parse_limit(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Run the query against `full_log` using the current time for fallbacks.
pub fn query_log(full_log: &[Exercise], query: &LogQuery) -> Vec<FormattedExercise> {
    query_log_at(full_log, query, Utc::now())
}

pub fn query_log_at(
    full_log: &[Exercise],
    query: &LogQuery,
    now: DateTime<Utc>,
) -> Vec<FormattedExercise> {
    apply_bounds(full_log, &LogBounds::resolve(query, now))
}

/// Filter, then truncate, then format.
pub fn apply_bounds(full_log: &[Exercise], bounds: &LogBounds) -> Vec<FormattedExercise> {
    full_log
        .iter()
        .filter(|e| bounds.admits(e.date))
        .take(bounds.limit.unwrap_or(usize::MAX))
        .map(format_exercise)
        .collect()
}

pub fn format_exercise(exercise: &Exercise) -> FormattedExercise {
    FormattedExercise {
        description: exercise.description.clone(),
        duration: exercise.duration,
        date: canonical_date(exercise.date),
    }
}
