use std::sync::Arc;

use crate::contract::model::{
    Exercise, LogQuery, NewExercise, NewUser, User, UserLog, UserSummary,
};
use crate::domain::dates;
use crate::domain::error::DomainError;
use crate::domain::log_query;
use crate::domain::repo::UsersRepository;
use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Domain service with business rules for users and their exercise logs.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_username_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_username_length: 100,
        }
    }
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(repo: Arc<dyn UsersRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    #[instrument(
        name = "exercise_tracker.service.create_user",
        skip(self),
        fields(username = %new_user.username)
    )]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Creating new user");

        let username = self.validate_username(&new_user.username)?;
        let user = User {
            id: Uuid::new_v4(),
            username,
            created_at: Utc::now(),
            log: Vec::new(),
        };

        self.repo
            .insert(user.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Successfully created user with id={}", user.id);
        Ok(user)
    }

    #[instrument(name = "exercise_tracker.service.list_users", skip(self))]
    pub async fn list_users(&self) -> Result<Vec<UserSummary>, DomainError> {
        debug!("Listing users");

        let users = self
            .repo
            .list()
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        debug!("Successfully listed {} users", users.len());
        Ok(users)
    }

    #[instrument(name = "exercise_tracker.service.get_user", skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        debug!("Getting user by id");

        let user = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::user_not_found(id.to_string()))?;
        debug!("Successfully retrieved user");
        Ok(user)
    }

    #[instrument(
        name = "exercise_tracker.service.add_exercise",
        skip(self, new_exercise),
        fields(user_id = %user_id)
    )]
    pub async fn add_exercise(
        &self,
        user_id: Uuid,
        new_exercise: NewExercise,
    ) -> Result<(User, Exercise), DomainError> {
        info!("Adding exercise");

        let exercise = self.build_exercise(new_exercise)?;

        let user = self
            .repo
            .append_exercise(user_id, exercise.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::user_not_found(user_id.to_string()))?;

        info!(log_len = user.log.len(), "Successfully added exercise");
        Ok((user, exercise))
    }

    #[instrument(
        name = "exercise_tracker.service.user_log",
        skip(self, query),
        fields(user_id = %user_id)
    )]
    pub async fn user_log(&self, user_id: Uuid, query: &LogQuery) -> Result<UserLog, DomainError> {
        debug!(?query, "Querying user log");

        let user = self.get_user(user_id).await?;
        let log = log_query::query_log(&user.log, query);

        debug!("Returning {} of {} log entries", log.len(), user.log.len());
        Ok(UserLog {
            id: user.id,
            username: user.username,
            log,
        })
    }

    // --- validation helpers ---

    fn validate_username(&self, username: &str) -> Result<String, DomainError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(DomainError::validation("username", "is required"));
        }
        if username.chars().count() > self.config.max_username_length {
            return Err(DomainError::validation(
                "username",
                format!(
                    "must be at most {} characters",
                    self.config.max_username_length
                ),
            ));
        }
        Ok(username.to_string())
    }

    fn build_exercise(&self, new_exercise: NewExercise) -> Result<Exercise, DomainError> {
        if new_exercise.description.trim().is_empty() {
            return Err(DomainError::validation("description", "is required"));
        }
        if new_exercise.duration.trim().is_empty() {
            return Err(DomainError::validation("duration", "is required"));
        }

        let date = dates::normalize(new_exercise.date.as_deref());
        Ok(Exercise {
            description: new_exercise.description,
            duration: coerce_duration(&new_exercise.duration),
            date: dates::start_of_day(date.instant),
        })
    }
}

/// Numeric coercion for submitted durations.
///
/// Integers are taken as-is, other finite numbers are truncated toward zero,
/// anything else becomes the `None` not-a-number sentinel.
pub fn coerce_duration(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(minutes) = raw.parse::<i64>() {
        return Some(minutes);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() < i64::MAX as f64)
        .map(|v| v.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_coercion() {
        assert_eq!(coerce_duration("30"), Some(30));
        assert_eq!(coerce_duration(" 45 "), Some(45));
        assert_eq!(coerce_duration("-5"), Some(-5));
        assert_eq!(coerce_duration("12.9"), Some(12));
        assert_eq!(coerce_duration("1e2"), Some(100));
        assert_eq!(coerce_duration("abc"), None);
        assert_eq!(coerce_duration("NaN"), None);
        assert_eq!(coerce_duration("inf"), None);
    }
}
