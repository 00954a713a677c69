use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contract::model::{
    Exercise, FormattedExercise, LogQuery, NewExercise, NewUser, User, UserLog, UserSummary,
};
use crate::domain::dates::canonical_date;

/// REST DTO for user representation: `{username, _id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub username: String,
    #[serde(rename = "_id")]
    pub id: Uuid,
}

/// Form body of `POST /api/users`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUserReq {
    pub username: Option<String>,
}

/// Form body of `POST /api/users/{id}/exercises`.
/// Everything is textual; coercion happens in the domain service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateExerciseReq {
    pub description: Option<String>,
    pub duration: Option<String>,
    pub date: Option<String>,
}

/// Response of an exercise append: the user plus the new exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseDto {
    pub username: String,
    pub description: String,
    pub duration: Option<i64>,
    pub date: String,
    #[serde(rename = "_id")]
    pub id: Uuid,
}

/// Query string of `GET /api/users/{id}/logs`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogQueryParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntryDto {
    pub description: String,
    pub duration: Option<i64>,
    pub date: String,
}

/// `{username, count, _id, log}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLogDto {
    pub username: String,
    pub count: usize,
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub log: Vec<LogEntryDto>,
}

/// Error payload shared by all endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}

// Conversion implementations between REST DTOs and contract models

impl From<UserSummary> for UserDto {
    fn from(user: UserSummary) -> Self {
        Self {
            username: user.username,
            id: user.id,
        }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            id: user.id,
        }
    }
}

impl From<CreateUserReq> for NewUser {
    fn from(req: CreateUserReq) -> Self {
        Self {
            username: req.username.unwrap_or_default(),
        }
    }
}

impl From<CreateExerciseReq> for NewExercise {
    fn from(req: CreateExerciseReq) -> Self {
        Self {
            description: req.description.unwrap_or_default(),
            duration: req.duration.unwrap_or_default(),
            date: req.date,
        }
    }
}

impl From<LogQueryParams> for LogQuery {
    fn from(params: LogQueryParams) -> Self {
        Self {
            from: params.from,
            to: params.to,
            limit: params.limit,
        }
    }
}

impl ExerciseDto {
    pub fn new(user: &User, exercise: Exercise) -> Self {
        Self {
            username: user.username.clone(),
            description: exercise.description,
            duration: exercise.duration,
            date: canonical_date(exercise.date),
            id: user.id,
        }
    }
}

impl From<FormattedExercise> for LogEntryDto {
    fn from(e: FormattedExercise) -> Self {
        Self {
            description: e.description,
            duration: e.duration,
            date: e.date,
        }
    }
}

impl From<UserLog> for UserLogDto {
    fn from(log: UserLog) -> Self {
        Self {
            count: log.count(),
            username: log.username,
            id: log.id,
            log: log.log.into_iter().map(LogEntryDto::from).collect(),
        }
    }
}
