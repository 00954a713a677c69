use std::sync::Arc;

use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Path, Query,
    },
    http::{StatusCode, Uri},
    response::Json,
    Extension, Form,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::rest::dto::{
    CreateExerciseReq, CreateUserReq, ExerciseDto, LogQueryParams, UserDto, UserLogDto,
};
use crate::api::rest::error::{map_domain_error, ErrorResponse};
use crate::domain::error::DomainError;
use crate::domain::service::Service;

/// Ids that are not UUIDs can never name a stored user.
fn parse_user_id(raw: &str, uri: &Uri) -> Result<Uuid, ErrorResponse> {
    Uuid::parse_str(raw).map_err(|_| {
        warn!("Rejecting malformed user id: {}", raw);
        map_domain_error(&DomainError::user_not_found(raw), uri.path())
    })
}

/// Undecodable bodies and query strings are reported like any other bad input.
fn rejection_to_error(part: &str, message: String, uri: &Uri) -> ErrorResponse {
    warn!("Malformed request {}: {}", part, message);
    map_domain_error(&DomainError::validation(part, message), uri.path())
}

/// List all users
pub async fn list_users(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
) -> Result<Json<Vec<UserDto>>, ErrorResponse> {
    info!("Listing users");

    match svc.list_users().await {
        Ok(users) => Ok(Json(users.into_iter().map(UserDto::from).collect())),
        Err(e) => {
            error!("Failed to list users: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Create a new user from a form-encoded `username`
pub async fn create_user(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    form: Result<Form<CreateUserReq>, FormRejection>,
) -> Result<(StatusCode, Json<UserDto>), ErrorResponse> {
    let Form(req_body) = form.map_err(|r| rejection_to_error("body", r.body_text(), &uri))?;
    info!("Creating user: {:?}", req_body);

    match svc.create_user(req_body.into()).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(UserDto::from(user)))),
        Err(e) => {
            error!("Failed to create user: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Append an exercise to a user's log
pub async fn add_exercise(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
    form: Result<Form<CreateExerciseReq>, FormRejection>,
) -> Result<(StatusCode, Json<ExerciseDto>), ErrorResponse> {
    let id = parse_user_id(&raw_id, &uri)?;
    let Form(req_body) = form.map_err(|r| rejection_to_error("body", r.body_text(), &uri))?;
    info!("Adding exercise for user {}: {:?}", id, req_body);

    match svc.add_exercise(id, req_body.into()).await {
        Ok((user, exercise)) => Ok((
            StatusCode::CREATED,
            Json(ExerciseDto::new(&user, exercise)),
        )),
        Err(e) => {
            error!("Failed to add exercise for user {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get a user's exercise log, optionally bounded by `from`, `to` and `limit`
pub async fn get_log(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
    query: Result<Query<LogQueryParams>, QueryRejection>,
) -> Result<Json<UserLogDto>, ErrorResponse> {
    let id = parse_user_id(&raw_id, &uri)?;
    let Query(params) = query.map_err(|r| rejection_to_error("query", r.body_text(), &uri))?;
    info!("Getting log for user {} with query: {:?}", id, params);

    match svc.user_log(id, &params.into()).await {
        Ok(log) => Ok(Json(UserLogDto::from(log))),
        Err(e) => {
            error!("Failed to get log for user {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}
