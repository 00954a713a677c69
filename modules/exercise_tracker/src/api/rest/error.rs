use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::rest::dto::ErrorDto;
use crate::domain::error::DomainError;

/// Message of the not-found payload; clients match on it verbatim.
pub const USER_NOT_FOUND: &str = "User not found";

/// JSON error response: `{ "error": "..." }` with an HTTP status
#[derive(Debug)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub body: ErrorDto,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Helper to create an ErrorResponse with less boilerplate
pub fn from_parts(status: StatusCode, message: impl Into<String>) -> ErrorResponse {
    ErrorResponse {
        status,
        body: ErrorDto {
            error: message.into(),
        },
    }
}

/// Map domain error to a JSON error body
pub fn map_domain_error(e: &DomainError, instance: &str) -> ErrorResponse {
    match e {
        DomainError::UserNotFound { .. } => from_parts(StatusCode::NOT_FOUND, USER_NOT_FOUND),
        DomainError::Validation { .. } => from_parts(StatusCode::BAD_REQUEST, e.to_string()),
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, instance, "Database error occurred");
            from_parts(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}
