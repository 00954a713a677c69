use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;

use crate::api::rest::handlers;
use crate::domain::service::Service;

pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let router = router
        // GET /api/users - list users, POST /api/users - create one
        .route(
            "/api/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        // POST /api/users/{id}/exercises - append an exercise
        .route("/api/users/{id}/exercises", post(handlers::add_exercise))
        // GET /api/users/{id}/logs - filtered exercise log
        .route("/api/users/{id}/logs", get(handlers::get_log))
        .layer(Extension(service));

    Ok(router)
}
