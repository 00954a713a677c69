use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use axum::{handler::HandlerWithoutStateExt, middleware::from_fn, routing::get, Router};
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
};

mod config;
pub mod request_id;
pub mod web;

pub use config::ApiIngressConfig;

/// HTTP host: owns the listener, the shared middleware stack and the
/// non-API routes (landing page, health, static files, 404 fallback).
pub struct ApiIngress {
    // Read-mostly; swapped only when the app reconfigures before serving
    config: ArcSwap<ApiIngressConfig>,
}

impl Default for ApiIngress {
    fn default() -> Self {
        Self::new(ApiIngressConfig::default())
    }
}

impl ApiIngress {
    /// Create a new ApiIngress instance with the given configuration
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
        }
    }

    /// Get the current configuration (cheap clone from ArcSwap)
    pub fn get_config(&self) -> ApiIngressConfig {
        (**self.config.load()).clone()
    }

    pub fn set_config(&self, config: ApiIngressConfig) {
        self.config.store(Arc::new(config));
    }

    /// Wrap the module routes with the host routes and middleware.
    pub fn build_router(&self, api: Router) -> Router {
        let config = self.get_config();
        tracing::debug!("Building router");

        let mut router = Router::new()
            .route("/", get(web::landing_page))
            .route("/health", get(web::health_check))
            .merge(api);

        // Files from static_dir, anything else ends in the plain-text 404
        router = match &config.static_dir {
            Some(dir) => {
                tracing::info!("Serving static files from {}", dir.display());
                router.fallback_service(
                    ServeDir::new(dir).fallback(web::not_found.into_service()),
                )
            }
            None => router.fallback(web::not_found),
        };

        // Layers wrap everything added before them, so this reads innermost first:
        // BodyLimit <- Timeout <- CORS <- push_req_id_to_extensions <- Trace <- PropagateRequestId <- SetRequestId
        router = router.layer(RequestBodyLimitLayer::new(config.body_limit_bytes));
        router = router.layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )));
        if config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        let x_request_id = request_id::header();
        router = router
            // Put request_id into extensions and span
            .layer(from_fn(request_id::push_req_id_to_extensions))
            // Trace with request_id/status/latency
            .layer(request_id::create_trace_layer())
            // Echo the id on the response
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            // Generate x-request-id when missing
            .layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId));

        router
    }

    /// Bind and serve until `cancel` fires, then drain in-flight requests.
    pub async fn serve(&self, router: Router, cancel: CancellationToken) -> Result<()> {
        let cfg = self.get_config();
        // host names such as "localhost" are resolved here
        let listener = tokio::net::TcpListener::bind(cfg.bind_addr.as_str())
            .await
            .with_context(|| format!("Invalid bind address '{}'", cfg.bind_addr))?;
        tracing::info!("HTTP server bound on {}", listener.local_addr()?);

        // Graceful shutdown on cancel
        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully (cancellation)");
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}
