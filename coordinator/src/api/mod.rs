//! HTTP API
//!
//! JSON over HTTP in front of the coordinator task. Handlers only translate
//! between wire messages and [`CoordinatorHandle`] calls; all state lives in
//! the task.

pub mod handlers;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use shared::ErrorResponse;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::CoordinatorConfig;
use crate::service::CoordinatorHandle;

/// State shared by every handler
#[derive(Clone)]
pub struct ApiState {
    pub coordinator: CoordinatorHandle,
    pub config: Arc<CoordinatorConfig>,
}

impl ApiState {
    pub fn new(coordinator: CoordinatorHandle, config: CoordinatorConfig) -> Self {
        Self {
            coordinator,
            config: Arc::new(config),
        }
    }
}

/// Build the Axum router with all routes
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        // Client API
        .route("/jobs", post(handlers::create_job))
        .route("/jobs/:job_id", get(handlers::job_status))
        .route("/jobs/:job_id/results", get(handlers::job_results))
        // Worker API
        .route("/workers", post(handlers::register_worker))
        .route("/workers/:worker_id/chunk", get(handlers::next_chunk))
        .route("/workers/:worker_id/heartbeat", post(handlers::heartbeat))
        .route("/workers/:worker_id/results", post(handlers::submit_result))
        // Health check
        .route("/health", get(handlers::health_check))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(middleware::map_response(json_method_not_allowed))
                .into_inner(),
        )
        .with_state(state)
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("no such endpoint"))).into_response()
}

/// Give axum's bodyless 405 responses the standard error body
async fn json_method_not_allowed(response: Response) -> Response {
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        let body = Json(ErrorResponse::new("method not allowed"));
        (StatusCode::METHOD_NOT_ALLOWED, body).into_response()
    } else {
        response
    }
}
