//! # fitola-server
//!
//! HTTP API for the Fitola backend:
//!
//! - Chat, translation and plan generation backed by the LLM
//! - SimpleClaw and self-improving workflow endpoints
//! - Raw memory access
//! - Mock profile, leaderboard, nearby-user and messaging endpoints
//! - Recipe discovery passthrough to the Rube gateway

pub mod error;
pub mod messages;
pub mod metrics;
pub mod routes;
pub mod rube;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{Json, Response},
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

/// Build the Axum router over shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = state.config.server.cors;

    let mut router = Router::new()
        .route("/", get(health_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .merge(routes::chat::routes())
        .merge(routes::plans::routes())
        .merge(routes::community::routes())
        .merge(routes::messages::routes())
        .merge(routes::simpleclaw::routes())
        .merge(routes::ai::routes())
        .merge(routes::memory::routes())
        .merge(routes::rube::routes())
        .layer(middleware::from_fn_with_state(state.clone(), count_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}

/// Count every request, and every 4xx/5xx response as an error.
async fn count_requests(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    state.metrics.inc_http_requests();
    let response = next.run(request).await;
    if response.status().is_client_error() || response.status().is_server_error() {
        state.metrics.inc_http_errors();
    }
    response
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: fitola_core::SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn metrics_handler(
    State(state): State<Arc<AppState>>,
) -> (
    StatusCode,
    [(axum::http::header::HeaderName, &'static str); 1],
    String,
) {
    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        state.metrics.render_prometheus(),
    )
}
