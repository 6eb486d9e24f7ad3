//! Route definitions for the Weight Tracker API
//!
//! This module organizes all API routes and applies middleware.

use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, HeaderName, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod dashboard;
mod health;
mod profile;
mod weight;


pub use dashboard::{dashboard_routes, DashboardQuery};
pub use profile::profile_routes;
pub use weight::weight_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let uploads_dir = state.config().uploads.dir.clone();
    let user_header = HeaderName::from_bytes(state.config().auth.user_header.as_bytes())
        .unwrap_or_else(|_| HeaderName::from_static("remote-user"));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(render_metrics))
        .nest("/api/v1", api_routes(&state))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        // Apply middleware layers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, user_header]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API v1 routes
fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Weight Tracker API v1" }))
        .nest("/weight", weight::weight_routes())
        .nest("/profile", profile::profile_routes(&state.config().uploads))
        .nest("/dashboard", dashboard::dashboard_routes())
}

/// GET /metrics - Prometheus exposition
async fn render_metrics(State(state): State<AppState>) -> String {
    state.metrics.render()
}
