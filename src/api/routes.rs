//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers;
use super::handlers::AppState;

/// Create the versioned API router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/answer", post(handlers::get_answer))
        .route("/faq", get(handlers::list_faqs))
        .route("/faq/:id", get(handlers::get_faq_by_id))
        .route("/metrics", get(handlers::get_metrics))
        .with_state(state)
}

/// Health check router, mounted at the root
pub fn health_routes() -> Router {
    Router::new().route("/health", get(handlers::health))
}
