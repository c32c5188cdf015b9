//! HTTP router setup
//!
//! The service is stateless: every request is an independent pipeline
//! invocation, so the router carries no shared state beyond middleware.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::api;

/// Build the API router with all endpoints and middleware.
///
/// Used by both the production binary and the integration tests.
pub fn build_router() -> Router {
    Router::new()
        .route("/api/gradient-removal", post(api::handle_gradient_removal))
        .route("/api/gradient-removal/test", get(api::handle_test))
        .route("/health", get(api::handle_health))
        .layer(TraceLayer::new_for_http())
}
