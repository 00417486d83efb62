//! Router setup and configuration.

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::api::handlers::{health, ids};
use crate::api::state::AppState;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    // Health and metrics routes
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/metrics", get(health::metrics));

    // Idempotent batch issuance
    let id_routes = Router::new().route("/ids/{key}", get(ids::issue_batch));

    Router::new()
        .merge(health_routes)
        .merge(id_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
