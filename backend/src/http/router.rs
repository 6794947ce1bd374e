//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // The presentation layer may be served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Dataset
        .route("/summary", get(handlers::get_summary))
        .route("/timeline", get(handlers::get_timeline))
        .route("/metrics", get(handlers::get_metrics))
        .route("/network", get(handlers::get_network))
        // Street views
        .route("/map", get(handlers::get_map))
        .route("/streets/impacted", get(handlers::get_impacted_streets))
        .route("/streets/series", get(handlers::get_street_series))
        .route("/streets/distribution", get(handlers::get_street_distribution))
        // Vehicle views
        .route("/vehicles/distribution", get(handlers::get_vehicle_distribution))
        .route("/vehicles/impacted", get(handlers::get_impacted_vehicles))
        // Selection
        .route("/selection", get(handlers::get_selection))
        .route("/selection/toggle", post(handlers::toggle_selection));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let state = AppState::new(Arc::new(fixtures::session()));
        let _router = create_router(state);
    }
}
