use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{exclusions, handlers, middleware::metrics_middleware, selection};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Selection
        .route("/rank", post(selection::rank_candidates))
        .route("/chains", post(selection::find_seat_chains))
        .route("/allocate", post(selection::plan_allocation))
        .route("/allocate/seats", post(selection::allocate_seats))
        // Exclusions
        .route(
            "/exclusions",
            get(exclusions::list_exclusions)
                .post(exclusions::record_exclusions)
                .delete(exclusions::clear_exclusions),
        )
        .with_state(state.clone());

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::get_metrics))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
