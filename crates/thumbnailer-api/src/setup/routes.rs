//! Route configuration and setup

use crate::constants::{EVENT_GRID_PATH, HEALTH_PATH, MAX_EVENT_BATCH_BYTES};
use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(handlers::health::health_check))
        .route(EVENT_GRID_PATH, post(handlers::event_grid::handle_events))
        .layer(RequestBodyLimitLayer::new(MAX_EVENT_BATCH_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
