//! Application setup

pub mod routes;
pub mod server;

use crate::state::AppState;
use axum::Router;
use std::sync::Arc;
use thumbnailer_core::Config;
use thumbnailer_storage::create_storage;
use thumbnailer_worker::EventPipeline;

/// Build the storage collaborator, the pipeline and the router
pub async fn initialize_app(config: &Config) -> Result<(Arc<AppState>, Router), anyhow::Error> {
    let storage = create_storage(&config.thumbnail.source_access).await?;
    tracing::info!(backend = %storage.backend_type(), "Storage initialized");

    let pipeline = EventPipeline::new(storage, &config.thumbnail);
    let state = Arc::new(AppState::new(pipeline));
    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}
