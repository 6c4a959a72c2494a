//! Thumbnailer API Library
//!
//! This crate provides the Event Grid webhook: routes, handlers, the boundary
//! error adapter, telemetry setup and the server loop.

pub mod constants;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use error::{ErrorResponse, HttpPipelineError};
pub use handlers::event_grid::BatchSummary;
pub use state::AppState;
