//! Thumbnailer Worker
//!
//! Turns a blob-created event into a stored thumbnail: validate the event,
//! pick the output encoding, read the source, transform it, write the result.

pub mod error;
pub mod pipeline;

pub use error::PipelineError;
pub use pipeline::{EventPipeline, PipelineOutcome};
