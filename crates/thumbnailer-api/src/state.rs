use thumbnailer_worker::EventPipeline;

/// Shared by every request; the pipeline holds no per-request state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: EventPipeline,
}

impl AppState {
    pub fn new(pipeline: EventPipeline) -> Self {
        Self { pipeline }
    }
}
