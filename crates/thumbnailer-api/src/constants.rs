/// Path the Event Grid subscription delivers to
pub const EVENT_GRID_PATH: &str = "/runtime/webhooks/eventgrid";

pub const HEALTH_PATH: &str = "/health";

/// Event Grid caps a delivered batch at 1 MB
pub const MAX_EVENT_BATCH_BYTES: usize = 1024 * 1024;
