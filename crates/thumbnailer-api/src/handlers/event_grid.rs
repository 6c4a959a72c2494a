//! Event Grid webhook handler
//!
//! Accepts a batch of Event Grid events. Subscription validation is answered
//! with the handshake code. Blob-created events go through the pipeline one at
//! a time and everything else is acknowledged and ignored.
//!
//! An event that can never succeed is logged and dropped so the rest of the
//! batch still runs. A recoverable failure fails the whole batch, and Event
//! Grid redelivers it.

use crate::error::{log_error, HttpPipelineError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thumbnailer_core::models::EventKind;
use thumbnailer_core::{ErrorMetadata, EventGridEvent, SubscriptionValidationResponse};
use thumbnailer_worker::{PipelineError, PipelineOutcome};

/// Per-batch tally returned when no event failed recoverably
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub written: usize,
    pub skipped: usize,
    pub ignored: usize,
    /// Events rejected with a non-recoverable error
    pub dropped: usize,
}

async fn handle_blob_created(
    state: &AppState,
    event: &EventGridEvent,
) -> Result<PipelineOutcome, PipelineError> {
    let creation = event.creation_event()?;
    state.pipeline.handle(&creation).await
}

#[tracing::instrument(
    skip_all,
    fields(event_count = tracing::field::Empty, operation = "event_grid_webhook")
)]
pub async fn handle_events(
    State(state): State<Arc<AppState>>,
    ValidatedJson(events): ValidatedJson<Vec<EventGridEvent>>,
) -> Result<Response, HttpPipelineError> {
    tracing::Span::current().record("event_count", events.len());
    let mut summary = BatchSummary::default();

    for event in &events {
        match event.kind() {
            EventKind::SubscriptionValidation => {
                let data = event.validation_data()?;
                tracing::info!(
                    event_id = %event.id,
                    topic = ?event.topic,
                    validation_url = ?data.validation_url,
                    "Answering Event Grid subscription validation"
                );
                return Ok(Json(SubscriptionValidationResponse {
                    validation_response: data.validation_code,
                })
                .into_response());
            }
            EventKind::BlobCreated => match handle_blob_created(&state, event).await {
                Ok(PipelineOutcome::Written { .. }) => summary.written += 1,
                Ok(PipelineOutcome::Skipped { .. }) => summary.skipped += 1,
                Err(error) if !error.is_recoverable() => {
                    tracing::info_span!("dropped_event", event_id = %event.id)
                        .in_scope(|| log_error(&error));
                    summary.dropped += 1;
                }
                Err(error) => return Err(error.into()),
            },
            EventKind::Other => {
                tracing::debug!(
                    event_id = %event.id,
                    event_type = %event.event_type,
                    "Ignoring event type"
                );
                summary.ignored += 1;
            }
        }
    }

    Ok(Json(summary).into_response())
}
