//! HTTP error response conversion
//!
//! The webhook is the only place pipeline failures are logged and turned into
//! a status code. Event Grid does not redeliver after 400, 401, 403 or 413;
//! any other failure status is retried, so a non-recoverable error must map to
//! one of those.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thumbnailer_core::{ErrorMetadata, InvalidEventError, LogLevel};
use thumbnailer_worker::PipelineError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether redelivering the event may succeed
    pub recoverable: bool,
}

/// Wrapper type for PipelineError to implement IntoResponse
#[derive(Debug)]
pub struct HttpPipelineError(pub PipelineError);

impl From<PipelineError> for HttpPipelineError {
    fn from(err: PipelineError) -> Self {
        HttpPipelineError(err)
    }
}

impl From<InvalidEventError> for HttpPipelineError {
    fn from(err: InvalidEventError) -> Self {
        HttpPipelineError(PipelineError::InvalidEvent(err))
    }
}

/// A body that is not a JSON event batch is a malformed event, not a server error.
impl From<JsonRejection> for HttpPipelineError {
    fn from(rejection: JsonRejection) -> Self {
        InvalidEventError::MalformedPayload(rejection.body_text()).into()
    }
}

/// JSON body extractor that answers with `ErrorResponse` on deserialization failure.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpPipelineError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpPipelineError::from)?;
        Ok(ValidatedJson(inner))
    }
}

pub(crate) fn log_error(error: &PipelineError) {
    let code = error.error_code();
    let recoverable = error.is_recoverable();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, code, recoverable, "Event processing failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, code, recoverable, "Event processing failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, code, recoverable, "Event processing failed");
        }
    }
}

impl IntoResponse for HttpPipelineError {
    fn into_response(self) -> Response {
        let error = &self.0;

        let status = StatusCode::from_u16(error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(error);

        let body = Json(ErrorResponse {
            error: error.to_string(),
            code: error.error_code().to_string(),
            recoverable: error.is_recoverable(),
        });

        (status, body).into_response()
    }
}
