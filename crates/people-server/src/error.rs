//! Mapping of service errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use people_core::Error;
use tracing::{error, warn};

/// A failed handler outcome: the underlying error plus the message shown to
/// clients when the cause is internal.
#[derive(Debug)]
pub struct ApiError {
    error: Error,
    action: &'static str,
}

impl ApiError {
    pub fn new(action: &'static str, error: Error) -> Self {
        Self { error, action }
    }

    pub fn status(&self) -> StatusCode {
        match self.error {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.error {
            Error::Validation(msg) => {
                warn!("{}: {}", self.action, msg);
                msg.clone()
            }
            Error::NotFound(what) => {
                warn!("{}: {} not found", self.action, what);
                "Person not found".to_string()
            }
            Error::Cancelled => "Request cancelled".to_string(),
            other => {
                error!("{}: {}", self.action, other);
                self.action.to_string()
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
