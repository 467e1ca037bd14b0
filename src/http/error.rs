//! Mapping of ledger failures onto HTTP responses
//!
//! Every failure is answered with `{"exception": <kind>, "message": <text>}`.
//! `NotFound` maps to 404; everything else maps to 500.

use crate::types::LedgerError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tokio::task::JoinError;
use tracing::{debug, error};

/// Error returned by HTTP handlers
#[derive(Debug)]
pub enum ApiError {
    /// A business-rule failure reported by the ledger
    Ledger(LedgerError),
    /// The blocking task running a ledger call did not complete
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Ledger(LedgerError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Ledger(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(error: LedgerError) -> Self {
        ApiError::Ledger(error)
    }
}

impl From<JoinError> for ApiError {
    fn from(error: JoinError) -> Self {
        ApiError::Internal(format!("Ledger task failed: {}", error))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (exception, message) = match &self {
            ApiError::Ledger(e) => (e.kind().as_str(), e.to_string()),
            ApiError::Internal(message) => ("Internal", message.clone()),
        };

        if matches!(self, ApiError::Internal(_)) {
            error!(%message, "request failed");
        } else {
            debug!(%status, exception, %message, "request rejected");
        }

        (
            status,
            Json(json!({
                "exception": exception,
                "message": message,
            })),
        )
            .into_response()
    }
}
