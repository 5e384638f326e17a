use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};

/// JSON error body returned by the HTTP surface.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Service Unavailable")
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// Additional error details (e.g., which vendor group failed to persist)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

/// Error taxonomy for the replenishment core.
///
/// Failures are always surfaced to the immediate caller; nothing is retried
/// internally. Retry policy belongs to the calling layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The catalog store could not be reached (snapshot load or persistence).
    #[error("Catalog store unavailable: {0}")]
    StoreUnavailable(#[from] DbErr),

    /// A specific vendor group's order failed to save. Groups persisted before
    /// this one remain committed; groups after it were never attempted.
    #[error("Failed to persist order for vendor group '{vendor_group}': {source}")]
    PersistError {
        vendor_group: String,
        #[source]
        source: DbErr,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Event error: {0}")]
    EventError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::PersistError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ServiceError::EventError(_) | ServiceError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            ServiceError::PersistError { vendor_group, .. } => Some(format!(
                "vendor group '{}' failed; earlier groups remain committed",
                vendor_group
            )),
            _ => None,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: status
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_string(),
            message: self.to_string(),
            details: self.details(),
            timestamp: Utc::now().to_rfc3339(),
        };
        (status, Json(body)).into_response()
    }
}
