//! Application error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Error taxonomy for the prediction service.
///
/// The two `Unavailable` variants only occur at startup and take the whole
/// service down; everything else is local to one request and retryable.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("reference dataset unavailable: {0}")]
    DataUnavailable(String),

    #[error("scoring pipeline unavailable: {0}")]
    ModelUnavailable(String),

    /// The "no models available" sentinel (or an empty model) was submitted.
    #[error("Please select valid options for all fields.")]
    IncompleteSelection,

    #[error("{0}")]
    InvalidSelection(String),

    /// Generic prediction failure. The underlying pipeline cause is logged at
    /// the call site and never put in this message.
    #[error("Error making prediction.")]
    Prediction,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::DataUnavailable(_) | AppError::ModelUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::IncompleteSelection | AppError::InvalidSelection(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Prediction => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
