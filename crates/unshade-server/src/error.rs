//! API error mapping
//!
//! Client-input problems map to 400 with a specific message; everything
//! else surfaces as a generic 500 while the detail stays in the logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use unshade_core::PipelineError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid selection data")]
    InvalidSelection,

    #[error("Invalid mode. Must be \"uniform\" or \"advanced\"")]
    InvalidMode,

    #[error("Invalid {0}: must be between 0 and 1")]
    InvalidStrength(&'static str),

    #[error("Invalid image data: {0}")]
    InvalidImage(String),

    #[error("Internal processing error")]
    Internal,
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        if e.is_client_error() {
            ApiError::InvalidImage(e.to_string())
        } else {
            tracing::error!(error = %e, "pipeline failure");
            ApiError::Internal
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
