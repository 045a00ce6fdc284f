use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::validate::ValidationError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Client input rejected by the validation pipeline.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Store interaction or other unexpected runtime failure.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(e) => {
                let body = Json(json!({ "error": e.to_string() }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::Internal(e) => {
                tracing::error!(error = ?e, "request failed");
                let body = Json(json!({ "error": "Server error", "details": format!("{e:#}") }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
