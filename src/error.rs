//! Unified API error type.
//!
//! Handlers return `Result<Json<T>, ApiError>`; missing keys surface as
//! `NotFound` at the edge instead of panicking inside the pipeline.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("upstream contract violation: {0}")]
    UpstreamContract(String),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Upstream(reason) => {
                tracing::error!(%reason, "upstream request failed");
                (StatusCode::BAD_GATEWAY, "upstream_error")
            }
            ApiError::UpstreamContract(reason) => {
                tracing::error!(%reason, "upstream contract violation");
                (StatusCode::BAD_GATEWAY, "upstream_contract")
            }
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Upstream(err.to_string())
    }
}
