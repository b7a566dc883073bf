//! API errors with JSON envelope responses.
//!
//! Every failure is answered with HTTP 400 and `{"success": false, "error": "<message>"}`,
//! whether the request was invalid or the database failed.

use api_shared::ApiResponse;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use referral_core::{QueryError, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed request parameter.
    #[error("{0}")]
    Validation(String),
    /// Database or driver failure.
    #[error("{0}")]
    Data(String),
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        if err.is_validation() {
            ApiError::Validation(err.to_string())
        } else {
            ApiError::Data(err.to_string())
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Data(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Validation(message) => {
                tracing::warn!("rejected request: {}", message);
            }
            ApiError::Data(message) => {
                tracing::error!("data error: {}", message);
            }
        }

        let body = ApiResponse::<()>::failure(self.to_string());
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
