use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Failure kinds surfaced by the pipeline and the ingestion path.
///
/// `Retrieval` and `Generation` wrap external-collaborator failures and are
/// reported as bad-gateway; everything else maps to the usual client/server
/// split.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("empty result: {0}")]
    EmptyResult(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("retrieval failed: {0}")]
    Retrieval(String),
    #[error("generation failed: {0}")]
    Generation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        ApiError::Internal(err.to_string())
    }

    pub fn retrieval<E: std::fmt::Display>(err: E) -> Self {
        ApiError::Retrieval(err.to_string())
    }

    pub fn generation<E: std::fmt::Display>(err: E) -> Self {
        ApiError::Generation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            ApiError::UnsupportedInput(_) | ApiError::BadRequest(_) | ApiError::EmptyResult(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Retrieval(_) | ApiError::Generation(_) => StatusCode::BAD_GATEWAY,
            ApiError::Config(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
