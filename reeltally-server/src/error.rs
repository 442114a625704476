//! HTTP error mapping for the reeltally server

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use reeltally_common::api::ErrorBody;

use crate::types::QueryError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Aggregation query failed
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError::Query(err) = self;
        let (status, code) = match &err {
            QueryError::GenreNotFound(_) => (StatusCode::NOT_FOUND, "GENRE_NOT_FOUND"),
            QueryError::Provider(_) => (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR"),
            QueryError::Cache(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CACHE_ERROR"),
            QueryError::Cancelled => (StatusCode::INTERNAL_SERVER_ERROR, "CANCELLED"),
            QueryError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = Json(ErrorBody::new(code, err.to_string()));
        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
