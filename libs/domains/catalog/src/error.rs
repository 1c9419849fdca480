use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, ErrorCode};
use std::fmt::Display;
use thiserror::Error;

/// Message carried by [`CatalogError::DatabaseException`] when a delete hits a reference.
pub const INTEGRITY_VIOLATION_MESSAGE: &str = "Invalid request";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Id {0} not found")]
    ResourceNotFound(i64),

    #[error("{0}")]
    DatabaseException(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl CatalogError {
    /// Wraps an unexpected store failure, logging it at `error`.
    pub fn store(err: impl Display) -> Self {
        tracing::error!(error = %err, "Catalog store failure");
        CatalogError::Store(err.to_string())
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Convert CatalogError to AppError for standardized error responses
impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ResourceNotFound(_) => AppError::NotFound(err.to_string()),
            CatalogError::DatabaseException(msg) => AppError::BadRequest(msg),
            // Store details stay in the logs
            CatalogError::Store(_) => AppError::InternalServerError(
                ErrorCode::InternalError.default_message().to_string(),
            ),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_resource_not_found_message() {
        assert_eq!(
            CatalogError::ResourceNotFound(1000).to_string(),
            "Id 1000 not found"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            CatalogError::ResourceNotFound(1).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CatalogError::DatabaseException(INTEGRITY_VIOLATION_MESSAGE.to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CatalogError::store("connection reset").into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
