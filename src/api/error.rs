//! HTTP error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code: code.to_string(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    /// Duplicate titles and timer flag clashes are reported as 400.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "CONFLICT", message)
    }

    pub fn validation(details: Vec<FieldError>) -> Self {
        let mut error = Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_ERROR",
            "Validation failed",
        );
        error.body.details = Some(details);
        error
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(message) => {
                tracing::debug!(%message, "not found");
                Self::not_found(message)
            }
            StoreError::Conflict(message) => {
                tracing::debug!(%message, "conflict");
                Self::conflict(message)
            }
            StoreError::Database(_) | StoreError::Migration(_) => {
                tracing::error!(%error, "store failure");
                Self::internal()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(StoreError::task_not_found("x"), StatusCode::NOT_FOUND, "NOT_FOUND")]
    #[case(StoreError::duplicate_title("x"), StatusCode::BAD_REQUEST, "CONFLICT")]
    #[case(StoreError::timer_not_active("x"), StatusCode::BAD_REQUEST, "CONFLICT")]
    #[case(
        StoreError::Database(sqlx::Error::PoolClosed),
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR"
    )]
    fn store_errors_map_to_status(
        #[case] error: StoreError,
        #[case] status: StatusCode,
        #[case] code: &str,
    ) {
        let api = ApiError::from(error);
        assert_eq!(api.status, status);
        assert_eq!(api.body.code, code);
    }

    #[test]
    fn internal_error_hides_details() {
        let api = ApiError::from(StoreError::Database(sqlx::Error::PoolClosed));
        assert_eq!(api.body.message, "An internal error occurred");
        assert!(api.body.details.is_none());
    }
}
