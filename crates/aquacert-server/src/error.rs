//! Error types for the AquaCert server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::service::ServiceError;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(issues) => AppError::Validation(issues),
            ServiceError::NotFound(_) => AppError::NotFound(err.to_string()),
            ServiceError::InvalidStatus(_) => AppError::BadRequest(err.to_string()),
            ServiceError::Conflict { .. } => AppError::Conflict(err.to_string()),
            ServiceError::Constraint(_) => AppError::Unprocessable(err.to_string()),
            ServiceError::Connection(_) => AppError::Unavailable(err.to_string()),
            ServiceError::Backend(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::Validation(issues) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "validation failed", "issues": issues })),
            )
                .into_response(),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg).into_response(),
            AppError::Unprocessable(msg) => {
                tracing::warn!("Store constraint violation: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, msg).into_response()
            }
            AppError::Unavailable(msg) => {
                tracing::error!("Store unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "Service temporarily unavailable").into_response()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::Validation(vec!["x".into()]), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound(Uuid::new_v4()), StatusCode::NOT_FOUND),
            (ServiceError::InvalidStatus("nope".into()), StatusCode::BAD_REQUEST),
            (
                ServiceError::Conflict {
                    id: Uuid::new_v4(),
                    expected_version: 2,
                },
                StatusCode::CONFLICT,
            ),
            (ServiceError::Constraint("check".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (ServiceError::Connection("refused".into()), StatusCode::SERVICE_UNAVAILABLE),
            (ServiceError::Backend("decode".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
