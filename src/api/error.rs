//! API error types and response formatting

use axum::http::header::WWW_AUTHENTICATE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::event_store::EventStoreError;
use crate::validation::ValidationError;

/// Realm advertised in basic-auth challenges
pub const AUTH_REALM: &str = "ayati-admin";

/// API error type that converts to appropriate HTTP responses
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or wrong admin credentials
    #[error("unauthorized")]
    Unauthorized,

    /// Client sent an unusable request
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The event log could not be written or read
    #[error("event store error: {0}")]
    Store(#[from] EventStoreError),
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

/// JSON error response body
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                [(WWW_AUTHENTICATE, format!("Basic realm=\"{}\"", AUTH_REALM))],
                Json(ErrorBody {
                    error: "unauthorized".to_string(),
                    code: "UNAUTHORIZED",
                }),
            )
                .into_response(),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: message,
                    code: "BAD_REQUEST",
                }),
            )
                .into_response(),
            ApiError::Store(e) => {
                tracing::error!(error = %e, "event store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: "log error".to_string(),
                        code: "INTERNAL_ERROR",
                    }),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_carries_challenge() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"ayati-admin\""
        );
    }

    #[tokio::test]
    async fn test_error_bodies() {
        async fn body(error: ApiError) -> serde_json::Value {
            let bytes = axum::body::to_bytes(error.into_response().into_body(), usize::MAX)
                .await
                .unwrap();
            serde_json::from_slice(&bytes).unwrap()
        }

        let bad = body(ValidationError::MissingType.into()).await;
        assert_eq!(bad["error"], "event type is required");
        assert_eq!(bad["code"], "BAD_REQUEST");

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let store = body(EventStoreError::from(io).into()).await;
        assert_eq!(store["error"], "log error");
        assert_eq!(store["code"], "INTERNAL_ERROR");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BadRequest("bad event".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        assert_eq!(
            ApiError::from(EventStoreError::from(io)).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
