//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Schema rejections from the dispatcher become `400 VALIDATION_ERROR`
//! carrying the joined field messages verbatim; engine faults and panics
//! become `500 INTERNAL_ERROR` with a generic message. Internal detail is
//! logged, never returned.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use paramguard_schema::DispatchError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request could not be interpreted by a handler (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Request parameters rejected by their schema (400). The message is
    /// returned to the client as is.
    #[error("{0}")]
    Validation(String),

    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::ValidationFailed(rejection) => Self::Validation(rejection.message),
            DispatchError::Fault(reason) => Self::Internal(reason),
        }
    }
}

/// Response for a handler panic, installed on `CatchPanicLayer`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };
    AppError::Internal(format!("handler panicked: {detail}")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use paramguard_schema::{FieldError, Rejection};

    #[test]
    fn validation_status_code() {
        let err = AppError::Validation("bad field".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");
    }

    #[test]
    fn bad_request_status_code() {
        let err = AppError::BadRequest("unknown status".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "BAD_REQUEST");
    }

    #[test]
    fn not_found_status_code() {
        let (status, code) = AppError::NotFound("x".into()).status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
    }

    #[test]
    fn internal_status_code() {
        let (status, code) = AppError::Internal("boom".into()).status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "INTERNAL_ERROR");
    }

    #[test]
    fn dispatch_errors_convert() {
        let rejection = Rejection {
            message: "a; b".to_string(),
            errors: vec![
                FieldError {
                    field: "a".to_string(),
                    message: "a".to_string(),
                },
                FieldError {
                    field: "b".to_string(),
                    message: "b".to_string(),
                },
            ],
        };
        match AppError::from(DispatchError::ValidationFailed(rejection)) {
            AppError::Validation(msg) => assert_eq!(msg, "a; b"),
            other => panic!("expected Validation, got: {other:?}"),
        }
        assert!(matches!(
            AppError::from(DispatchError::Fault("regex".into())),
            AppError::Internal(_)
        ));
    }

    // ── into_response tests ──────────────────────────────────────

    use http_body_util::BodyExt;

    async fn body_of(response: Response) -> (StatusCode, ErrorBody) {
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn into_response_validation_is_verbatim() {
        let msg = "parameter 'userId' failed validation: 'must be a positive integer'";
        let (status, body) = body_of(AppError::Validation(msg.into()).into_response()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.code, "VALIDATION_ERROR");
        assert_eq!(body.error.message, msg);
    }

    #[tokio::test]
    async fn into_response_internal_hides_details() {
        let (status, body) =
            body_of(AppError::Internal("backtrack limit".into()).into_response()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        assert_eq!(body.error.message, "An internal error occurred");
    }

    #[tokio::test]
    async fn panic_payloads_map_to_internal_error() {
        for payload in [
            Box::new("static str") as Box<dyn Any + Send>,
            Box::new(String::from("owned")),
            Box::new(42_u8),
        ] {
            let (status, body) = body_of(panic_response(payload)).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body.error.message, "An internal error occurred");
        }
    }
}
