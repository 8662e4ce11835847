//! # Schema Guard
//!
//! Runs every inbound `GET` through the [`ValidationDispatcher`] before the
//! handler executes. Other methods pass through unvalidated.
//!
//! The dispatcher is read from a request extension (`Arc<ValidationDispatcher>`)
//! installed by [`crate::app`]. On success the merged parameters (query
//! plus captured path variables) are stored as [`ValidatedParams`] for
//! handlers that want them.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use paramguard_core::Params;
use paramguard_schema::{DispatchError, ValidationDispatcher, ValidationOutcome};

use crate::error::AppError;

/// Counter incremented once per request seen by the guard.
pub const REQUESTS_METRIC: &str = "paramguard_requests_total";

/// Parameters that passed (or were not subject to) schema validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedParams(pub Params);

/// Middleware validating query parameters and path variables.
pub async fn schema_guard_middleware(mut request: Request, next: Next) -> Response {
    let Some(dispatcher) = request
        .extensions()
        .get::<Arc<ValidationDispatcher>>()
        .cloned()
    else {
        return next.run(request).await;
    };

    if request.method() != Method::GET {
        tracing::warn!(
            method = %request.method(),
            path = request.uri().path(),
            "request passed through without parameter validation"
        );
        record("passthrough");
        return next.run(request).await;
    }

    let path = request.uri().path().to_string();
    let mut params = Params::from_query(request.uri().query().unwrap_or_default());

    match dispatcher.validate(request.method().as_str(), &path, &mut params) {
        Ok(outcome) => {
            record(match &outcome {
                ValidationOutcome::Valid { .. } => "valid",
                ValidationOutcome::Skipped(cause) => cause.as_str(),
            });
            request.extensions_mut().insert(ValidatedParams(params));
            next.run(request).await
        }
        Err(err) => {
            record(match &err {
                DispatchError::ValidationFailed(_) => "rejected",
                DispatchError::Fault(_) => "fault",
            });
            AppError::from(err).into_response()
        }
    }
}

fn record(outcome: &'static str) {
    metrics::counter!(REQUESTS_METRIC, "outcome" => outcome).increment(1);
}
