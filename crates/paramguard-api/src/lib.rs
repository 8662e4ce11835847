//! # paramguard-api: Axum Service with Schema-Guarded Routes
//!
//! Serves the demo user routes behind the schema guard, plus health probes
//! and a Prometheus scrape endpoint.
//!
//! ## API Surface
//!
//! | Path                                   | Module              |
//! |----------------------------------------|---------------------|
//! | `/api/users`                           | [`routes::users`]   |
//! | `/api/users/{userId}`                  | [`routes::users`]   |
//! | `/api/users/{userId}/orders/{orderId}` | [`routes::users`]   |
//! | `/health/liveness`, `/health/readiness`| probes              |
//! | `/metrics`                             | Prometheus text     |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → CatchPanic → SchemaGuard → Handler
//! ```
//!
//! The guard wraps every route. Probes and `/metrics` carry no query
//! parameters in practice and are normally listed in `exclude-uris`.

pub mod bootstrap;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::header;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;

use crate::error::AppError;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let dispatcher = state.dispatcher.clone();

    Router::new()
        .merge(routes::users::router())
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(metrics))
        .layer(from_fn(middleware::schema_guard::schema_guard_middleware))
        .layer(axum::Extension(dispatcher))
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(middleware::tracing_layer::layer())
        .with_state(state)
}

/// Liveness probe: 200 while the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: the registry is built before the listener binds, so a
/// serving process is ready.
async fn readiness() -> &'static str {
    "ready"
}

/// Prometheus text exposition of the process metrics.
async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| AppError::NotFound("metrics recorder not installed".to_string()))?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    ))
}
