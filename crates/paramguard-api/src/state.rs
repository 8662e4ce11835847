//! # Application State
//!
//! Shared state for the Axum application, passed to route handlers via the
//! `State` extractor and to the schema guard via a request extension.
//!
//! Everything here is immutable after bootstrap: the dispatcher is built
//! once and shared behind an `Arc`, and the Prometheus handle only renders.

use std::path::PathBuf;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use paramguard_schema::ValidationDispatcher;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8080;

/// Process settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port the HTTP server binds to (`PORT`).
    pub port: u16,
    /// Validation configuration file (`PARAMGUARD_CONFIG`). Validation is
    /// disabled when absent.
    pub config_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            config_path: None,
        }
    }
}

impl AppConfig {
    /// Read `PORT` and `PARAMGUARD_CONFIG`. An unparsable port falls back
    /// to the default.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("PORT").ok(),
            std::env::var("PARAMGUARD_CONFIG").ok(),
        )
    }

    fn from_vars(port: Option<String>, config_path: Option<String>) -> Self {
        Self {
            port: port.and_then(|p| p.parse().ok()).unwrap_or(DEFAULT_PORT),
            config_path: config_path
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub dispatcher: Arc<ValidationDispatcher>,
    /// Present when a Prometheus recorder was installed at startup.
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("dispatcher", &self.dispatcher)
            .field("metrics", &self.metrics.as_ref().map(|_| "[installed]"))
            .finish()
    }
}

impl AppState {
    /// State with validation disabled and no metrics recorder.
    pub fn new() -> Self {
        Self::with_dispatcher(AppConfig::default(), ValidationDispatcher::disabled())
    }

    pub fn with_dispatcher(config: AppConfig, dispatcher: ValidationDispatcher) -> Self {
        Self {
            config,
            dispatcher: Arc::new(dispatcher),
            metrics: None,
        }
    }

    /// Attach the handle used to render `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
