//! # paramguard-api: Binary Entry Point
//!
//! Starts the Axum HTTP server. Binds to `PORT` (default 8080) and reads
//! the validation configuration from `PARAMGUARD_CONFIG`.

use metrics_exporter_prometheus::PrometheusBuilder;
use paramguard_api::state::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let port = config.port;

    let state = paramguard_api::bootstrap::bootstrap(config).map_err(|e| {
        tracing::error!("Bootstrap failed: {e}");
        e
    })?;

    // Metrics are optional: a failed install leaves /metrics answering 404.
    let state = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => state.with_metrics(handle),
        Err(e) => {
            tracing::warn!("Prometheus recorder not installed: {e}");
            state
        }
    };

    let app = paramguard_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("paramguard API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
