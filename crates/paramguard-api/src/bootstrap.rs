//! # Service Bootstrap
//!
//! Reads the validation configuration at startup and builds the shared
//! dispatcher.
//!
//! ## Bootstrap Sequence
//!
//! 1. **Load Configuration**: Parse the YAML/JSON file named by
//!    `PARAMGUARD_CONFIG`.
//! 2. **Build Registry**: Compile every admissible schema entry; an
//!    unknown HTTP method in `include-methods` aborts startup.
//! 3. **Log Banner**: Structured startup summary.
//!
//! If `PARAMGUARD_CONFIG` is unset, the server runs with validation
//! disabled and every request reaches its handler unchecked.

use paramguard_schema::{
    ConfigError, RegistryError, SchemaRegistry, ValidationConfig, ValidationDispatcher,
};

use crate::state::{AppConfig, AppState};

/// Errors during service bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// The configuration file could not be read or parsed.
    #[error("validation config error: {0}")]
    Config(#[from] ConfigError),

    /// The configuration names an unknown HTTP method.
    #[error("validation registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Build the application state from process settings.
pub fn bootstrap(config: AppConfig) -> Result<AppState, BootstrapError> {
    let validation = match &config.config_path {
        Some(path) => ValidationConfig::load(path)?,
        None => {
            tracing::warn!("PARAMGUARD_CONFIG not set; parameter validation is disabled");
            ValidationConfig::default()
        }
    };

    let dispatcher = ValidationDispatcher::new(&validation)?;
    log_banner(&config, dispatcher.registry());

    Ok(AppState::with_dispatcher(config, dispatcher))
}

fn log_banner(config: &AppConfig, registry: &SchemaRegistry) {
    let source = config
        .config_path
        .as_ref()
        .map_or_else(|| "(none)".to_string(), |p| p.display().to_string());
    let mode = if registry.is_enabled() {
        "enabled"
    } else {
        "disabled"
    };
    let methods: Vec<&str> = registry
        .allowed_methods()
        .iter()
        .map(|m| m.as_str())
        .collect();

    tracing::info!(
        port = config.port,
        config = %source,
        validation = mode,
        schemas = registry.len(),
        skipped = registry.skipped().len(),
        "paramguard bootstrap complete"
    );
    println!("┌──────────────────────────────────────────────────┐");
    println!("│  paramguard API v{:<31}│", env!("CARGO_PKG_VERSION"));
    println!("│  Validation: {:<36}│", mode);
    println!("│  Methods:    {:<36}│", methods.join(", "));
    println!("│  Schemas:    {:<36}│", registry.len());
    println!("│  Port:       {:<36}│", config.port);
    println!("└──────────────────────────────────────────────────┘");
}
