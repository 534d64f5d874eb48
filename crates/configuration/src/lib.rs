use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{
    CapmConstants, Config, LoggingConfig, OutputFormat, ProjectionConfig, ProviderConfig, TickersConfig,
    ValuationPolicy,
};

/// Loads the application configuration from an optional `config.toml` in the
/// working directory, layered with `VALUATOR__*` environment variables.
///
/// This function is the primary entry point for this crate. Missing keys fall
/// back to their defaults, and the merged result is validated before it is returned.
pub fn load_config() -> Result<Config, ConfigError> {
    build(config::File::with_name("config").required(false))
}

/// Same as [`load_config`], but reads the given file, which must exist.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    build(config::File::from(path.as_ref()).required(true))
}

fn build<S>(file: S) -> Result<Config, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let builder = config::Config::builder()
        .add_source(file)
        // e.g. VALUATOR__CAPM__TREASURY_YIELD=4.3
        .add_source(config::Environment::with_prefix("VALUATOR").separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(?config, "Configuration loaded");
    Ok(config)
}
