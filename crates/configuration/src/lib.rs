use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{DataSettings, MetricsSettings, OutputSettings, RunConfig, SamplingFrequency, WindowSettings};

/// Loads the run configuration.
///
/// Sources are layered in increasing priority: the built-in defaults, the optional TOML file at
/// `path`, then environment variables such as `LEVWIN_WINDOW__SIZE=12` or
/// `LEVWIN_LEVERAGE=1,2,3`. Validation is left to `RunConfig::validate`, after any command-line
/// overrides have been applied.
pub fn load_config(path: Option<&Path>) -> Result<RunConfig, ConfigError> {
    load_from(path, environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("LEVWIN")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("leverage")
}

fn load_from(
    path: Option<&Path>,
    environment: config::Environment,
) -> Result<RunConfig, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(
            config::File::from(path)
                .format(config::FileFormat::Toml)
                .required(true),
        );
    }

    let settings = builder.add_source(environment).build()?;

    let config = settings.try_deserialize::<RunConfig>()?;
    tracing::debug!(?config, "Loaded run configuration");

    Ok(config)
}
