use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_logging;
pub use settings::{Config, DatabaseSettings, ExportSettings, LoggingSettings};

/// Prefix for environment overrides, e.g. `OSPOS__DATABASE__HOST`.
const ENV_PREFIX: &str = "OSPOS";

/// Loads the application configuration.
///
/// Sources are layered, later ones winning: built-in defaults, then the TOML
/// file (`path` if given, otherwise an optional `config.toml` in the working
/// directory), then `OSPOS__SECTION__KEY` environment variables. A `.env`
/// file, if present, is loaded into the environment first.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    check_env_file(dotenvy::dotenv())?;
    build_config(path, environment())
}

/// The environment layer read by `load_config`.
pub fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
}

/// Layers defaults, the TOML file and `env`, then validates the result.
pub fn build_config(
    path: Option<&Path>,
    env: config::Environment,
) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path.to_path_buf()).required(true),
        None => config::File::with_name("config.toml").required(false),
    };

    let builder = config::Config::builder()
        .set_default("database.host", "192.168.0.135")?
        .set_default("database.port", 3306)?
        .set_default("database.user", "ospos")?
        .set_default("database.password", "password")?
        .set_default("database.name", "osposrevive")?
        .set_default("export.output_path", "exports/ospos_data.js")?
        .set_default("export.chunk_size", 1000)?
        .set_default("export.bundle_identifier", "OSPOS_DATA_BUNDLE")?
        .set_default("logging.level", "info")?
        .add_source(file)
        .add_source(env)
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}

/// A missing `.env` is fine; an unreadable or malformed one is not, since the
/// credentials it holds would otherwise silently fall back to the defaults.
fn check_env_file<T>(result: Result<T, dotenvy::Error>) -> Result<(), ConfigError> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::EnvFileError(e.to_string())),
    }
}
