//! Configuration loader with layered sources.

use crate::AppConfig;
use config::{Config, ConfigError, Environment, File};
use folio_core::FolioError;
use std::path::Path;
use tracing::{debug, info};

/// Configuration loader.
///
/// Loads once at startup; the resulting [`AppConfig`] is immutable for the
/// lifetime of the process.
#[derive(Clone)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `{config_dir}/default.toml` - Default values
    /// 2. `{config_dir}/{environment}.toml` - Environment-specific overrides
    /// 3. `{config_dir}/local.toml` - Local overrides (not committed)
    /// 4. Environment variables with `FOLIO` prefix
    pub fn load(config_dir: &str) -> Result<AppConfig, FolioError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment_var = std::env::var("FOLIO_ENVIRONMENT").ok();
        let environment = environment_var
            .clone()
            .unwrap_or_else(|| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        let default_path = format!("{}/default.toml", config_dir);
        if Path::new(&default_path).exists() {
            debug!("Loading default config from: {}", default_path);
            builder = builder.add_source(File::with_name(&default_path).required(false));
        }

        let env_path = format!("{}/{}.toml", config_dir, environment);
        if Path::new(&env_path).exists() {
            debug!("Loading environment config from: {}", env_path);
            builder = builder.add_source(File::with_name(&env_path).required(false));
        }

        let local_path = format!("{}/local.toml", config_dir);
        if Path::new(&local_path).exists() {
            debug!("Loading local config from: {}", local_path);
            builder = builder.add_source(File::with_name(&local_path).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix("FOLIO")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_folio_error)?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_folio_error)?;

        // The selecting environment variable wins over anything the files
        // declare, so the profile that picked the overlay is also the one the
        // application reports.
        if let Some(environment) = environment_var {
            app_config.app.environment = environment;
        }

        Self::validate_config(&app_config)?;

        Ok(app_config)
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<AppConfig, FolioError> {
        Self::load("./config")
    }

    /// Validates the configuration.
    fn validate_config(config: &AppConfig) -> Result<(), FolioError> {
        if config.database.url.is_empty() {
            return Err(FolioError::configuration("Database URL is required"));
        }

        if config.log.max_payload_length == 0 {
            return Err(FolioError::configuration(
                "log.max_payload_length must be greater than zero",
            ));
        }

        Ok(())
    }
}

fn config_error_to_folio_error(err: ConfigError) -> FolioError {
    FolioError::Configuration(err.to_string())
}
