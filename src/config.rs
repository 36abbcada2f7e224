//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration files (config/default.toml, config/local.toml)
//! 3. Environment variables (override)

use serde::Deserialize;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub probe: ProbeConfig,
    #[serde(default)]
    pub schema: SchemaConfig,
    pub logging: LoggingConfig,
}

/// Identity of this bridge, published as the activity `generator`
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Generator id (e.g., "callr-bridge-prod")
    pub id: String,
    /// Generator name (default: "callr")
    pub name: String,
}

/// Media probe configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    /// Per-request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
    /// User-Agent header sent when fetching media
    pub user_agent: String,
    /// Bytes of the response body inspected for a file signature (default: 64)
    pub sniff_bytes: usize,
}

/// Schema registry configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SchemaConfig {
    /// Directory of `<name>.json` files that replace the bundled schemas
    pub directory: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (CALLR_BRIDGE__*)
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load() -> Result<Self, crate::error::AppError> {
        Self::load_from(None)
    }

    /// Same as [`AppConfig::load`], with an extra explicit file layered
    /// between the default files and the environment.
    pub fn load_from(path: Option<&std::path::Path>) -> Result<Self, crate::error::AppError> {
        use config::{Config, Environment, File};

        let mut builder = Config::builder()
            .set_default("service.id", "callr")?
            .set_default("service.name", "callr")?
            .set_default("probe.timeout_seconds", 30)?
            .set_default("probe.user_agent", "callr-bridge/0.1.0")?
            .set_default("probe.sniff_bytes", 64)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("CALLR_BRIDGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> Result<(), crate::error::AppError> {
        if self.service.id.trim().is_empty() {
            return Err(crate::error::AppError::Config(
                "service.id must not be empty".to_string(),
            ));
        }

        if self.service.name.trim().is_empty() {
            return Err(crate::error::AppError::Config(
                "service.name must not be empty".to_string(),
            ));
        }

        if self.probe.timeout_seconds == 0 {
            return Err(crate::error::AppError::Config(
                "probe.timeout_seconds must be greater than 0".to_string(),
            ));
        }

        if self.probe.sniff_bytes == 0 {
            return Err(crate::error::AppError::Config(
                "probe.sniff_bytes must be greater than 0".to_string(),
            ));
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(crate::error::AppError::Config(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }

        if let Some(directory) = &self.schema.directory {
            if !directory.is_dir() {
                tracing::warn!(
                    directory = %directory.display(),
                    "Schema directory does not exist; bundled schemas will be used"
                );
            }
        }

        Ok(())
    }
}
