//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from a
//! TOML file, an optional environment overlay, and `UPLOADHUB__*`
//! environment variables. Every section falls back to its defaults.

pub mod ledger;
pub mod logging;
pub mod storage;
pub mod upload;

use serde::{Deserialize, Serialize};

pub use self::ledger::{DatabaseConfig, LedgerConfig};
pub use self::logging::LoggingConfig;
pub use self::storage::{LocalStorageConfig, S3StorageConfig, StorageConfig};
pub use self::upload::UploadConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Object storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Batch upload pipeline settings.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Metadata ledger settings.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Database connection settings (used by the `postgres` ledger).
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Merges the file at `path` (optional), an environment-specific overlay
    /// `config/{env}` (optional), and environment variables prefixed with
    /// `UPLOADHUB__`.
    pub fn load(path: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("UPLOADHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
