//! Configuration management for the library desk

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Default loan length requested from the service, in days
pub const DEFAULT_LOAN_DURATION_DAYS: u32 = 14;

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the library service, e.g. `http://127.0.0.1:5000/api/`
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoansConfig {
    pub default_duration_days: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub loans: LoansConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // LIBRARY_DESK__API__BASE_URL, LIBRARY_DESK__LOANS__DEFAULT_DURATION_DAYS, ...
            .add_source(
                Environment::with_prefix("LIBRARY_DESK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("api.base_url", env::var("API_BASE_URL").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/api/".to_string(),
        }
    }
}

impl Default for LoansConfig {
    fn default() -> Self {
        Self {
            default_duration_days: DEFAULT_LOAN_DURATION_DAYS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
