//! Configuration management for the Elidune administration console

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the remote library-management API.
    pub endpoint: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Where tokens are persisted between runs. Empty means the platform
    /// config directory (`<config_dir>/elidune-admin/tokens.json`).
    pub token_file: String,
    /// Leeway subtracted from the access token `exp` claim, in seconds.
    pub expiry_leeway_secs: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ListConfig {
    /// Default page size for resource listings.
    pub page_size: i64,
    /// Page size used when loading relation option lists.
    pub options_page_size: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub list: ListConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix ELIDUNE_ADMIN_)
            .add_source(
                Environment::with_prefix("ELIDUNE_ADMIN")
                    .separator("_")
                    .try_parsing(true),
            )
            // Override API endpoint from API_ENDPOINT env var if present
            .set_override_option("api.endpoint", env::var("API_ENDPOINT").ok())?
            .set_default("api.endpoint", ApiConfig::default().endpoint)?
            .set_default("api.timeout_secs", ApiConfig::default().timeout_secs)?
            .build()?;

        config.try_deserialize()
    }

    /// Resolved token file path, defaulting to the platform config directory.
    pub fn token_path(&self) -> PathBuf {
        if self.auth.token_file.is_empty() {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("elidune-admin")
                .join("tokens.json")
        } else {
            PathBuf::from(&self.auth.token_file)
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/api".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_file: String::new(),
            expiry_leeway_secs: 30,
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

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            options_page_size: 1000,
        }
    }
}
