//! Configuration management for the ScholarHub client

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Backend host, e.g. `http://localhost:4000`. The fixed `/api` root
    /// is appended by the transport.
    pub url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix SCHOLARHUB_)
            .add_source(
                Environment::with_prefix("SCHOLARHUB")
                    .separator("_")
                    .try_parsing(true),
            )
            // Override API host from SCHOLARHUB_API_URL env var if present
            .set_override_option("api.url", env::var("SCHOLARHUB_API_URL").ok())?
            .build()?;

        config.try_deserialize()
    }

    /// Configuration pointing at the given host with defaults elsewhere
    pub fn for_host(url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                url: url.into(),
                ..ApiConfig::default()
            },
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:4000".to_string(),
            timeout_secs: 30,
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
