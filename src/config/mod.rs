use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use toolform_engine::DEFAULT_MAX_DEPTH;

pub mod validator;

use crate::cli::Cli;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub form: FormSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Connection to the tool gateway
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GatewaySettings {
    /// Gateway root URL (e.g., "http://localhost:8080")
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Optional bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable containing the bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
}

fn default_timeout() -> u64 {
    30
}

impl GatewaySettings {
    pub fn resolve_api_key(&self) -> Option<String> {
        // First check direct api_key
        if let Some(key) = &self.api_key {
            return Some(key.clone());
        }

        // Then check environment variable
        if let Some(env_var) = &self.api_key_env {
            let key = std::env::var(env_var).ok();
            if key.is_none() {
                tracing::warn!("Gateway API key variable {} is not set", env_var);
            }
            return key;
        }

        None
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FormSettings {
    /// Nesting limit when resolving tool schemas
    #[serde(default = "default_max_schema_depth")]
    pub max_schema_depth: usize,
}

fn default_max_schema_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            max_schema_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingSettings {
    /// Default filter level when RUST_LOG is unset
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl Settings {
    /// Load settings from `path` (missing file means defaults) and validate
    pub fn from_path(path: &Path) -> Result<Self, anyhow::Error> {
        let settings = Self::load(path)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Create settings from CLI arguments (includes config file and CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::load(&cli.config)?;

        // Apply CLI overrides (CLI > env vars > config file)
        settings.apply_cli_overrides(cli);

        settings.validate()?;
        Ok(settings)
    }

    fn load(path: &Path) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .set_default("gateway.base_url", DEFAULT_BASE_URL)?
            .set_default("gateway.timeout_seconds", 30)?
            .set_default("form.max_schema_depth", DEFAULT_MAX_DEPTH as i64)?
            .set_default("logging.level", "info")?
            .build()?;

        Ok(s.try_deserialize()?)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::ConfigValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })
    }

    /// Apply CLI argument overrides to settings
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(url) = &cli.url {
            self.gateway.base_url = url.clone();
        }
        if let Some(timeout) = cli.timeout {
            self.gateway.timeout_seconds = timeout;
        }
        if let Some(level) = &cli.log_level {
            self.logging.level = level.clone();
        }
    }
}
