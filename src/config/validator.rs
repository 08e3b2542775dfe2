use thiserror::Error;

use crate::config::{FormSettings, GatewaySettings, LoggingSettings, Settings};

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_gateway(&settings.gateway) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_form(&settings.form) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_logging(&settings.logging) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_gateway(gateway: &GatewaySettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if gateway.base_url.trim().is_empty() {
            errors.push(ValidationError::MissingField("gateway.base_url".to_string()));
        } else if !(gateway.base_url.starts_with("http://") || gateway.base_url.starts_with("https://")) {
            errors.push(ValidationError::InvalidValue {
                field: "gateway.base_url".to_string(),
                reason: format!("'{}' must start with http:// or https://", gateway.base_url),
            });
        }

        if gateway.timeout_seconds == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "gateway.timeout_seconds".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        if let Some(env_var) = &gateway.api_key_env {
            if env_var.is_empty() {
                errors.push(ValidationError::InvalidValue {
                    field: "gateway.api_key_env".to_string(),
                    reason: "Variable name must not be empty".to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_form(form: &FormSettings) -> Result<(), Vec<ValidationError>> {
        if form.max_schema_depth == 0 {
            return Err(vec![ValidationError::InvalidValue {
                field: "form.max_schema_depth".to_string(),
                reason: "Depth must be greater than 0".to_string(),
            }]);
        }
        Ok(())
    }

    fn validate_logging(logging: &LoggingSettings) -> Result<(), Vec<ValidationError>> {
        if !LOG_LEVELS.contains(&logging.level.to_ascii_lowercase().as_str()) {
            return Err(vec![ValidationError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("'{}' is not one of {}", logging.level, LOG_LEVELS.join(", ")),
            }]);
        }
        Ok(())
    }
}
