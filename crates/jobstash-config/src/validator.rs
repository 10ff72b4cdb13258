//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Convert collected errors into a single [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        if self.is_valid() {
            Ok(self.warnings)
        } else {
            Err(ConfigError::Invalid(
                self.errors
                    .iter()
                    .map(|e| format!("{}: {}", e.path, e.message))
                    .collect(),
            ))
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_storage(config, &mut result);
        Self::validate_retention(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_storage(config: &Config, result: &mut ValidationResult) {
        if config.storage.path.as_os_str().is_empty() {
            result.add_error(ValidationError::new(
                "storage.path",
                "Storage path cannot be empty",
            ));
        }

        let extension = config.storage.extension.trim().trim_start_matches('.');
        if extension.is_empty() {
            result.add_error(ValidationError::new(
                "storage.extension",
                "Extension cannot be empty",
            ));
        } else if extension.contains(['/', '\\']) {
            result.add_error(ValidationError::new(
                "storage.extension",
                "Extension cannot contain a path separator",
            ));
        } else if extension.chars().any(char::is_whitespace) {
            result.add_error(ValidationError::new(
                "storage.extension",
                "Extension cannot contain whitespace",
            ));
        }
    }

    fn validate_retention(config: &Config, result: &mut ValidationResult) {
        let retention = &config.retention;

        if !retention.max_age_days.is_finite() || retention.max_age_days <= 0.0 {
            result.add_error(ValidationError::new(
                "retention.max_age_days",
                "max_age_days must be a positive number",
            ));
        } else if retention.max_age_days < 1.0 {
            result.add_warning(ValidationWarning::new(
                "retention.max_age_days",
                "max_age_days is below one day, records will be evicted quickly",
            ));
        }

        if !retention.sweep_on_submit && retention.interval_seconds == 0 {
            result.add_warning(ValidationWarning::new(
                "retention",
                "Neither sweep_on_submit nor interval_seconds is set, records are only evicted by manual sweeps",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
