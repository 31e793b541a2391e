//! Configuration validation for carebook.

use super::types::{AppConfig, LoggingConfig, SecurityConfig, UiConfig};
use crate::error::CarebookError;
use crate::tui::ThemeName;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.ui.validate());
        errors.extend(self.security.validate());
        errors.extend(self.logging.validate());
        errors
    }
}

impl AppConfig {
    /// Fail with every validation problem, one per line.
    pub fn ensure_valid(&self) -> crate::Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(());
        }
        let listing = errors
            .iter()
            .map(|e| format!("  {e}"))
            .collect::<Vec<_>>()
            .join("\n");
        Err(CarebookError::config(format!("\n{listing}")))
    }
}

impl Validatable for UiConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if ThemeName::from_name(&self.theme).is_none() {
            errors.push(ConfigError::new(
                "ui.theme",
                format!(
                    "Unknown theme '{}'. Valid options: {}",
                    self.theme,
                    ThemeName::ALL
                        .iter()
                        .map(|t| t.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            ));
        }
        if !(10..=2000).contains(&self.tick_rate_ms) {
            errors.push(ConfigError::new(
                "ui.tick_rate_ms",
                format!("{} is outside 10..=2000", self.tick_rate_ms),
            ));
        }
        if self.min_width < 40 || self.min_height < 12 {
            errors.push(ConfigError::new(
                "ui.min_width",
                "minimum terminal size cannot be below 40x12",
            ));
        }
        errors
    }
}

impl Validatable for SecurityConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !(8..=64).contains(&self.salt_length) {
            errors.push(ConfigError::new(
                "security.salt_length",
                format!("{} is outside 8..=64 bytes", self.salt_length),
            ));
        }
        if self.min_password_length == 0 {
            errors.push(ConfigError::new(
                "security.min_password_length",
                "must be at least 1",
            ));
        }
        errors
    }
}

impl Validatable for LoggingConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let valid = ["trace", "debug", "info", "warn", "error", "off"];
        if valid.contains(&self.level.to_lowercase().as_str()) {
            Vec::new()
        } else {
            vec![ConfigError::new(
                "logging.level",
                format!(
                    "Invalid level '{}'. Valid options: {}",
                    self.level,
                    valid.join(", ")
                ),
            )]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().is_valid());
    }

    #[test]
    fn test_unknown_theme() {
        let mut config = AppConfig::default();
        config.ui.theme = "neon".to_string();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "ui.theme");
        assert!(errors[0].message.contains("high-contrast"));
    }

    #[test]
    fn test_security_bounds() {
        let security = SecurityConfig {
            salt_length: 2,
            min_password_length: 0,
        };
        assert_eq!(security.validate().len(), 2);
    }

    #[test]
    fn test_logging_level() {
        let mut logging = LoggingConfig::default();
        logging.level = "DEBUG".to_string();
        assert!(logging.is_valid());
        logging.level = "chatty".to_string();
        assert!(!logging.is_valid());
    }
}
