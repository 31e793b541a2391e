//! Configuration module for carebook.
//!
//! This module provides:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Configuration File
//!
//! Place a `.carebook.yaml` file in the working directory or
//! `~/.config/carebook/`:
//!
//! ```yaml
//! store:
//!   path: /srv/carebook/records.json
//! ui:
//!   theme: high-contrast
//! security:
//!   min_password_length: 10
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    default_store_path, DEFAULT_MIN_HEIGHT, DEFAULT_MIN_PASSWORD_LENGTH, DEFAULT_MIN_WIDTH,
    DEFAULT_SALT_LENGTH, DEFAULT_TICK_RATE_MS,
};
pub use types::{AppConfig, LoggingConfig, SecurityConfig, StoreConfig, UiConfig, UiPreferences};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    CliOverrides, ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).expect("schema serialization should not fail")
}
