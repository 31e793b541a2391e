//! Integration tests for configuration loading and validation.

use carebook::config::{
    generate_example_config, generate_json_schema, load_config_file, AppConfig, CliOverrides,
    Validatable,
};
use carebook::CarebookError;
use std::path::PathBuf;

#[test]
fn test_example_config_is_valid_yaml() {
    let example = generate_example_config();
    let body: String = example
        .lines()
        .filter(|l| !l.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");
    let parsed: AppConfig = serde_yaml::from_str(&body).unwrap();
    assert_eq!(parsed, AppConfig::default());
    assert!(parsed.is_valid());
}

#[test]
fn test_partial_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".carebook.yaml");
    std::fs::write(&path, "ui:\n  theme: light\n").unwrap();

    let config = load_config_file(&path).unwrap();
    assert_eq!(config.ui.theme, "light");
    assert_eq!(config.security, AppConfig::default().security);
}

#[test]
fn test_overrides_win_over_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".carebook.yaml");
    std::fs::write(&path, "store:\n  path: /srv/file.json\nlogging:\n  level: warn\n").unwrap();

    let overrides = CliOverrides {
        store: Some(PathBuf::from("/tmp/cli.json")),
        log_file: None,
        verbose: true,
    };
    let (config, loaded_from) = AppConfig::from_file_with_overrides(Some(&path), &overrides);

    assert_eq!(loaded_from.as_deref(), Some(path.as_path()));
    assert_eq!(config.store_path(), PathBuf::from("/tmp/cli.json"));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_invalid_values_reported_together() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".carebook.yaml");
    std::fs::write(
        &path,
        "ui:\n  theme: neon\nsecurity:\n  salt_length: 2\nlogging:\n  level: loud\n",
    )
    .unwrap();

    let errors = load_config_file(&path).unwrap().validate();
    let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["ui.theme", "security.salt_length", "logging.level"]);
}

#[test]
fn test_ensure_valid_lists_every_problem() {
    let mut config = AppConfig::default();
    assert!(config.ensure_valid().is_ok());

    config.ui.theme = "neon".to_string();
    config.logging.level = "loud".to_string();
    match config.ensure_valid() {
        Err(CarebookError::Config(message)) => {
            assert!(message.contains("ui.theme"), "{message}");
            assert!(message.contains("logging.level"), "{message}");
        }
        other => panic!("Expected Config error, got {other:?}"),
    }
}

#[test]
fn test_schema_names_sections() {
    let schema = generate_json_schema();
    for section in ["store", "ui", "security", "logging"] {
        assert!(schema.contains(&format!("\"{section}\"")), "missing {section}");
    }
}
