//! Config file loading tests.
//!
//! Defaults for omitted limits, unknown field rejection and validation of
//! a loaded file.

use palloc_common::config::{ConfigError, ConfigLoader, LogLevel, PallocConfig};
use palloc_common::consts::{DEFAULT_MAX_GROUPS, MAX_LINE_LEN};
use std::fs;
use tempfile::TempDir;

fn load(content: &str) -> Result<PallocConfig, ConfigError> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("palloc.toml");
    fs::write(&path, content).unwrap();
    PallocConfig::load(&path)
}

#[test]
fn test_minimal_config_uses_defaults() {
    let config = load(
        r#"
[shared]
service_name = "palloc"

[registry]
bins = 32
"#,
    )
    .unwrap();

    assert_eq!(config.shared.log_level, LogLevel::Info);
    assert_eq!(config.registry.bins.get(), 32);
    assert_eq!(config.registry.max_groups, DEFAULT_MAX_GROUPS);
    assert_eq!(config.registry.max_write_len, MAX_LINE_LEN);
    assert!(config.groups.is_empty());
    config.validate().unwrap();
}

#[test]
fn test_unknown_registry_field_rejected() {
    let result = load(
        r#"
[shared]
service_name = "palloc"

[registry]
bins = 32
colours = 32
"#,
    );
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn test_unknown_group_field_rejected() {
    let result = load(
        r#"
[shared]
service_name = "palloc"

[registry]
bins = 32

[[groups]]
name = "rt"
cpus = "0-3"
"#,
    );
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn test_zero_bins_rejected_at_load() {
    let result = load(
        r#"
[shared]
service_name = "palloc"

[registry]
bins = 0
"#,
    );
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn test_loaded_limits_validated() {
    let config = load(
        r#"
[shared]
service_name = "palloc"

[registry]
bins = 32
max_groups = 1

[[groups]]
name = "rt"

[[groups]]
name = "batch"
"#,
    )
    .unwrap();

    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError(_))
    ));
}
