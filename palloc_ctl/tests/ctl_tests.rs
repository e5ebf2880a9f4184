//! Control tool tests: config file to applied groups.

use palloc_common::config::{ConfigLoader, PallocConfig};
use palloc_ctl::{ControlSession, CtlError};
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const CONFIG: &str = r#"
[shared]
service_name = "palloc-ctl-test"

[registry]
bins = 64

[[groups]]
name = "rt"
bins = "3,0-2,16-19"

[[groups]]
name = "batch"
bins = "32-63:8/16"

[[groups]]
name = "idle"
"#;

fn write_config(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("palloc.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_session_applies_configured_groups() {
    let dir = TempDir::new().unwrap();
    let config = PallocConfig::load(&write_config(dir.path(), CONFIG)).unwrap();
    let session = ControlSession::from_config(&config).unwrap();

    assert_eq!(session.registry().len(), 3);
    assert_eq!(
        session.report().unwrap(),
        vec![
            "rt: 0-3,16-19".to_string(),
            "batch: 32-39,48-55".to_string(),
            "idle: ".to_string(),
        ]
    );

    let rt = session.group("rt").unwrap();
    let view = session.registry().bins_for(rt).unwrap();
    assert!(view.contains(16) && !view.contains(4));
}

#[test]
fn test_bad_configured_bins_fail_with_erange() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        dir.path(),
        r#"
[shared]
service_name = "palloc-ctl-test"

[registry]
bins = 16

[[groups]]
name = "rt"
bins = "0-16"
"#,
    );
    let config = PallocConfig::load(&path).unwrap();
    let err = ControlSession::from_config(&config).unwrap_err();

    assert!(matches!(err, CtlError::Group { ref name, .. } if name == "rt"));
    assert_eq!(err.errno(), -libc::ERANGE);
}

#[test]
fn test_duplicate_group_names_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        dir.path(),
        r#"
[shared]
service_name = "palloc-ctl-test"

[registry]
bins = 16

[[groups]]
name = "rt"

[[groups]]
name = "rt"
"#,
    );
    let config = PallocConfig::load(&path).unwrap();
    assert!(matches!(
        ControlSession::from_config(&config),
        Err(CtlError::Config(_))
    ));
}

#[test]
fn test_binary_prints_groups_with_overrides() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), CONFIG);

    let output = Command::new(env!("CARGO_BIN_EXE_palloc_ctl"))
        .arg("--config")
        .arg(&path)
        .args(["--set", "idle=63", "--set", "extra=1-2,4"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout.lines().collect::<Vec<_>>(),
        vec!["rt: 0-3,16-19", "batch: 32-39,48-55", "idle: 63", "extra: 1-2,4"]
    );
}

#[test]
fn test_binary_fails_on_invalid_override() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), CONFIG);

    let output = Command::new(env!("CARGO_BIN_EXE_palloc_ctl"))
        .arg("--config")
        .arg(&path)
        .args(["--set", "rt=5-1"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_binary_fails_on_missing_config() {
    let dir = TempDir::new().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_palloc_ctl"))
        .arg("--config")
        .arg(dir.path().join("missing.toml"))
        .output()
        .unwrap();

    assert!(!output.status.success());
}
