//! Integration tests for fsitem-config
//!
//! These tests verify the layered config loading with real files.

use fsitem_config::{Config, LoggingConfig};
use tempfile::tempdir;

#[test]
fn test_load_global_config_from_file() {
    let temp = tempdir().unwrap();
    let global = temp.path().join("global.toml");
    std::fs::write(
        &global,
        r#"
[sidecar]
enabled = false
extension = ".meta.json"

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = Config::load_from(Some(&global), None).unwrap();
    assert!(!config.sidecar.enabled);
    assert_eq!(config.sidecar.extension, ".meta.json");
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_project_overrides_only_what_it_sets() {
    let temp = tempdir().unwrap();
    let global = temp.path().join("global.toml");
    let project = temp.path().join("project.toml");

    std::fs::write(
        &global,
        r#"
[sidecar]
enabled = false
extension = ".g"

[logging]
level = "info"
"#,
    )
    .unwrap();
    std::fs::write(
        &project,
        r#"
[sidecar]
extension = ".p"
"#,
    )
    .unwrap();

    let config = Config::load_from(Some(&global), Some(&project)).unwrap();
    assert_eq!(config.sidecar.extension, ".p");
    assert!(!config.sidecar.enabled, "global value must survive");
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_missing_files_yield_defaults() {
    let temp = tempdir().unwrap();
    let config = Config::load_from(
        Some(&temp.path().join("nope.toml")),
        Some(&temp.path().join("also-nope.toml")),
    )
    .unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_sections_default_the_rest() {
    let temp = tempdir().unwrap();
    let global = temp.path().join("global.toml");
    std::fs::write(&global, "[logging]\nlevel = \"trace\"\n").unwrap();

    let config = Config::load_from(Some(&global), None).unwrap();
    assert!(config.sidecar.enabled);
    assert_eq!(config.sidecar.extension, "._meta");
    assert_eq!(
        config.logging,
        LoggingConfig {
            level: "trace".to_string()
        }
    );
}

#[test]
fn test_invalid_toml_is_an_error() {
    let temp = tempdir().unwrap();
    let global = temp.path().join("global.toml");
    std::fs::write(&global, "[sidecar\nenabled = ").unwrap();

    let err = Config::load_from(Some(&global), None).unwrap_err();
    assert!(err.to_string().contains("TOML parse error"));
}
