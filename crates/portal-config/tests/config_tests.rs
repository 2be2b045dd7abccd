// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the portal configuration system.

use portal_config::diagnostic::ConfigError;
use portal_config::model::PortalConfig;
use portal_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_portal_config() {
    let toml = r#"
[api]
base_url = "https://portal.example.com"
timeout_secs = 10

[logging]
level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.api.base_url, "https://portal.example.com");
    assert_eq!(config.api.timeout_secs, 10);
    assert_eq!(config.api.timeout(), std::time::Duration::from_secs(10));
    assert_eq!(config.logging.level, "debug");
}

/// An empty file falls back to the local development backend.
#[test]
fn missing_sections_use_defaults() {
    let config = load_and_validate_str("").expect("empty config is valid");
    assert_eq!(config.api.base_url, "http://localhost:8000");
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.logging.level, "info");
}

/// Env overrides are merged after file values.
#[test]
fn later_layer_overrides_base_url() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let config: PortalConfig = Figment::new()
        .merge(Serialized::defaults(PortalConfig::default()))
        .merge(Toml::string("[api]\nbase_url = \"http://from-toml:8000\"\n"))
        .merge(("api.base_url", "http://from-env:9000"))
        .extract()
        .expect("should merge override");

    assert_eq!(config.api.base_url, "http://from-env:9000");
}

#[test]
fn unknown_key_suggests_correction() {
    let toml = r#"
[api]
base_ulr = "http://localhost:8000"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key,
            suggestion,
            valid_keys,
            ..
        } => {
            assert_eq!(key, "base_ulr");
            assert_eq!(suggestion.as_deref(), Some("base_url"));
            assert!(valid_keys.contains("timeout_secs"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_top_level_section_is_rejected() {
    let errors = load_and_validate_str("[backend]\nurl = \"x\"\n").expect_err("should reject");
    assert!(matches!(errors[0], ConfigError::UnknownKey { .. }));
}

#[test]
fn wrong_type_is_reported() {
    let errors =
        load_and_validate_str("[api]\ntimeout_secs = \"soon\"\n").expect_err("should reject");
    match &errors[0] {
        ConfigError::InvalidType { key, .. } => assert_eq!(key, "api.timeout_secs"),
        other => panic!("expected InvalidType, got {other:?}"),
    }
}

#[test]
fn semantic_validation_runs_after_parse() {
    let errors = load_and_validate_str("[api]\nbase_url = \"ftp://files\"\ntimeout_secs = 0\n")
        .expect_err("should fail validation");
    assert_eq!(errors.len(), 2);
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ConfigError::Validation { .. }))
    );
}

#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let errors = load_and_validate_str("[logging]\nlevle = \"info\"\n").expect_err("should reject");
    let diagnostic: &dyn Diagnostic = &errors[0];
    assert_eq!(
        diagnostic.code().map(|c| c.to_string()).as_deref(),
        Some("portal::config::unknown_key")
    );

    let mut out = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut out, diagnostic)
        .expect("render should succeed");
    assert!(out.contains("level"), "help should list the valid key: {out}");
}

#[test]
fn serialized_defaults_round_trip_through_toml() {
    let rendered = toml::to_string(&PortalConfig::default()).expect("serialize defaults");
    let parsed = load_config_from_str(&rendered).expect("re-parse defaults");
    assert_eq!(parsed.api.base_url, "http://localhost:8000");
    assert_eq!(parsed.logging.level, "info");
}

#[test]
fn config_file_on_disk_is_loaded() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    writeln!(file, "[api]\nbase_url = \"https://staging.example.com/\"\ntimeout_secs = 5")
        .expect("write temp file");

    let config =
        portal_config::load_config_from_path(file.path()).expect("file config should load");
    assert_eq!(config.api.base_url, "https://staging.example.com/");
    assert_eq!(config.api.timeout_secs, 5);
    assert_eq!(config.logging.level, "info");
}
