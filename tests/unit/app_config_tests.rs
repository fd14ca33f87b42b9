/*!
 * Tests for application configuration
 */

use anyhow::Result;
use std::path::PathBuf;
use srt_to_docx::app_config::{Config, LogLevel};
use crate::common;

/// Test that the bundled template ships with the crate
#[test]
fn test_default_config_shouldPointAtBundledTemplate() {
    let config = Config::default();

    assert!(config.resolved_template_path().is_file());
    assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Info);
}

/// Test that a full config file round-trips through JSON
#[test]
fn test_config_withAllFields_shouldRoundTripThroughJson() -> Result<()> {
    let config = Config {
        source_extension: "srt".to_string(),
        output_extension: "docx".to_string(),
        template_path: Some(PathBuf::from("/opt/templates/custom.docx")),
        max_concurrent_tasks: Some(8),
        log_level: LogLevel::Warn,
    };
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", &serde_json::to_string_pretty(&config)?)?;

    let loaded = Config::load(&path)?;

    assert_eq!(loaded, config);
    assert!(loaded.validate().is_ok());
    assert_eq!(loaded.resolved_template_path(), PathBuf::from("/opt/templates/custom.docx"));

    Ok(())
}

/// Test that an unknown log level is a load error rather than a silent default
#[test]
fn test_load_withUnknownLogLevel_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", r#"{"log_level": "loud"}"#)?;

    assert!(Config::load(&path).is_err());

    Ok(())
}

/// Test that path separators in extensions are rejected
#[test]
fn test_validate_withSeparatorInExtension_shouldFail() {
    let config = Config {
        output_extension: "out/docx".to_string(),
        ..Config::default()
    };

    let message = config.validate().unwrap_err().to_string();

    assert!(message.contains("output_extension"));
}

/// Test that an empty extension is rejected
#[test]
fn test_validate_withEmptyExtension_shouldFail() {
    let config = Config {
        source_extension: String::new(),
        ..Config::default()
    };

    assert!(config.validate().is_err());
}
