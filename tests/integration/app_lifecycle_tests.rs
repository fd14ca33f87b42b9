/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use std::fs;
use srt_to_docx::app_config::Config;
use srt_to_docx::app_controller::{Controller, InputMode, RunReport};
use srt_to_docx::errors::{AppError, ConversionError, FailureKind};
use crate::common;

fn controller() -> Result<Controller> {
    Ok(Controller::with_config(Config::default())?.with_progress(false))
}

/// Test the controller initialization with default config
#[test]
fn test_controller_initialization_withDefaultConfig_shouldSucceed() -> Result<()> {
    let controller = controller()?;

    assert_eq!(controller.config(), &Config::default());

    Ok(())
}

/// Test that an invalid configuration is refused up front
#[test]
fn test_controller_withInvalidConfig_shouldFail() {
    let config = Config {
        max_concurrent_tasks: Some(0),
        ..Config::default()
    };

    assert!(matches!(Controller::with_config(config), Err(AppError::Config(_))));
}

/// Test input classification for files and directories
#[test]
fn test_resolve_input_withFileAndDirectory_shouldPickMode() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let subtitle = common::create_test_subtitle(temp_dir.path(), "a.srt")?;
    let controller = controller()?;

    assert_eq!(controller.resolve_input(Some(subtitle.clone()))?, InputMode::SingleFile(subtitle));
    assert_eq!(
        controller.resolve_input(Some(temp_dir.path().to_path_buf()))?,
        InputMode::Folder(temp_dir.path().to_path_buf())
    );
    assert!(matches!(controller.resolve_input(None)?, InputMode::Folder(_)));

    Ok(())
}

/// Scenario: single file whose destination cannot be written
#[tokio::test]
async fn test_single_file_withBlockedDestination_shouldFailWithoutSummary() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let subtitle = common::create_test_subtitle(temp_dir.path(), "locked.srt")?;
    fs::create_dir(temp_dir.path().join("locked.docx"))?;

    let result = controller()?.run(Some(subtitle.clone())).await;

    match result {
        Err(AppError::Conversion { path, source }) => {
            assert_eq!(path, subtitle);
            assert!(matches!(source, ConversionError::Persist(_)));
        }
        other => panic!("expected a conversion failure, got {:?}", other),
    }

    Ok(())
}

/// Single file mode converts exactly the given file
#[tokio::test]
async fn test_single_file_withValidSubtitle_shouldWriteDocument() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let subtitle = common::create_test_subtitle(temp_dir.path(), "one.srt")?;
    common::create_test_subtitle(temp_dir.path(), "other.srt")?;

    let report = controller()?.run(Some(subtitle)).await?;

    assert!(report.report_lines("srt").is_empty());
    match report {
        RunReport::Single(outcome) => {
            assert!(outcome.succeeded());
            assert_eq!(outcome.output_path, temp_dir.path().join("one.docx"));
        }
        other => panic!("expected a single-file report, got {:?}", other),
    }
    assert!(temp_dir.path().join("one.docx").is_file());
    assert!(!temp_dir.path().join("other.docx").exists());

    Ok(())
}

/// Single file mode surfaces a parse failure as fatal
#[tokio::test]
async fn test_single_file_withMalformedSubtitle_shouldFailAsParse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let subtitle = common::create_test_file(temp_dir.path(), "broken.srt", "x\n")?;

    let error = controller()?.run(Some(subtitle)).await.unwrap_err();

    match error {
        AppError::Conversion { source, .. } => assert_eq!(source.kind(), FailureKind::Parse),
        other => panic!("expected a conversion failure, got {:?}", other),
    }
    assert!(!temp_dir.path().join("broken.docx").exists());

    Ok(())
}

/// Scenario: missing input path
#[test]
fn test_run_withMissingPath_shouldReportPathNotFound() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let missing = temp_dir.path().join("missing.srt");
    let controller = controller()?;

    let error = tokio_test::block_on(controller.run(Some(missing.clone()))).unwrap_err();

    assert!(matches!(&error, AppError::PathNotFound(path) if *path == missing));
    assert!(error.to_string().contains("does not exist"));

    Ok(())
}

/// Scenario: a file without the subtitle suffix is rejected before parsing
#[tokio::test]
async fn test_run_withWrongExtension_shouldReportInvalidExtension() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let notes = common::create_test_file(temp_dir.path(), "notes.txt", "not subtitles")?;

    let error = controller()?.run(Some(notes)).await.unwrap_err();

    assert!(matches!(error, AppError::InvalidExtension { .. }));
    assert_eq!(fs::read_dir(temp_dir.path())?.count(), 1);

    Ok(())
}

/// A directory without subtitles is reported, not treated as a failure
#[tokio::test]
async fn test_run_withEmptyDirectory_shouldReportNothingFound() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "readme.md", "nothing here")?;

    let report = controller()?.run(Some(temp_dir.path().to_path_buf())).await?;

    assert!(matches!(report, RunReport::NothingFound(_)));
    assert_eq!(report.report_lines("srt"), vec!["No .srt files found in the directory.".to_string()]);

    Ok(())
}

/// An unreadable template stops the run before any conversion
#[tokio::test]
async fn test_run_withMissingTemplate_shouldFailBeforeConverting() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_subtitle(temp_dir.path(), "a.srt")?;
    let config = Config {
        template_path: Some(temp_dir.path().join("absent.docx")),
        ..Config::default()
    };

    let error = Controller::with_config(config)?
        .with_progress(false)
        .run(Some(temp_dir.path().to_path_buf()))
        .await
        .unwrap_err();

    assert!(matches!(error, AppError::Template { .. }));
    assert!(!temp_dir.path().join("a.docx").exists());

    Ok(())
}
