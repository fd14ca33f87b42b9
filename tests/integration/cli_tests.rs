/*!
 * Command line behavior and exit codes of the srt-to-docx binary
 */

use anyhow::Result;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use crate::common;

// Runs the binary inside `dir` with logging reduced to errors
fn run_cli(dir: &Path, args: &[&str]) -> Result<Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_srt-to-docx"))
        .current_dir(dir)
        .args(["--config-path", "absent-conf.json", "--log-level", "error"])
        .args(args)
        .output()?)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// A directory argument converts everything and prints the summary
#[test]
fn test_cli_withDirectory_shouldPrintSummaryAndSucceed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    for name in ["a.srt", "b.srt", "c.srt"] {
        common::create_test_subtitle(temp_dir.path(), name)?;
    }

    let output = run_cli(temp_dir.path(), &["."])?;

    assert!(output.status.success());
    assert!(stdout(&output).contains("Completed: 3 successful, 0 failed"));
    assert!(temp_dir.path().join("b.docx").is_file());

    Ok(())
}

/// Without a path the working directory is the batch root
#[test]
fn test_cli_withoutPath_shouldUseWorkingDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_subtitle(temp_dir.path(), "only.srt")?;

    let output = run_cli(temp_dir.path(), &[])?;

    assert!(output.status.success());
    assert!(temp_dir.path().join("only.docx").is_file());

    Ok(())
}

/// Per-file failures in a batch still exit with success
#[test]
fn test_cli_withBlockedDestination_shouldStillExitZero() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    for name in ["a.srt", "b.srt", "c.srt"] {
        common::create_test_subtitle(temp_dir.path(), name)?;
    }
    fs::create_dir(temp_dir.path().join("a.docx"))?;

    let output = run_cli(temp_dir.path(), &[])?;
    let printed = stdout(&output);

    assert!(output.status.success());
    assert!(printed.contains("Completed: 2 successful, 1 failed"));
    assert!(printed.contains("Some files could not be converted due to permission errors."));

    Ok(())
}

/// A single-file failure is fatal and prints no summary
#[test]
fn test_cli_withBlockedSingleFile_shouldExitNonZero() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_subtitle(temp_dir.path(), "a.srt")?;
    fs::create_dir(temp_dir.path().join("a.docx"))?;

    let output = run_cli(temp_dir.path(), &["a.srt"])?;

    assert!(!output.status.success());
    assert!(!stdout(&output).contains("Completed:"));

    Ok(())
}

/// A missing path exits non-zero and names the path
#[test]
fn test_cli_withMissingPath_shouldExitNonZero() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let output = run_cli(temp_dir.path(), &["ghost.srt"])?;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Path 'ghost.srt' does not exist."));

    Ok(())
}

/// A file without the subtitle suffix is refused
#[test]
fn test_cli_withWrongExtension_shouldExitNonZero() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "movie.txt", "1\n00:00:01,000 --> 00:00:02,000\nHi\n")?;

    let output = run_cli(temp_dir.path(), &["movie.txt"])?;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("is not an .srt file."));
    assert!(!temp_dir.path().join("movie.docx").exists());

    Ok(())
}

/// An empty batch root is not an error
#[test]
fn test_cli_withNoSubtitles_shouldReportAndSucceed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let output = run_cli(temp_dir.path(), &[])?;

    assert!(output.status.success());
    assert!(stdout(&output).contains("No .srt files found in the directory."));

    Ok(())
}

/// More than one positional path is a usage error
#[test]
fn test_cli_withTwoPaths_shouldRejectUsage() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_subtitle(temp_dir.path(), "a.srt")?;
    common::create_test_subtitle(temp_dir.path(), "b.srt")?;

    let output = run_cli(temp_dir.path(), &["a.srt", "b.srt"])?;

    assert!(!output.status.success());
    assert!(!temp_dir.path().join("a.docx").exists());

    Ok(())
}

/// Shell completions are printed without touching any file
#[test]
fn test_cli_completions_shouldPrintScript() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let output = Command::new(env!("CARGO_BIN_EXE_srt-to-docx"))
        .current_dir(temp_dir.path())
        .args(["completions", "bash"])
        .output()?;

    assert!(output.status.success());
    assert!(stdout(&output).contains("srt-to-docx"));

    Ok(())
}
