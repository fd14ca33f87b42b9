/*!
 * Common test utilities for the srt-to-docx test suite
 */

use anyhow::Result;
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Sample subtitle content with three entries
pub const SAMPLE_SRT: &str = r#"1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,500 --> 00:00:09,900
   It contains multiple entries.

3
00:01:10,000 --> 00:01:14,000
For testing purposes.
"#;

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_SRT)
}

/// Builds a DOCX-shaped template archive around the given body
pub fn build_template(document_xml: &str) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer.start_file("[Content_Types].xml", options)?;
    writer.write_all(b"<Types/>")?;
    writer.start_file("word/document.xml", options)?;
    writer.write_all(document_xml.as_bytes())?;
    Ok(writer.finish()?.into_inner())
}

/// Writes a template to `dir` and returns its path
pub fn create_test_template(dir: &Path, document_xml: &str) -> Result<PathBuf> {
    let path = dir.join("template.docx");
    fs::write(&path, build_template(document_xml)?)?;
    Ok(path)
}

/// Reads a part of a generated document as text
pub fn read_document_part(path: &Path, name: &str) -> Result<String> {
    let bytes = fs::read(path)?;
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut part = archive.by_name(name)?;
    let mut text = String::new();
    part.read_to_string(&mut text)?;
    Ok(text)
}
