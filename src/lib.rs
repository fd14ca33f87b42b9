/*!
 * # srt-to-docx - Batch subtitle to Word document converter
 *
 * A Rust library that turns SubRip (`.srt`) subtitle files into Word
 * (`.docx`) documents by filling a document template.
 *
 * ## Features
 *
 * - Convert a single subtitle file, or every subtitle file below a directory
 * - Lazy, single-pass SRT parsing
 * - Display normalization: timing truncated to whole seconds, leading whitespace trimmed
 * - Template placeholders for the file name and a loop over subtitle entries
 * - Concurrent batch conversion with a summary of successes and failures
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: SRT parsing
 * - `conversion`: The conversion pipeline:
 *   - `conversion::normalize`: Display normalization of entries
 *   - `conversion::template`: Template placeholder language
 *   - `conversion::render`: Document rendering from a shared template
 *   - `conversion::persist`: Writing documents to disk
 *   - `conversion::pipeline`: Per-file conversion task
 *   - `conversion::scheduler`: Concurrent execution and joining
 *   - `conversion::summary`: Batch result aggregation
 * - `file_utils`: File system operations and discovery
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod conversion;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, InputMode, RunReport};
pub use subtitle_processor::{SrtParser, SubtitleEntry};
pub use conversion::{BatchSummary, ConversionOutcome, Scheduler, TemplateBlob};
pub use errors::{AppError, ConversionError, FailureKind, PersistError, RenderError, SubtitleError};
