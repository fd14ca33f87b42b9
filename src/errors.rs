/*!
 * Error types for the srt-to-docx application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while parsing SRT content
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The source bytes are not valid UTF-8
    #[error("Subtitle file is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),

    /// A block does not start with a numeric sequence index
    #[error("Line {line}: expected subtitle index, found '{found}'")]
    InvalidIndex {
        /// 1-based line number
        line: usize,
        /// Offending line content
        found: String,
    },

    /// The line after the index is not a `start --> end` timestamp line
    #[error("Line {line}: malformed timestamp line '{found}'")]
    InvalidTimestamp {
        /// 1-based line number
        line: usize,
        /// Offending line content
        found: String,
    },

    /// The content ended right after a sequence index
    #[error("Line {line}: unexpected end of input after subtitle index")]
    UnexpectedEof {
        /// 1-based line number of the dangling index
        line: usize,
    },
}

/// Errors that can occur while rendering a document from a template
#[derive(Error, Debug)]
pub enum RenderError {
    /// The template blob is not a readable zip archive
    #[error("Template is not a valid document archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// A part every document template must contain is absent
    #[error("Template is missing required part '{0}'")]
    MissingPart(String),

    /// A rendered XML part is not UTF-8
    #[error("Template part '{0}' is not valid UTF-8")]
    Encoding(String),

    /// Malformed or unsupported template statement
    #[error("Template syntax error: {0}")]
    Syntax(String),

    /// A placeholder names something the context does not provide
    #[error("Placeholder '{0}' cannot be resolved against the conversion context")]
    Unresolved(String),

    /// The subtitle sequence failed while being iterated
    #[error("Subtitle source error: {0}")]
    Source(#[from] SubtitleError),

    /// Writing the output archive failed
    #[error("Failed to assemble rendered document: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while writing a rendered document
#[derive(Error, Debug)]
pub enum PersistError {
    /// The destination cannot be opened for writing
    #[error("Permission denied: cannot write '{}'", path.display())]
    PermissionDenied {
        /// Destination path
        path: PathBuf,
    },

    /// Any other write failure
    #[error("Failed to write '{}': {source}", path.display())]
    Io {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl PersistError {
    /// Classify an I/O failure on `path`
    pub fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Errors that end a single conversion task
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The source file could not be read
    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        /// Source path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Malformed subtitle input
    #[error("Parse error: {0}")]
    Parse(#[from] SubtitleError),

    /// Template/context mismatch
    #[error("Render error: {0}")]
    Render(RenderError),

    /// Destination could not be written
    #[error("Persist error: {0}")]
    Persist(#[from] PersistError),

    /// The task panicked or was lost before reaching a terminal state
    #[error("Conversion task aborted: {0}")]
    Aborted(String),
}

impl From<RenderError> for ConversionError {
    fn from(error: RenderError) -> Self {
        // The subtitle sequence is lazy, so parse failures surface while rendering.
        match error {
            RenderError::Source(source) => Self::Parse(source),
            other => Self::Render(other),
        }
    }
}

impl ConversionError {
    /// Coarse classification used for reporting and aggregation
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Read { .. } => FailureKind::Read,
            Self::Parse(_) => FailureKind::Parse,
            Self::Render(_) => FailureKind::Render,
            Self::Persist(PersistError::PermissionDenied { .. }) => FailureKind::PermissionDenied,
            Self::Persist(PersistError::Io { .. }) => FailureKind::Persist,
            Self::Aborted(_) => FailureKind::Aborted,
        }
    }
}

/// Kind of failure recorded on a conversion outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FailureKind {
    Read,
    Parse,
    Render,
    PermissionDenied,
    Persist,
    Aborted,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Read => "read error",
            Self::Parse => "parse error",
            Self::Render => "render error",
            Self::PermissionDenied => "permission denied",
            Self::Persist => "write error",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Main application error type for top-level, fatal failures
#[derive(Error, Debug)]
pub enum AppError {
    /// The input path does not exist
    #[error("Path '{}' does not exist.", .0.display())]
    PathNotFound(PathBuf),

    /// An explicit file argument lacks the source suffix
    #[error("'{}' is not an .{extension} file.", path.display())]
    InvalidExtension {
        /// Offending path
        path: PathBuf,
        /// Expected extension, without the dot
        extension: String,
    },

    /// The input exists but is neither a regular file nor a directory
    #[error("'{}' is neither a file nor a directory.", .0.display())]
    UnsupportedPath(PathBuf),

    /// The document template could not be loaded
    #[error("Failed to load document template '{}': {source}", path.display())]
    Template {
        /// Template path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Single-file conversion failed
    #[error("Failed to convert '{}': {source}", path.display())]
    Conversion {
        /// Source path
        path: PathBuf,
        /// Task failure
        #[source]
        source: ConversionError,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Config(format!("{:#}", error))
    }
}
