/*!
 * Per-file conversion task.
 *
 * One task walks a single source file through
 * `Pending -> Parsing -> Normalizing -> Rendering -> Persisting` and ends in
 * `Succeeded` or `Failed(kind)`. The first failing stage ends the task; there
 * are no retries. Parsing is lazy, so malformed input is usually detected while
 * rendering and still reported as a parse failure.
 */

use log::{debug, error, info};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::conversion::normalize::normalize;
use crate::conversion::persist::persist;
use crate::conversion::render::{render_document, TemplateBlob};
use crate::conversion::template::ConversionContext;
use crate::errors::{ConversionError, FailureKind};
use crate::file_utils::FileManager;
use crate::subtitle_processor::SrtParser;

/// Lifecycle of a conversion task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStage {
    Pending,
    Parsing,
    Normalizing,
    Rendering,
    Persisting,
    Succeeded,
    Failed(FailureKind),
}

impl TaskStage {
    /// Whether the task has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed(_))
    }
}

impl fmt::Display for TaskStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Parsing => write!(f, "parsing"),
            Self::Normalizing => write!(f, "normalizing"),
            Self::Rendering => write!(f, "rendering"),
            Self::Persisting => write!(f, "persisting"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed(kind) => write!(f, "failed ({})", kind),
        }
    }
}

/// Result of one conversion task
#[derive(Debug)]
pub struct ConversionOutcome {
    /// Subtitle file that was converted
    pub source_path: PathBuf,
    /// Document the task wrote, or tried to write
    pub output_path: PathBuf,
    /// Why the task failed, if it did
    pub error: Option<ConversionError>,
}

impl ConversionOutcome {
    /// True when the document was written
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    /// Failure classification, `None` on success
    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.error.as_ref().map(ConversionError::kind)
    }
}

/// A single file's conversion
#[derive(Debug)]
pub struct ConversionTask {
    source_path: PathBuf,
    output_path: PathBuf,
    template: TemplateBlob,
    stage: TaskStage,
}

impl ConversionTask {
    /// Prepare a task writing `<stem>.<output_extension>` next to the source
    pub fn new(source_path: PathBuf, output_extension: &str, template: TemplateBlob) -> Self {
        let output_path = FileManager::output_path(&source_path, output_extension);
        Self {
            source_path,
            output_path,
            template,
            stage: TaskStage::Pending,
        }
    }

    /// Current stage
    pub fn stage(&self) -> TaskStage {
        self.stage
    }

    /// Destination of the rendered document
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Run the task to a terminal stage
    pub async fn run(mut self) -> ConversionOutcome {
        let result = self.execute().await;

        let source_name = display_name(&self.source_path);
        let output_name = display_name(&self.output_path);
        let error = match result {
            Ok(()) => {
                self.advance(TaskStage::Succeeded);
                info!("✓ Converted: {} -> {}", source_name, output_name);
                None
            }
            Err(e) => {
                self.advance(TaskStage::Failed(e.kind()));
                error!("{}", failure_message(&e, &source_name, &output_name));
                Some(e)
            }
        };

        ConversionOutcome {
            source_path: self.source_path,
            output_path: self.output_path,
            error,
        }
    }

    async fn execute(&mut self) -> Result<(), ConversionError> {
        self.advance(TaskStage::Parsing);
        let bytes = tokio::fs::read(&self.source_path)
            .await
            .map_err(|source| ConversionError::Read {
                path: self.source_path.clone(),
                source,
            })?;
        let parser = SrtParser::from_bytes(bytes)?;

        self.advance(TaskStage::Normalizing);
        let context = ConversionContext::new(FileManager::file_identifier(&self.source_path), normalize(parser));

        self.advance(TaskStage::Rendering);
        let template = self.template.clone();
        let document = tokio::task::spawn_blocking(move || render_document(&template, context))
            .await
            .map_err(|e| ConversionError::Aborted(e.to_string()))??;

        self.advance(TaskStage::Persisting);
        persist(&document, &self.output_path).await?;

        Ok(())
    }

    fn advance(&mut self, stage: TaskStage) {
        debug!("{}: {} -> {}", self.source_path.display(), self.stage, stage);
        self.stage = stage;
    }
}

// User-facing line for a failed task
fn failure_message(error: &ConversionError, source_name: &str, output_name: &str) -> String {
    match error.kind() {
        FailureKind::PermissionDenied => format!(
            "✗ Permission denied: Cannot save '{}'. Please close the file if it's open and try again.",
            output_name
        ),
        _ => format!("✗ Failed to convert {}: {}", source_name, error),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
