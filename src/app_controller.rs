use log::{debug, info, warn};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use crate::app_config::Config;
use crate::conversion::{BatchSummary, ConversionOutcome, Scheduler, TemplateBlob};
use crate::errors::AppError;
use crate::file_utils::FileManager;

// @module: Application controller for subtitle conversion

/// How an input path is processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    /// Convert exactly this file; failure is fatal
    SingleFile(PathBuf),
    /// Convert every matching file below this directory; failures are reported
    Folder(PathBuf),
}

/// What a completed run produced
#[derive(Debug)]
pub enum RunReport {
    /// Single-file mode succeeded
    Single(ConversionOutcome),
    /// A batch ran to completion
    Batch(BatchSummary),
    /// A batch root without any subtitle file
    NothingFound(PathBuf),
}

impl RunReport {
    /// Lines for the user once the run is over
    pub fn report_lines(&self, source_extension: &str) -> Vec<String> {
        match self {
            RunReport::Single(_) => Vec::new(),
            RunReport::Batch(summary) => summary.report_lines(),
            RunReport::NothingFound(_) => vec![format!("No .{} files found in the directory.", source_extension)],
        }
    }
}

/// Main application controller for subtitle conversion
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Show a progress bar in folder mode
    show_progress: bool,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate()?;
        Ok(Self {
            config,
            show_progress: true,
        })
    }

    /// Enable or disable the folder progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Decide how to handle the input; the working directory is used when none is given
    pub fn resolve_input(&self, input: Option<PathBuf>) -> Result<InputMode, AppError> {
        let path = match input {
            Some(path) => path,
            None => std::env::current_dir().map_err(|_| AppError::PathNotFound(PathBuf::from(".")))?,
        };

        if !path.exists() {
            return Err(AppError::PathNotFound(path));
        }
        if FileManager::file_exists(&path) {
            if FileManager::has_suffix(&path, &self.config.source_suffix()) {
                return Ok(InputMode::SingleFile(path));
            }
            return Err(AppError::InvalidExtension {
                path,
                extension: self.config.source_extension.clone(),
            });
        }
        if FileManager::dir_exists(&path) {
            return Ok(InputMode::Folder(path));
        }
        Err(AppError::UnsupportedPath(path))
    }

    /// Run the whole workflow for an optional input path
    pub async fn run(&self, input: Option<PathBuf>) -> Result<RunReport, AppError> {
        let mode = self.resolve_input(input)?;
        let template = self.load_template().await?;

        match mode {
            InputMode::SingleFile(path) => self.run_single(path, template).await.map(RunReport::Single),
            InputMode::Folder(dir) => self.run_folder(&dir, template).await,
        }
    }

    /// Load the document template once for the run
    pub async fn load_template(&self) -> Result<TemplateBlob, AppError> {
        let path = self.config.resolved_template_path();
        let template = TemplateBlob::load(&path)
            .await
            .map_err(|source| AppError::Template { path: path.clone(), source })?;
        debug!("Loaded template {} ({} bytes)", path.display(), template.len());
        Ok(template)
    }

    /// Convert one file; its failure becomes the run's failure
    pub async fn run_single(&self, path: PathBuf, template: TemplateBlob) -> Result<ConversionOutcome, AppError> {
        let mut outcome = self.scheduler(template).run_single(path).await;
        match outcome.error.take() {
            None => Ok(outcome),
            Some(source) => Err(AppError::Conversion {
                path: outcome.source_path,
                source,
            }),
        }
    }

    /// Convert every subtitle file below `dir`, concurrently
    pub async fn run_folder(&self, dir: &Path, template: TemplateBlob) -> Result<RunReport, AppError> {
        let start_time = std::time::Instant::now();
        let paths: Vec<PathBuf> = FileManager::discover(dir, &self.config.source_suffix()).collect();
        if paths.is_empty() {
            warn!("No .{} files found in {}", self.config.source_extension, dir.display());
            return Ok(RunReport::NothingFound(dir.to_path_buf()));
        }
        info!("Converting {} file(s) from {}", paths.len(), dir.display());

        let progress_bar = if self.show_progress {
            ProgressBar::new(paths.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message("Converting");

        let pb = progress_bar.clone();
        let outcomes = self
            .scheduler(template)
            .run_batch(paths, move |_| pb.inc(1))
            .await;
        progress_bar.finish_and_clear();

        let summary = BatchSummary::from_outcomes(&outcomes);
        info!(
            "Folder processing completed in {}: {} converted, {} failed",
            Self::format_duration(start_time.elapsed()),
            summary.success_count,
            summary.failed_count
        );
        Ok(RunReport::Batch(summary))
    }

    fn scheduler(&self, template: TemplateBlob) -> Scheduler {
        Scheduler::new(template, self.config.output_extension.clone())
            .with_max_concurrent(self.config.max_concurrent_tasks)
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
