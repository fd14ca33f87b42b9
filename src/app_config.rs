use anyhow::{anyhow, Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles loading and validating the converter settings.
/// Everything here is resolved once at startup and passed down explicitly.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Extension of the subtitle files to convert, without the dot
    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    /// Extension of the generated documents, without the dot
    #[serde(default = "default_output_extension")]
    pub output_extension: String,

    /// Document template to use instead of the bundled one
    #[serde(default)]
    pub template_path: Option<PathBuf>,

    /// Upper bound on conversions in flight; unbounded when absent
    #[serde(default)]
    pub max_concurrent_tasks: Option<usize>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Template shipped with the crate; the location is fixed when the binary is built
pub const BUNDLED_TEMPLATE_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/srt-to.docx");

fn default_source_extension() -> String {
    "srt".to_string()
}

fn default_output_extension() -> String {
    "docx".to_string()
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults when the file is absent
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("Config file not found at '{}', using defaults", path.display());
            return Ok(Self::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        for (name, extension) in [
            ("source_extension", &self.source_extension),
            ("output_extension", &self.output_extension),
        ] {
            if extension.is_empty() {
                return Err(anyhow!("{} must not be empty", name));
            }
            if extension.starts_with('.') {
                return Err(anyhow!("{} must be given without a leading dot: '{}'", name, extension));
            }
            if extension.contains(['/', '\\']) {
                return Err(anyhow!("{} must not contain path separators: '{}'", name, extension));
            }
        }

        if self.source_extension == self.output_extension {
            return Err(anyhow!(
                "source_extension and output_extension must differ, both are '{}'",
                self.source_extension
            ));
        }

        if self.max_concurrent_tasks == Some(0) {
            return Err(anyhow!("max_concurrent_tasks must be at least 1 when set"));
        }

        Ok(())
    }

    /// File-name suffix a subtitle file must end with, e.g. `.srt`
    pub fn source_suffix(&self) -> String {
        format!(".{}", self.source_extension)
    }

    /// Template location: the configured override, else the bundled asset
    pub fn resolved_template_path(&self) -> PathBuf {
        self.template_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(BUNDLED_TEMPLATE_PATH))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_extension: default_source_extension(),
            output_extension: default_output_extension(),
            template_path: None,
            max_concurrent_tasks: None,
            log_level: LogLevel::default(),
        }
    }
}
