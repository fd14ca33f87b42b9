// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use log::{debug, error, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use srt_to_docx::app_config::{self, Config};
use srt_to_docx::{AppError, Controller, RunReport};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for srt-to-docx
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// srt-to-docx - Convert SubRip subtitles into Word documents
///
/// Fills a document template with the entries of each subtitle file and
/// writes the result next to the source.
#[derive(Parser, Debug)]
#[command(name = "srt-to-docx")]
#[command(version)]
#[command(about = "Convert .srt subtitle files into .docx documents")]
#[command(long_about = "srt-to-docx fills a Word template with the entries of SubRip subtitle files.

EXAMPLES:
    srt-to-docx                                # Convert every .srt below the current directory
    srt-to-docx episode01.srt                  # Convert a single file
    srt-to-docx /subtitles/                    # Convert a whole directory tree
    srt-to-docx -j 4 /subtitles/               # At most 4 conversions at a time
    srt-to-docx --template custom.docx a.srt   # Use another document template
    srt-to-docx completions bash > srt-to-docx.bash

CONFIGURATION:
    Settings are read from conf.json by default. You can specify a different
    file with --config-path. A missing file means built-in defaults; nothing
    is written.

OUTPUT:
    name.srt is converted to name.docx in the same directory. Existing
    documents are overwritten.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Subtitle file or directory to process; defaults to the current directory
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Maximum number of conversions running at once
    #[arg(short = 'j', long, value_parser = clap::value_parser!(u64).range(1..))]
    max_concurrent: Option<u64>,

    /// Document template to use instead of the bundled one
    #[arg(long, value_name = "FILE")]
    template: Option<PathBuf>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // Filtering happens through log::set_max_level so the level can change after startup
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level), now, Self::get_emoji_for_level(level), record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger once with info level by default
    // The level is updated after loading the config if needed
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "srt-to-docx", &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    match run_convert(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // AppError messages already carry their source
            match e.downcast_ref::<AppError>() {
                Some(app_error) => error!("{}", app_error),
                None => error!("{:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

// Resolve settings, run the controller and print the report
async fn run_convert(options: CommandLineOptions) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&options)?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }
    debug!("Effective configuration: {:?}", config);

    let source_extension = config.source_extension.clone();
    let controller = Controller::with_config(config)?;
    let report = controller.run(options.input_path).await?;

    if let RunReport::Single(outcome) = &report {
        debug!("Single file done: {}", outcome.output_path.display());
    }
    for line in report.report_lines(&source_extension) {
        println!("{}", line);
    }

    Ok(())
}

// Load the config file and apply command line overrides
fn load_config(options: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load(&options.config_path)
        .with_context(|| format!("Failed to load configuration from {}", options.config_path))?;

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(max_concurrent) = options.max_concurrent {
        config.max_concurrent_tasks = Some(usize::try_from(max_concurrent).unwrap_or(usize::MAX));
    }
    if let Some(template) = &options.template {
        config.template_path = Some(template.clone());
    }

    Ok(config)
}
