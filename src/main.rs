// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use subtrans::app_config::{Config, LogLevel, PartialConfig};
use subtrans::app_controller::{BatchSettings, Controller};
use subtrans::client::ServiceClient;
use subtrans::language_utils;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate caption files (default command)
    Translate(TranslateArgs),

    /// Generate shell completions for subtrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct TranslateArgs {
    /// Translation service base URL (https)
    #[arg(long, env = "BASEURL")]
    base_url: Option<String>,

    /// Subscription key for the translation service
    #[arg(long, env = "SUBSCRIPTIONKEY", hide_env_values = true)]
    subscription_key: Option<String>,

    /// Subscription region for the translation service
    #[arg(long, env = "SUBSCRIPTIONLOCATION")]
    subscription_location: Option<String>,

    /// Glob pattern selecting the source caption files
    #[arg(short, long, env = "SOURCE")]
    source: Option<String>,

    /// Comma-separated target locales (e.g. 'it,fr,zh-Hans')
    #[arg(short = 'L', long, env = "LOCALES")]
    locales: Option<String>,

    /// Directory translated files are written to [default: ./output]
    #[arg(short, long, env = "OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Language the source captions are written in [default: en]
    #[arg(short = 'f', long = "from", env = "SOURCE_LANGUAGE")]
    source_language: Option<String>,

    /// Translation API version [default: 3.0]
    #[arg(long, env = "API_VERSION")]
    api_version: Option<String>,

    /// Per-request timeout in seconds [default: 30]
    #[arg(long, env = "TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Do not draw a progress bar
    #[arg(long)]
    no_progress: bool,
}

impl TranslateArgs {
    // @returns: The environment/CLI configuration layer
    fn to_partial(&self) -> PartialConfig {
        PartialConfig {
            base_url: self.base_url.clone(),
            subscription_key: self.subscription_key.clone(),
            subscription_location: self.subscription_location.clone(),
            source: self.source.clone(),
            locales: self.locales.clone(),
            output_dir: self.output_dir.clone(),
            source_language: self.source_language.clone(),
            api_version: self.api_version.clone(),
            timeout_secs: self.timeout_secs,
            log_level: self.log_level.clone().map(Into::into),
            show_progress: if self.no_progress { Some(false) } else { None },
            ..Default::default()
        }
    }
}

/// subtrans - batch subtitle translation
///
/// Translates every caption file matching a glob pattern into each configured
/// locale through a remote translation service.
#[derive(Parser, Debug)]
#[command(name = "subtrans")]
#[command(version)]
#[command(about = "Batch caption translation through a remote translation service")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "subtrans reads WebVTT or SRT caption files, translates every cue and writes one file per target locale.

EXAMPLES:
    subtrans                                        # Everything from the environment / .env
    subtrans -s 'captions/*.vtt' -L it,fr           # Override source pattern and locales
    subtrans -o out --from de                       # German sources, custom output directory
    subtrans completions bash > subtrans.bash       # Generate bash completions

CONFIGURATION:
    Required: BASEURL, SUBSCRIPTIONKEY, SUBSCRIPTIONLOCATION, SOURCE, LOCALES.
    Values are read from conf.json (if present), then the environment (a .env
    file is loaded first), then command line flags; later layers win.

OUTPUT:
    {output_dir}/{basename}.{locale}{ext}, e.g. output/lesson1.it.vtt")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,
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
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Tag and ANSI color for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "1;31"),
            Level::Warn => ("WARN ", "1;33"),
            Level::Info => ("INFO ", "1;32"),
            Level::Debug => ("DEBUG", "1;36"),
            Level::Trace => ("TRACE", "1;35"),
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
            let (tag, color) = Self::style_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Environment variables from .env must be in place before clap reads them
    dotenv::dotenv().ok();

    // The logger accepts everything; the max level is narrowed once config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subtrans", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => run_translate(cli.translate).await,
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config_path = Path::new(&options.config_path);
    let file_layer = if config_path.exists() {
        PartialConfig::from_file(config_path)?
    } else {
        debug!("Config file not found at '{}', using environment only", options.config_path);
        PartialConfig::default()
    };

    let config = Config::from_partial(file_layer.merge(options.to_partial()))?;

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let service_config = config
        .service_config()
        .context("Invalid translation service configuration")?;
    let client = ServiceClient::with_default_transport(service_config, config.timeout_secs)
        .context("Failed to create the translation client")?;

    info!(
        "Translating '{}' from {} into {}",
        config.source,
        language_utils::describe_locale(&config.translate.source_language),
        config
            .locales
            .iter()
            .map(|locale| language_utils::describe_locale(locale))
            .collect::<Vec<_>>()
            .join(", ")
    );

    let controller = Controller::new(BatchSettings::from(&config), Arc::new(client));
    let report = controller.run().await?;

    if report.has_failures() {
        return Err(anyhow!(
            "{} of {} translation unit(s) failed",
            report.failed.len(),
            report.total()
        ));
    }

    Ok(())
}
