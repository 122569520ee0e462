use anyhow::{Context, Result};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::Config;
use crate::caption::{CaptionFormat, Document};
use crate::client::ServiceClient;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::translation::{TranslateOptions, translate_document};

// @module: Batch orchestration over (file × locale)

/// One independent piece of batch work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    /// Caption file to read
    pub source: PathBuf,
    /// Translated file to write
    pub destination: PathBuf,
    /// Locale to translate to
    pub target_locale: String,
}

/// Settled outcome of a batch
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Units whose output was written
    pub succeeded: Vec<TranslationUnit>,
    /// Units that failed, with the error message
    pub failed: Vec<(TranslationUnit, String)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// What the controller needs from the process configuration
#[derive(Debug, Clone)]
pub struct BatchSettings {
    /// Glob pattern selecting source files
    pub source_pattern: String,
    /// Target locales
    pub locales: Vec<String>,
    /// Directory outputs are written to
    pub output_dir: PathBuf,
    /// Fixed per-run request values
    pub options: TranslateOptions,
    /// Whether to draw a progress bar
    pub show_progress: bool,
}

impl From<&Config> for BatchSettings {
    fn from(config: &Config) -> Self {
        Self {
            source_pattern: config.source.clone(),
            locales: config.locales.clone(),
            output_dir: config.output_dir.clone(),
            options: config.translate.clone(),
            show_progress: config.show_progress,
        }
    }
}

/// Build one unit per source file × locale
pub fn expand_units(
    files: &[PathBuf],
    locales: &[String],
    output_dir: &Path,
) -> Vec<TranslationUnit> {
    files
        .iter()
        .flat_map(|file| {
            locales.iter().map(move |locale| TranslationUnit {
                source: file.clone(),
                destination: FileManager::output_path_for(file, output_dir, locale),
                target_locale: locale.clone(),
            })
        })
        .collect()
}

/// Main application controller for batch caption translation
pub struct Controller {
    // @field: Batch settings
    settings: BatchSettings,
    // @field: Shared service client
    client: Arc<ServiceClient>,
}

impl Controller {
    // @method: Create a controller over an already validated client
    pub fn new(settings: BatchSettings, client: Arc<ServiceClient>) -> Self {
        Self { settings, client }
    }

    /// Discover sources and run every unit to completion
    pub async fn run(&self) -> Result<BatchReport> {
        let files = FileManager::find_matching(&self.settings.source_pattern)
            .with_context(|| {
                format!(
                    "Failed to discover source files for '{}'",
                    self.settings.source_pattern
                )
            })?;

        if files.is_empty() {
            warn!("No caption files match '{}'", self.settings.source_pattern);
            return Ok(BatchReport::default());
        }

        language_utils::warn_unknown_locales(&self.settings.locales);
        let units = expand_units(&files, &self.settings.locales, &self.settings.output_dir);
        info!(
            "Translating {} file(s) into {} locale(s): {} unit(s)",
            files.len(),
            self.settings.locales.len(),
            units.len()
        );

        Ok(self.run_units(units).await)
    }

    /// Run the given units concurrently and wait for all of them to settle
    pub async fn run_units(&self, units: Vec<TranslationUnit>) -> BatchReport {
        let start_time = Instant::now();
        let progress_bar = self.progress_bar(units.len() as u64);

        let outcomes = join_all(units.into_iter().map(|unit| {
            let progress_bar = progress_bar.clone();
            async move {
                let result = self.run_unit(&unit).await;
                progress_bar.inc(1);
                (unit, result)
            }
        }))
        .await;
        progress_bar.finish_and_clear();

        let mut report = BatchReport::default();
        for (unit, result) in outcomes {
            match result {
                Ok(()) => report.succeeded.push(unit),
                Err(e) => {
                    error!(
                        "Failed to translate {} to {}: {}",
                        unit.source.display(),
                        unit.target_locale,
                        e
                    );
                    report.failed.push((unit, e.to_string()));
                }
            }
        }

        info!(
            "Batch finished in {}: {} succeeded, {} failed",
            Self::format_duration(start_time.elapsed()),
            report.succeeded.len(),
            report.failed.len()
        );
        report
    }

    /// Read, parse, translate and write one unit
    async fn run_unit(&self, unit: &TranslationUnit) -> Result<(), AppError> {
        info!(
            "Translating {} to {}",
            unit.source.display(),
            language_utils::describe_locale(&unit.target_locale)
        );

        let format = CaptionFormat::from_path(&unit.source)?;
        let content = FileManager::read_to_string(&unit.source)
            .await
            .map_err(|e| AppError::File(format!("{:#}", e)))?;
        let document = Document::parse(format, &content)?;

        let translated = translate_document(
            &document,
            &unit.target_locale,
            &self.client,
            &self.settings.options,
        )
        .await?;

        FileManager::write_to_file(&unit.destination, &translated)
            .await
            .map_err(|e| AppError::File(format!("{:#}", e)))?;
        info!("Written captions to {}", unit.destination.display());
        Ok(())
    }

    fn progress_bar(&self, total: u64) -> ProgressBar {
        if !self.settings.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} units ({percent}%)")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style);
        progress_bar
    }

    // @formats: Duration as "1m 05s" / "3.2s"
    fn format_duration(duration: std::time::Duration) -> String {
        let secs = duration.as_secs();
        if secs >= 60 {
            format!("{}m {:02}s", secs / 60, secs % 60)
        } else {
            format!("{:.1}s", duration.as_secs_f64())
        }
    }
}
