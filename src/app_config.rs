//! Application configuration module
//!
//! Handles the process configuration: an optional JSON file, overridden by
//! environment variables, overridden by command line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::client::ServiceConfig;
use crate::errors::{AppError, ClientError};
use crate::language_utils;
use crate::translation::TranslateOptions;

/// Environment variable holding the service base URL
pub const ENV_BASE_URL: &str = "BASEURL";
/// Environment variable holding the subscription key
pub const ENV_SUBSCRIPTION_KEY: &str = "SUBSCRIPTIONKEY";
/// Environment variable holding the subscription region
pub const ENV_SUBSCRIPTION_LOCATION: &str = "SUBSCRIPTIONLOCATION";
/// Environment variable holding the source glob pattern
pub const ENV_SOURCE: &str = "SOURCE";
/// Environment variable holding the comma-separated target locales
pub const ENV_LOCALES: &str = "LOCALES";

/// Log level
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

/// One configuration layer; every field is optional so layers can be stacked
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PartialConfig {
    pub base_url: Option<String>,
    pub subscription_key: Option<String>,
    pub subscription_location: Option<String>,
    pub source: Option<String>,
    pub locales: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub source_language: Option<String>,
    pub api_version: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_level: Option<LogLevel>,
    pub show_progress: Option<bool>,
    pub resource_placeholders: HashMap<String, String>,
}

impl PartialConfig {
    /// Load a layer from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Stack `other` on top of `self`; values set in `other` win
    pub fn merge(self, other: PartialConfig) -> PartialConfig {
        let mut resource_placeholders = self.resource_placeholders;
        resource_placeholders.extend(other.resource_placeholders);

        PartialConfig {
            base_url: other.base_url.or(self.base_url),
            subscription_key: other.subscription_key.or(self.subscription_key),
            subscription_location: other.subscription_location.or(self.subscription_location),
            source: other.source.or(self.source),
            locales: other.locales.or(self.locales),
            output_dir: other.output_dir.or(self.output_dir),
            source_language: other.source_language.or(self.source_language),
            api_version: other.api_version.or(self.api_version),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            log_level: other.log_level.or(self.log_level),
            show_progress: other.show_progress.or(self.show_progress),
            resource_placeholders,
        }
    }
}

/// Represents the resolved process configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Translation service base URL
    pub base_url: String,

    /// Subscription key sent with every request
    pub subscription_key: String,

    /// Subscription region sent with every request
    pub subscription_location: String,

    /// Glob pattern selecting the source caption files
    pub source: String,

    /// Target locales, in configured order
    pub locales: Vec<String>,

    /// Directory translated files are written to
    pub output_dir: PathBuf,

    /// Fixed per-run request values
    pub translate: TranslateOptions,

    /// Per-request timeout
    pub timeout_secs: u64,

    /// Log level
    pub log_level: LogLevel,

    /// Whether to draw a progress bar
    pub show_progress: bool,

    /// Client-level resource placeholders
    pub resource_placeholders: HashMap<String, String>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}

fn default_timeout_secs() -> u64 {
    30
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Resolve a stacked layer into a full configuration.
    ///
    /// All five mandatory settings are checked together and every missing one
    /// is named by its environment variable.
    pub fn from_partial(partial: PartialConfig) -> Result<Self, AppError> {
        let base_url = present(&partial.base_url);
        let subscription_key = present(&partial.subscription_key);
        let subscription_location = present(&partial.subscription_location);
        let source = present(&partial.source);
        let locales = present(&partial.locales)
            .map(|raw| language_utils::parse_locale_list(&raw))
            .filter(|locales| !locales.is_empty());

        let mut missing = Vec::new();
        if base_url.is_none() {
            missing.push(ENV_BASE_URL);
        }
        if subscription_key.is_none() {
            missing.push(ENV_SUBSCRIPTION_KEY);
        }
        if subscription_location.is_none() {
            missing.push(ENV_SUBSCRIPTION_LOCATION);
        }
        if source.is_none() {
            missing.push(ENV_SOURCE);
        }
        if locales.is_none() {
            missing.push(ENV_LOCALES);
        }

        let (
            Some(base_url),
            Some(subscription_key),
            Some(subscription_location),
            Some(source),
            Some(locales),
        ) = (base_url, subscription_key, subscription_location, source, locales)
        else {
            return Err(AppError::Configuration(format!(
                "Missing critical settings: {}. Define them in the environment or the .env file.",
                missing.join(", ")
            )));
        };

        let defaults = TranslateOptions::default();
        Ok(Config {
            base_url,
            subscription_key,
            subscription_location,
            source,
            locales,
            output_dir: partial.output_dir.unwrap_or_else(default_output_dir),
            translate: TranslateOptions {
                api_version: present(&partial.api_version).unwrap_or(defaults.api_version),
                source_language: present(&partial.source_language)
                    .unwrap_or(defaults.source_language),
            },
            timeout_secs: partial.timeout_secs.unwrap_or_else(default_timeout_secs),
            log_level: partial.log_level.unwrap_or_default(),
            show_progress: partial.show_progress.unwrap_or(true),
            resource_placeholders: partial.resource_placeholders,
        })
    }

    /// Build the validated service configuration
    pub fn service_config(&self) -> Result<ServiceConfig, ClientError> {
        Ok(ServiceConfig::new(
            &self.base_url,
            &self.subscription_key,
            &self.subscription_location,
        )?
        .with_placeholders(self.resource_placeholders.clone()))
    }
}
