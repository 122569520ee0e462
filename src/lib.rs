/*!
 * # subtrans - batch subtitle translation
 *
 * A Rust library for translating caption files through a remote translation
 * service, one output file per source file and target locale.
 *
 * ## Features
 *
 * - WebVTT and SRT captions, cue timing and settings passed through untouched
 * - Concurrent translation of every cue, reassembled in original order
 * - Concurrent (file × locale) batches where one failing unit never stops the others
 * - Generic service client: resource path templating, header merging and
 *   validation, validated configuration, pluggable keep-alive transport
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Process configuration (JSON file, environment, CLI layering)
 * - `client`: Translation service client:
 *   - `client::request`: Path templating, header construction, endpoint joining
 *   - `client::reqwest_transport`: Keep-alive HTTP transport
 * - `caption`: Caption documents and their WebVTT/SRT codecs
 * - `translation`: Cue and document translation
 * - `app_controller`: Batch orchestration over files and locales
 * - `file_utils`: Glob discovery and file I/O
 * - `language_utils`: Locale list parsing and language names
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod caption;
pub mod client;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{BatchReport, Controller, TranslationUnit};
pub use caption::{CaptionFormat, Cue, Document};
pub use client::{RequestSpec, ServiceClient, ServiceConfig, Transport};
pub use errors::{AppError, CaptionError, ClientError, TranslationError, TransportError};
