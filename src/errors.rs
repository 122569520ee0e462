/*!
 * Error types for the subtrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised by the transport while talking to the translation service
#[derive(Error, Debug)]
pub enum TransportError {
    /// Error when building or sending the request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The per-request deadline elapsed
    #[error("Request timed out: {0}")]
    Timeout(String),
}

/// Errors raised while configuring the client or building a request
#[derive(Error, Debug)]
pub enum ClientError {
    /// Missing or invalid service configuration
    #[error("Configuration error: {field} {reason}")]
    Configuration {
        /// Name of the offending configuration field
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// A resource template token had no value in any placeholder source
    #[error("{0} is a required resource placeholder")]
    MissingPlaceholder(String),

    /// The request carried no resource template
    #[error("resource is a required request property")]
    MissingResource,

    /// The authorization header does not use the Bearer scheme
    #[error("The authorization header is not valid. Value: {0}")]
    InvalidHeader(String),

    /// The resolved endpoint is not a valid URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Error from the transport layer
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl ClientError {
    pub(crate) fn configuration(field: &str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while parsing caption documents
#[derive(Error, Debug)]
pub enum CaptionError {
    /// The WebVTT signature line is missing
    #[error("Missing WEBVTT header")]
    MissingHeader,

    /// A timestamp could not be parsed
    #[error("Invalid timestamp at block {block}: {value}")]
    InvalidTimestamp {
        /// One-based index of the block in the file
        block: usize,
        /// The offending timestamp
        value: String,
    },

    /// A cue block is structurally broken
    #[error("Invalid cue at block {block}: {reason}")]
    InvalidCue {
        /// One-based index of the block in the file
        block: usize,
        /// What is wrong with it
        reason: String,
    },

    /// The file extension does not map to a supported caption format
    #[error("Unsupported caption format: {0}")]
    UnsupportedFormat(String),

    /// No cue could be read from the content
    #[error("No valid subtitle entries were found in the content")]
    Empty,
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the service client
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    /// The service answered with a payload that does not match the wire contract
    #[error("Malformed translation response: {0}")]
    MalformedResponse(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or invalid process configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Reading a source or writing an output failed
    #[error("File error: {0}")]
    File(String),

    /// Error from caption processing
    #[error("Caption error: {0}")]
    Caption(#[from] CaptionError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),
}
