/*!
 * Tests for error conversion and display
 */

use subtrans::client::ServiceConfig;
use subtrans::errors::{AppError, CaptionError, ClientError, TranslationError, TransportError};

#[test]
fn test_clientError_fromTransport_shouldKeepVariant() {
    let err: ClientError = TransportError::Timeout("30s elapsed".to_string()).into();
    assert!(matches!(err, ClientError::Transport(TransportError::Timeout(_))));
    assert!(format!("{}", err).contains("30s elapsed"));
}

#[test]
fn test_appError_fromTranslationError_shouldKeepClientCause() {
    let err: AppError = TranslationError::Client(ClientError::MissingResource).into();
    assert!(matches!(err, AppError::Translation(TranslationError::Client(ClientError::MissingResource))));
    assert!(format!("{}", err).contains("resource is a required request property"));
}

#[test]
fn test_appError_fromCaptionError_shouldDisplayCause() {
    let err: AppError = CaptionError::InvalidTimestamp {
        block: 4,
        value: "00:61.000".to_string(),
    }
    .into();
    let message = format!("{}", err);
    assert!(message.contains("block 4"));
    assert!(message.contains("00:61.000"));
}

#[test]
fn test_configurationError_shouldNameField() {
    let err = ServiceConfig::new("https://api.example.com", "key", "  ").unwrap_err();
    assert!(matches!(err, ClientError::Configuration { ref field, .. } if field == "credential_region"));
    assert!(format!("{}", err).contains("credential_region"));
}
