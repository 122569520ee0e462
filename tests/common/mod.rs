/*!
 * Common test utilities for the subtrans test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use subtrans::client::{ServiceClient, ServiceConfig};

// Re-export the stub transport module
pub mod mock_transport;

use mock_transport::StubTransport;

/// Base URL used by every test client
pub const TEST_BASE_URL: &str = "https://api.translator.test";

/// Route library logs through the test harness; safe to call from every test
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A three-cue WebVTT document with header metadata and cue settings
pub fn sample_vtt() -> &'static str {
    "WEBVTT Sample\nKind: captions\n\n1\n00:00:01.000 --> 00:00:04.000 align:start\nHello\n\n2\n00:00:05.000 --> 00:00:09.000\nHow are you?\n\n3\n00:00:10.000 --> 00:00:14.000 line:0\nGoodbye\n"
}

/// Creates a sample WebVTT file for testing
pub fn create_test_captions(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, sample_vtt())
}

/// Valid service configuration for tests
pub fn test_service_config() -> ServiceConfig {
    ServiceConfig::new(TEST_BASE_URL, "test-key", "westeurope").unwrap()
}

/// Client over the given stub
pub fn client_with(stub: StubTransport) -> ServiceClient {
    ServiceClient::new(test_service_config(), Arc::new(stub))
}
