/*!
 * Stub transport for testing
 *
 * Answers translate calls locally following the service wire contract, so no
 * test ever reaches the network. Behavior per (text, locale) can be scripted:
 * fixed translations, artificial delays and failures.
 */

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use subtrans::client::{ResolvedRequest, Transport};
use subtrans::errors::{ClientError, TransportError};

/// Records every request the stub received
#[derive(Debug, Default)]
pub struct CallTracker {
    /// Requests in the order they reached the transport
    pub requests: Vec<ResolvedRequest>,
}

/// Scriptable stand-in for the HTTP transport
#[derive(Debug, Default)]
pub struct StubTransport {
    tracker: Arc<Mutex<CallTracker>>,
    /// (text, locale) -> translated text
    translations: HashMap<(String, String), String>,
    /// text -> delay before answering
    delays: HashMap<String, Duration>,
    /// (text, locale) pairs that fail with a 500
    failures: Vec<(String, String)>,
}

impl StubTransport {
    /// Stub answering "[locale] text" for everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `translated` when `text` is sent to `locale`
    pub fn with_translation(mut self, text: &str, locale: &str, translated: &str) -> Self {
        self.translations
            .insert((text.to_string(), locale.to_string()), translated.to_string());
        self
    }

    /// Delay the answer for `text`
    pub fn with_delay(mut self, text: &str, millis: u64) -> Self {
        self.delays.insert(text.to_string(), Duration::from_millis(millis));
        self
    }

    /// Fail with a 500 when `text` is sent to `locale`
    pub fn failing_on(mut self, text: &str, locale: &str) -> Self {
        self.failures.push((text.to_string(), locale.to_string()));
        self
    }

    /// Shared handle to the recorded requests
    pub fn tracker(&self) -> Arc<Mutex<CallTracker>> {
        self.tracker.clone()
    }

    fn query_value<'a>(request: &'a ResolvedRequest, name: &str) -> &'a str {
        request
            .query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, request: ResolvedRequest) -> Result<Value, ClientError> {
        self.tracker.lock().unwrap().requests.push(request.clone());

        let locale = Self::query_value(&request, "to").to_string();
        let text = request.body[0]["text"].as_str().unwrap_or_default().to_string();

        if let Some(delay) = self.delays.get(&text) {
            tokio::time::sleep(*delay).await;
        }

        if self.failures.contains(&(text.clone(), locale.clone())) {
            return Err(TransportError::ApiError {
                status_code: 500,
                message: format!("stub failure for '{}' -> {}", text, locale),
            }
            .into());
        }

        let translated = self
            .translations
            .get(&(text.clone(), locale.clone()))
            .cloned()
            .unwrap_or_else(|| format!("[{}] {}", locale, text));

        Ok(json!([{ "translations": [{ "text": translated, "to": locale }] }]))
    }
}
