/*!
 * Single-cue translation against the translation service wire contract.
 */

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::caption::Cue;
use crate::client::{RequestSpec, ServiceClient};
use crate::errors::TranslationError;

/// Resource the translate call is sent to
pub const TRANSLATE_RESOURCE: &str = "translate";

/// Values fixed for a whole run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateOptions {
    /// Value of the `api-version` query parameter
    pub api_version: String,

    /// Language all sources are written in (`from`)
    pub source_language: String,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            api_version: "3.0".to_string(),
            source_language: "en".to_string(),
        }
    }
}

/// One text unit of the request body
#[derive(Debug, Serialize)]
pub struct TextUnit<'a> {
    pub text: &'a str,
}

/// Per-input result of the translate call
#[derive(Debug, Deserialize)]
pub struct TranslateResult {
    pub translations: Vec<Translation>,
}

/// One translation of an input text
#[derive(Debug, Deserialize)]
pub struct Translation {
    pub text: String,

    /// Locale the service translated to
    #[serde(default)]
    pub to: Option<String>,
}

/// Build the translate request for one text
pub fn translate_request(
    text: &str,
    target_locale: &str,
    options: &TranslateOptions,
) -> RequestSpec {
    RequestSpec::new(TRANSLATE_RESOURCE)
        .query("api-version", &options.api_version)
        .query("from", &options.source_language)
        .query("to", target_locale)
        .body(json!([TextUnit { text }]))
}

/// Pull the first translation of the first input out of a translate response
pub fn extract_translation(response: serde_json::Value) -> Result<String, TranslationError> {
    let results: Vec<TranslateResult> = serde_json::from_value(response)
        .map_err(|e| TranslationError::MalformedResponse(e.to_string()))?;

    results
        .into_iter()
        .next()
        .ok_or_else(|| TranslationError::MalformedResponse("empty result array".to_string()))?
        .translations
        .into_iter()
        .next()
        .map(|translation| translation.text)
        .ok_or_else(|| {
            TranslationError::MalformedResponse("result has no translations".to_string())
        })
}

/// Translate one cue, returning a new cue that differs only in its text
pub async fn translate_cue(
    cue: &Cue,
    target_locale: &str,
    client: &ServiceClient,
    options: &TranslateOptions,
) -> Result<Cue, TranslationError> {
    let spec = translate_request(&cue.text, target_locale, options);
    let response = client.send_request(spec).await?;
    let text = extract_translation(response)?;
    Ok(cue.with_text(text))
}
