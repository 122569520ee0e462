/*!
 * Whole-document translation.
 *
 * Every cue is translated concurrently. Results are tagged with their cue
 * index and placed back by index, so completion order never affects the
 * output order.
 */

use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, error};

use crate::caption::{Cue, Document};
use crate::client::ServiceClient;
use crate::errors::TranslationError;

use super::cue::{TranslateOptions, translate_cue};

/// Translate every cue of `source` and return the translated document.
///
/// The document fails as a whole on any cue error, but not eagerly: requests
/// already in flight are never cancelled, so every cue settles first. Then the
/// error of the lowest-index failing cue is returned and no document is
/// produced.
pub async fn translate_cues(
    source: &Document,
    target_locale: &str,
    client: &ServiceClient,
    options: &TranslateOptions,
) -> Result<Document, TranslationError> {
    let total = source.cues.len();

    let mut pending: FuturesUnordered<_> = source
        .cues
        .iter()
        .enumerate()
        .map(|(index, cue)| async move {
            (index, translate_cue(cue, target_locale, client, options).await)
        })
        .collect();

    let mut slots: Vec<Option<Cue>> = vec![None; total];
    let mut failures: Vec<(usize, TranslationError)> = Vec::new();

    while let Some((index, result)) = pending.next().await {
        match result {
            Ok(cue) => slots[index] = Some(cue),
            Err(e) => failures.push((index, e)),
        }
    }

    if !failures.is_empty() {
        failures.sort_by_key(|(index, _)| *index);
        error!(
            "{} of {} cues failed to translate to {}",
            failures.len(),
            total,
            target_locale
        );
        let (index, first) = failures.remove(0);
        debug!("First failing cue is at index {}", index);
        return Err(first);
    }

    let cues = slots.into_iter().flatten().collect();
    Ok(source.with_cues(cues))
}

/// Translate `source` and compile the result in the source's caption format
pub async fn translate_document(
    source: &Document,
    target_locale: &str,
    client: &ServiceClient,
    options: &TranslateOptions,
) -> Result<String, TranslationError> {
    let translated = translate_cues(source, target_locale, client, options).await?;
    Ok(translated.compile())
}
