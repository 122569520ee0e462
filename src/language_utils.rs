//! Locale utilities
//!
//! The translation service accepts BCP-47 style codes such as `it`, `pt-PT`
//! or `zh-Hans`. Only the primary language subtag is checked against ISO 639,
//! and an unknown code is reported rather than rejected.

use isolang::Language;
use log::warn;

/// Split a comma-separated locale list, dropping blanks and duplicates
pub fn parse_locale_list(raw: &str) -> Vec<String> {
    let mut locales: Vec<String> = Vec::new();
    for locale in raw.split(',').map(str::trim).filter(|l| !l.is_empty()) {
        if !locales.iter().any(|existing| existing == locale) {
            locales.push(locale.to_string());
        }
    }
    locales
}

/// Primary language subtag of a locale (`zh` for `zh-Hans`)
pub fn primary_subtag(locale: &str) -> String {
    locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// English name of the locale's language, if ISO 639 knows it
pub fn get_language_name(locale: &str) -> Option<String> {
    let code = primary_subtag(locale);
    let language = match code.len() {
        2 => Language::from_639_1(&code),
        3 => Language::from_639_3(&code),
        _ => None,
    }?;
    Some(language.to_name().to_string())
}

/// Human readable label for log lines, e.g. `it (Italian)`
pub fn describe_locale(locale: &str) -> String {
    match get_language_name(locale) {
        Some(name) => format!("{} ({})", locale, name),
        None => locale.to_string(),
    }
}

/// Warn about locales whose language subtag is not an ISO 639 code
pub fn warn_unknown_locales(locales: &[String]) {
    for locale in locales {
        if get_language_name(locale).is_none() {
            warn!("Locale '{}' is not a known ISO 639 language; passing it through as-is", locale);
        }
    }
}
