//! String-code boundary functions.
//!
//! Thin wrappers over [`LanguageDetector`] that take and return ISO 639-1 codes, for
//! callers that cannot hold a [`Language`] value (bindings, config-driven callers).

use crate::confidence::ConfidenceEntry;
use crate::detector::LanguageDetector;
use crate::error::{DetectionError, DetectorResult};
use crate::language::Language;

/// A detector over every supported language.
pub fn create_detector_for_all_languages() -> DetectorResult<LanguageDetector> {
    LanguageDetector::for_all_languages()
}

/// A detector over the given codes (trimmed, case-insensitive, duplicates dropped).
pub fn create_detector_for_languages<S: AsRef<str>>(codes: &[S]) -> DetectorResult<LanguageDetector> {
    LanguageDetector::for_languages(codes)
}

/// A detector from a comma-separated code list such as `"en, fr,DE"`.
///
/// Empty segments are skipped; a list with no codes at all is `InvalidInput`.
pub fn create_detector_from_code_list(list: &str) -> DetectorResult<LanguageDetector> {
    let codes: Vec<&str> = list
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .collect();
    if codes.is_empty() {
        return Err(DetectionError::InvalidInput {
            message: format!("no language codes in \"{list}\""),
        });
    }
    LanguageDetector::for_languages(&codes)
}

/// ISO 639-1 code of the most likely language.
pub fn detect_language(detector: &LanguageDetector, text: &str) -> Option<&'static str> {
    detector
        .detect_language_of(text)
        .map(Language::iso_code_639_1)
}

/// Confidence that `text` is in the language named by `code`.
pub fn compute_language_confidence(
    detector: &LanguageDetector,
    text: &str,
    code: &str,
) -> DetectorResult<f64> {
    let language: Language = code.parse()?;
    detector.compute_language_confidence(text, language)
}

/// Every candidate with its confidence, highest first.
pub fn compute_language_confidence_values(
    detector: &LanguageDetector,
    text: &str,
) -> Vec<ConfidenceEntry> {
    detector
        .compute_language_confidence_values(text)
        .into_entries()
}
