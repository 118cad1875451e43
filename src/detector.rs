//! The query handle: a candidate language set bound to a model store.
//!
//! A [`LanguageDetector`] is immutable once built. Cloning it is cheap (two `Arc`s and
//! a small config), and every query is a pure function of the detector and the text,
//! so one detector can serve any number of threads at once.

use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::config::DetectorConfig;
use crate::confidence::{self, DetectionResult};
use crate::error::{DetectionError, DetectorResult};
use crate::language::Language;
use crate::model::ModelStore;
use crate::model::store::resolve_codes;
use crate::preprocess::{normalize, split_sentences};
use crate::scorer::Scorer;

/// Detection outcome for one sentence of a longer text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentenceDetection {
    pub sentence: String,
    pub language: Option<Language>,
    pub confidence: f64,
}

/// Configures and builds a [`LanguageDetector`].
#[derive(Debug, Clone)]
pub struct DetectorBuilder {
    languages: Vec<Language>,
    config: DetectorConfig,
    store: Option<Arc<ModelStore>>,
}

impl DetectorBuilder {
    /// Start from every supported language.
    pub fn from_all_languages() -> Self {
        Self::from_languages(&Language::all().collect::<Vec<_>>())
    }

    /// Start from an explicit candidate list. Duplicates are dropped at build time.
    pub fn from_languages(languages: &[Language]) -> Self {
        Self {
            languages: languages.to_vec(),
            config: DetectorConfig::default(),
            store: None,
        }
    }

    /// Start from ISO 639-1 codes; every unknown code is reported in one error.
    pub fn from_iso_codes<S: AsRef<str>>(codes: &[S]) -> DetectorResult<Self> {
        Ok(Self::from_languages(&resolve_codes(codes)?))
    }

    pub fn with_minimum_relative_distance(mut self, distance: f64) -> Self {
        self.config.minimum_relative_distance = distance;
        self
    }

    pub fn with_low_accuracy_mode(mut self) -> Self {
        self.config.low_accuracy = true;
        self
    }

    pub fn with_config(mut self, config: DetectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a specific store instead of the shared bundled one.
    pub fn with_store(mut self, store: Arc<ModelStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> DetectorResult<LanguageDetector> {
        if self.languages.is_empty() {
            return Err(DetectionError::InvalidInput {
                message: "a detector needs at least one language".into(),
            });
        }
        self.config
            .validate()
            .map_err(|message| DetectionError::InvalidInput { message })?;

        let mut languages: Vec<Language> = Vec::with_capacity(self.languages.len());
        for language in self.languages {
            if !languages.contains(&language) {
                languages.push(language);
            }
        }

        let store = match self.store {
            Some(store) => store,
            None => ModelStore::global()?,
        };

        tracing::debug!(
            languages = languages.len(),
            low_accuracy = self.config.low_accuracy,
            "built language detector"
        );

        Ok(LanguageDetector {
            languages: languages.into(),
            store,
            config: self.config,
        })
    }
}

/// An immutable candidate set bound to a model store.
#[derive(Debug, Clone)]
pub struct LanguageDetector {
    languages: Arc<[Language]>,
    store: Arc<ModelStore>,
    config: DetectorConfig,
}

impl LanguageDetector {
    /// A detector over every supported language, backed by the shared store.
    pub fn for_all_languages() -> DetectorResult<Self> {
        DetectorBuilder::from_all_languages().build()
    }

    /// A detector over the given ISO 639-1 codes, backed by the shared store.
    pub fn for_languages<S: AsRef<str>>(codes: &[S]) -> DetectorResult<Self> {
        DetectorBuilder::from_iso_codes(codes)?.build()
    }

    /// Candidate languages, in first-occurrence order.
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<ModelStore> {
        &self.store
    }

    pub fn contains(&self, language: Language) -> bool {
        self.languages.contains(&language)
    }

    /// Ranked confidences for every candidate.
    pub fn compute_language_confidence_values(&self, text: &str) -> DetectionResult {
        let normalized = normalize(text);
        let outcome =
            Scorer::new(&self.store, self.config.low_accuracy).score(&self.languages, &normalized);
        confidence::normalize(&self.languages, &outcome)
    }

    /// Confidence for one candidate.
    ///
    /// Fails with `UnsupportedLanguage` when `language` is not one of this detector's
    /// candidates.
    pub fn compute_language_confidence(&self, text: &str, language: Language) -> DetectorResult<f64> {
        if !self.contains(language) {
            return Err(DetectionError::UnsupportedLanguage {
                codes: vec![language.iso_code_639_1().to_string()],
            });
        }
        Ok(self
            .compute_language_confidence_values(text)
            .confidence_of(language)
            .unwrap_or(0.0))
    }

    /// The most likely language, or `None` when nothing scored (empty or
    /// non-alphabetic text, or no candidate sharing the text's script), or when the
    /// two best candidates are closer than the configured minimum relative distance.
    pub fn detect_language_of(&self, text: &str) -> Option<Language> {
        let result = self.compute_language_confidence_values(text);
        self.pick(&result)
    }

    fn pick(&self, result: &DetectionResult) -> Option<Language> {
        let top = result.top()?;
        if self.config.minimum_relative_distance > 0.0 {
            let runner_up = result.entries().get(1).map_or(0.0, |e| e.confidence);
            if top.confidence - runner_up < self.config.minimum_relative_distance {
                return None;
            }
        }
        Some(top.language)
    }

    /// Detect each sentence of a mixed-language text independently.
    pub fn detect_per_sentence(&self, text: &str) -> Vec<SentenceDetection> {
        split_sentences(text)
            .into_iter()
            .map(|sentence| {
                let result = self.compute_language_confidence_values(&sentence);
                let language = self.pick(&result);
                let confidence = language
                    .and_then(|l| result.confidence_of(l))
                    .unwrap_or(0.0);
                SentenceDetection {
                    sentence,
                    language,
                    confidence,
                }
            })
            .collect()
    }

    /// `detect_language_of` over many texts in parallel; output order matches input.
    pub fn detect_batch<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<Option<Language>> {
        texts
            .par_iter()
            .map(|text| self.detect_language_of(text.as_ref()))
            .collect()
    }

    /// `compute_language_confidence_values` over many texts in parallel.
    pub fn compute_confidence_values_batch<S: AsRef<str> + Sync>(
        &self,
        texts: &[S],
    ) -> Vec<DetectionResult> {
        texts
            .par_iter()
            .map(|text| self.compute_language_confidence_values(text.as_ref()))
            .collect()
    }
}
