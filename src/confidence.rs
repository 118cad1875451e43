//! Turning raw log-probability scores into a ranked confidence distribution.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::language::Language;
use crate::scorer::ScoreOutcome;

/// Confidence that a text is written in `language`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceEntry {
    pub language: Language,
    /// In `[0, 1]`.
    pub confidence: f64,
}

impl fmt::Display for ConfidenceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.4}", self.language.iso_code_639_1(), self.confidence)
    }
}

/// Every candidate of a detector with its confidence, highest first.
///
/// Confidences sum to 1.0 when at least one candidate was viable; otherwise every
/// entry is 0.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectionResult {
    entries: Vec<ConfidenceEntry>,
}

impl DetectionResult {
    pub fn entries(&self) -> &[ConfidenceEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ConfidenceEntry> {
        self.entries
    }

    /// Highest-ranked entry, if it has positive confidence.
    pub fn top(&self) -> Option<&ConfidenceEntry> {
        self.entries.first().filter(|e| e.confidence > 0.0)
    }

    pub fn confidence_of(&self, language: Language) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.language == language)
            .map(|e| e.confidence)
    }

    /// `true` when no candidate received any confidence.
    pub fn is_no_signal(&self) -> bool {
        self.entries.iter().all(|e| e.confidence == 0.0)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConfidenceEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a DetectionResult {
    type Item = &'a ConfidenceEntry;
    type IntoIter = std::slice::Iter<'a, ConfidenceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Normalize raw scores over the full candidate set.
///
/// Scores are shifted by their maximum before exponentiation so the largest term is
/// exactly `exp(0) = 1`. Candidates without a score (pruned) get 0.0. Exact ties keep
/// candidate order.
pub fn normalize(candidates: &[Language], outcome: &ScoreOutcome) -> DetectionResult {
    let confidences: Vec<f64> = match outcome {
        ScoreOutcome::NoViableCandidates => vec![0.0; candidates.len()],
        ScoreOutcome::Scores(scores) => {
            let max = scores
                .iter()
                .map(|(_, s)| *s)
                .filter(|s| s.is_finite())
                .fold(f64::NEG_INFINITY, f64::max);
            let exps: Vec<(Language, f64)> = scores
                .iter()
                .map(|&(language, s)| {
                    let e = if s.is_finite() { (s - max).exp() } else { 0.0 };
                    (language, e)
                })
                .collect();
            let sum: f64 = exps.iter().map(|(_, e)| e).sum();

            candidates
                .iter()
                .map(|candidate| {
                    exps.iter()
                        .find(|(language, _)| language == candidate)
                        .map_or(0.0, |(_, e)| if sum > 0.0 { e / sum } else { 0.0 })
                })
                .collect()
        }
    };

    let mut ranked: Vec<(usize, ConfidenceEntry)> = candidates
        .iter()
        .zip(confidences)
        .map(|(&language, confidence)| ConfidenceEntry {
            language,
            confidence,
        })
        .enumerate()
        .collect();
    ranked.sort_by(|(ia, a), (ib, b)| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| ia.cmp(ib))
    });

    DetectionResult {
        entries: ranked.into_iter().map(|(_, entry)| entry).collect(),
    }
}
