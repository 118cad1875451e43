//! Per-language n-gram frequency models.
//!
//! A model holds one table per order (1 through [`MAX_ORDER`]). Each table maps an
//! n-gram to its exact observed count and the derived log-probability
//! `ln(count / total)`. N-grams absent from a table score the order's smoothing
//! constant `ln(SMOOTHING_MASS / total)` instead of negative infinity.
//!
//! The on-disk form ([`ModelFile`]) groups n-grams by count:
//!
//! ```json
//! {"language": "fr", "ngrams": {"1": {"total": 1537, "counts": {"239": "e", "104": "a t"}}}}
//! ```
//!
//! Counts are integers, so a load → export cycle reproduces the table exactly.

pub mod store;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::language::Language;

pub use store::ModelStore;

/// Highest n-gram order stored and scored.
pub const MAX_ORDER: usize = 5;

/// Probability mass assigned to an unseen n-gram, in units of one observation.
pub const SMOOTHING_MASS: f64 = 0.5;

/// Serialized form of one language model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelFile {
    /// ISO 639-1 code.
    pub language: String,
    /// Tables keyed by order.
    pub ngrams: BTreeMap<u8, OrderFile>,
}

/// Serialized form of one order's table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFile {
    pub total: u64,
    /// Count → space-separated n-grams observed exactly that many times.
    pub counts: BTreeMap<u32, String>,
}

/// A single table entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frequency {
    pub count: u32,
    pub log_probability: f64,
}

/// The table for one n-gram order.
#[derive(Debug, Clone)]
pub struct NgramTable {
    total: u64,
    smoothing: f64,
    entries: HashMap<String, Frequency>,
}

impl NgramTable {
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Log-probability used for n-grams absent from this table.
    pub fn smoothing(&self) -> f64 {
        self.smoothing
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, ngram: &str) -> Option<&Frequency> {
        self.entries.get(ngram)
    }

    /// Log-probability of `ngram`, falling back to the smoothing constant.
    #[inline]
    pub fn log_probability(&self, ngram: &str) -> f64 {
        self.entries
            .get(ngram)
            .map_or(self.smoothing, |f| f.log_probability)
    }

    fn from_file(code: &str, order: usize, file: &OrderFile) -> ModelResult<Self> {
        if file.total == 0 {
            return Err(ModelError::corrupt(code, format!("order {order} has zero total")));
        }
        let ln_total = (file.total as f64).ln();
        let mut entries = HashMap::new();
        let mut observed: u64 = 0;

        for (&count, grams) in &file.counts {
            if count == 0 {
                return Err(ModelError::corrupt(
                    code,
                    format!("order {order} lists n-grams with count 0"),
                ));
            }
            for gram in grams.split_whitespace() {
                if gram.chars().count() != order {
                    return Err(ModelError::corrupt(
                        code,
                        format!("n-gram \"{gram}\" filed under order {order}"),
                    ));
                }
                let frequency = Frequency {
                    count,
                    log_probability: (count as f64).ln() - ln_total,
                };
                if entries.insert(gram.to_string(), frequency).is_some() {
                    return Err(ModelError::corrupt(
                        code,
                        format!("n-gram \"{gram}\" listed twice in order {order}"),
                    ));
                }
                observed += u64::from(count);
            }
        }

        if observed != file.total {
            return Err(ModelError::corrupt(
                code,
                format!(
                    "order {order} total is {} but its counts sum to {observed}",
                    file.total
                ),
            ));
        }

        Ok(Self {
            total: file.total,
            smoothing: SMOOTHING_MASS.ln() - ln_total,
            entries,
        })
    }

    fn to_file(&self) -> OrderFile {
        let mut grouped: BTreeMap<u32, Vec<&str>> = BTreeMap::new();
        for (gram, frequency) in &self.entries {
            grouped.entry(frequency.count).or_default().push(gram);
        }
        let counts = grouped
            .into_iter()
            .map(|(count, mut grams)| {
                grams.sort_unstable();
                (count, grams.join(" "))
            })
            .collect();
        OrderFile {
            total: self.total,
            counts,
        }
    }
}

/// Immutable n-gram statistics for one language.
#[derive(Debug, Clone)]
pub struct NgramModel {
    language: Language,
    /// Index `n - 1` holds the order-`n` table.
    tables: Vec<NgramTable>,
}

impl NgramModel {
    /// Build a model from its serialized form, validating every table.
    ///
    /// `expected` is the language the caller is loading; a file describing any
    /// other language is rejected.
    pub fn from_file(expected: Language, file: &ModelFile) -> ModelResult<Self> {
        let code = expected.iso_code_639_1();
        if !file.language.eq_ignore_ascii_case(code) {
            return Err(ModelError::corrupt(
                code,
                format!("file describes language \"{}\"", file.language),
            ));
        }
        if let Some(&order) = file.ngrams.keys().find(|&&o| o == 0 || o as usize > MAX_ORDER) {
            return Err(ModelError::corrupt(code, format!("unexpected order {order}")));
        }

        let tables = (1..=MAX_ORDER)
            .map(|order| {
                let table = file
                    .ngrams
                    .get(&(order as u8))
                    .ok_or_else(|| ModelError::corrupt(code, format!("order {order} missing")))?;
                NgramTable::from_file(code, order, table)
            })
            .collect::<ModelResult<Vec<_>>>()?;

        Ok(Self {
            language: expected,
            tables,
        })
    }

    /// Parse a model from its JSON representation.
    pub fn from_json(expected: Language, json: &str) -> ModelResult<Self> {
        let file: ModelFile = serde_json::from_str(json)
            .map_err(|e| ModelError::corrupt(expected.iso_code_639_1(), e.to_string()))?;
        Self::from_file(expected, &file)
    }

    /// Serialize back to the grouped-by-count form.
    pub fn to_file(&self) -> ModelFile {
        let ngrams = self
            .tables
            .iter()
            .enumerate()
            .map(|(i, table)| ((i + 1) as u8, table.to_file()))
            .collect();
        ModelFile {
            language: self.language.iso_code_639_1().to_string(),
            ngrams,
        }
    }

    pub fn to_json(&self) -> ModelResult<String> {
        serde_json::to_string_pretty(&self.to_file()).map_err(|e| ModelError::Snapshot {
            message: e.to_string(),
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Table for `order` (1-based). Panics on orders outside `1..=MAX_ORDER`.
    pub fn table(&self, order: usize) -> &NgramTable {
        &self.tables[order - 1]
    }

    /// Total observations of order-`order` n-grams.
    pub fn total(&self, order: usize) -> u64 {
        self.table(order).total
    }

    /// Log-probability of an n-gram; its order is its length in characters.
    /// Returns `None` for empty or over-long n-grams.
    pub fn log_probability(&self, ngram: &str) -> Option<f64> {
        let order = ngram.chars().count();
        (1..=MAX_ORDER)
            .contains(&order)
            .then(|| self.table(order).log_probability(ngram))
    }

    /// Relative frequency of an n-gram within its order; `0.0` when unseen.
    pub fn probability(&self, ngram: &str) -> f64 {
        let order = ngram.chars().count();
        if !(1..=MAX_ORDER).contains(&order) {
            return 0.0;
        }
        self.table(order)
            .get(ngram)
            .map_or(0.0, |f| f.log_probability.exp())
    }

    pub fn contains(&self, ngram: &str) -> bool {
        let order = ngram.chars().count();
        (1..=MAX_ORDER).contains(&order) && self.table(order).get(ngram).is_some()
    }

    /// Number of distinct n-grams across all orders.
    pub fn len(&self) -> usize {
        self.tables.iter().map(NgramTable::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_file(language: &str) -> ModelFile {
        let mut ngrams = BTreeMap::new();
        for order in 1..=MAX_ORDER as u8 {
            let gram: String = "abcde".chars().take(order as usize).collect();
            let other: String = "zyxwv".chars().take(order as usize).collect();
            ngrams.insert(
                order,
                OrderFile {
                    total: 4,
                    counts: BTreeMap::from([(3, gram), (1, other)]),
                },
            );
        }
        ModelFile {
            language: language.to_string(),
            ngrams,
        }
    }

    #[test]
    fn log_probabilities_follow_counts() {
        let model = NgramModel::from_file(Language::English, &tiny_file("en")).unwrap();
        let lp = model.log_probability("ab").unwrap();
        assert!((lp - (0.75f64).ln()).abs() < 1e-12);
        assert!((model.probability("z") - 0.25).abs() < 1e-12);
        assert_eq!(model.total(3), 4);
        assert_eq!(model.len(), 10);
    }

    #[test]
    fn unseen_ngrams_score_smoothing_constant() {
        let model = NgramModel::from_file(Language::English, &tiny_file("en")).unwrap();
        let lp = model.log_probability("qq").unwrap();
        assert!((lp - (SMOOTHING_MASS / 4.0).ln()).abs() < 1e-12);
        assert!(lp.is_finite());
        assert!(!model.contains("qq"));
        assert_eq!(model.probability("qq"), 0.0);
        assert_eq!(model.log_probability("abcdef"), None);
    }

    #[test]
    fn file_round_trip_is_exact() {
        let file = tiny_file("en");
        let model = NgramModel::from_file(Language::English, &file).unwrap();
        assert_eq!(model.to_file(), file);
    }

    #[test]
    fn rejects_language_mismatch() {
        let err = NgramModel::from_file(Language::German, &tiny_file("en")).unwrap_err();
        assert!(matches!(err, ModelError::Corrupt { .. }));
    }

    #[test]
    fn rejects_missing_order() {
        let mut file = tiny_file("en");
        file.ngrams.remove(&4);
        let err = NgramModel::from_file(Language::English, &file).unwrap_err();
        assert!(format!("{err}").contains("order 4 missing"));
    }

    #[test]
    fn rejects_total_mismatch() {
        let mut file = tiny_file("en");
        file.ngrams.get_mut(&2).unwrap().total = 7;
        let err = NgramModel::from_file(Language::English, &file).unwrap_err();
        assert!(format!("{err}").contains("sum to 4"));
    }

    #[test]
    fn rejects_wrong_length_ngram() {
        let mut file = tiny_file("en");
        file.ngrams
            .get_mut(&3)
            .unwrap()
            .counts
            .insert(3, "abcd".to_string());
        assert!(NgramModel::from_file(Language::English, &file).is_err());
    }

    #[test]
    fn rejects_duplicate_ngram() {
        let mut file = tiny_file("en");
        let table = file.ngrams.get_mut(&1).unwrap();
        table.counts.insert(1, "a".to_string());
        table.total = 4;
        let err = NgramModel::from_file(Language::English, &file).unwrap_err();
        assert!(format!("{err}").contains("listed twice"));
    }

    #[test]
    fn rejects_unparseable_json() {
        let err = NgramModel::from_json(Language::French, "{not json").unwrap_err();
        assert!(matches!(err, ModelError::Corrupt { .. }));
    }
}
