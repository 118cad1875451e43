//! N-gram log-probability scoring.
//!
//! N-grams of every active order are extracted once per query (sliding windows
//! inside each token, never across token boundaries) and then looked up in each
//! surviving candidate's model. A language's score is the weighted sum of the
//! log-probabilities of all n-gram occurrences.

use crate::language::Language;
use crate::model::{MAX_ORDER, ModelStore, NgramModel};
use crate::preprocess::NormalizedText;
use crate::script::{ScriptSet, retain_compatible};

/// Minimum number of alphabetic characters in the text for order `n` (index `n - 1`)
/// to take part in scoring.
pub const MIN_CHARS_FOR_ORDER: [usize; MAX_ORDER] = [1, 2, 3, 6, 10];

/// Texts at least this long weight higher orders more heavily.
pub const LONG_TEXT_CHARS: usize = 120;

/// Extra weight per order above unigrams for long texts.
pub const LONG_TEXT_ORDER_BOOST: f64 = 0.25;

/// Order used exclusively in low-accuracy mode.
const LOW_ACCURACY_ORDER: usize = 3;

/// Raw scoring result for one query.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutcome {
    /// No tokens, or the alphabet filter pruned every candidate.
    NoViableCandidates,
    /// Summed log-probability per surviving candidate, in candidate order.
    Scores(Vec<(Language, f64)>),
}

/// Scores candidate languages against normalized text.
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    store: &'a ModelStore,
    low_accuracy: bool,
}

impl<'a> Scorer<'a> {
    pub fn new(store: &'a ModelStore, low_accuracy: bool) -> Self {
        Self {
            store,
            low_accuracy,
        }
    }

    /// Orders used for a text with `char_count` alphabetic characters.
    pub fn active_orders(&self, char_count: usize) -> Vec<usize> {
        let orders: Vec<usize> = (1..=MAX_ORDER)
            .filter(|&order| char_count >= MIN_CHARS_FOR_ORDER[order - 1])
            .collect();
        if self.low_accuracy && orders.contains(&LOW_ACCURACY_ORDER) {
            vec![LOW_ACCURACY_ORDER]
        } else {
            orders
        }
    }

    /// Weight applied to every order-`order` log-probability.
    pub fn order_weight(order: usize, char_count: usize) -> f64 {
        if char_count >= LONG_TEXT_CHARS {
            1.0 + LONG_TEXT_ORDER_BOOST * (order - 1) as f64
        } else {
            1.0
        }
    }

    /// Score `candidates` (already de-duplicated, in detector order).
    ///
    /// A lone candidate is not scored at all: any text with signal classifies as it.
    pub fn score(&self, candidates: &[Language], text: &NormalizedText) -> ScoreOutcome {
        if text.is_empty() || candidates.is_empty() {
            return ScoreOutcome::NoViableCandidates;
        }
        if let [only] = candidates {
            return ScoreOutcome::Scores(vec![(*only, 0.0)]);
        }

        let scripts = ScriptSet::of_tokens(text.tokens());
        let viable = retain_compatible(candidates, &scripts);
        if viable.is_empty() {
            tracing::debug!(
                candidates = candidates.len(),
                scripts = scripts.len(),
                "alphabet filter pruned every candidate"
            );
            return ScoreOutcome::NoViableCandidates;
        }

        let char_count = text.char_count();
        let orders = self.active_orders(char_count);
        let ngrams: Vec<(usize, Vec<&str>)> = orders
            .iter()
            .map(|&order| (order, extract_ngrams(text.tokens(), order)))
            .collect();

        tracing::debug!(
            candidates = candidates.len(),
            viable = viable.len(),
            chars = char_count,
            orders = ?orders,
            "scoring candidates"
        );

        let scores = viable
            .into_iter()
            .map(|language| {
                let model = self.store.model_for(language);
                (language, score_model(model, &ngrams, char_count))
            })
            .collect();
        ScoreOutcome::Scores(scores)
    }
}

fn score_model(model: &NgramModel, ngrams: &[(usize, Vec<&str>)], char_count: usize) -> f64 {
    ngrams
        .iter()
        .map(|(order, grams)| {
            let table = model.table(*order);
            let sum: f64 = grams.iter().map(|g| table.log_probability(g)).sum();
            Scorer::order_weight(*order, char_count) * sum
        })
        .sum()
}

/// Every order-`order` n-gram occurrence, token by token, left to right.
pub fn extract_ngrams<S: AsRef<str>>(tokens: &[S], order: usize) -> Vec<&str> {
    let mut out = Vec::new();
    if order == 0 {
        return out;
    }
    for token in tokens {
        let token = token.as_ref();
        let bounds: Vec<usize> = token
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(token.len()))
            .collect();
        let chars = bounds.len() - 1;
        if chars < order {
            continue;
        }
        for start in 0..=chars - order {
            out.push(&token[bounds[start]..bounds[start + order]]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::normalize;

    fn store() -> std::sync::Arc<ModelStore> {
        ModelStore::global().unwrap()
    }

    #[test]
    fn extracts_sliding_windows_within_tokens() {
        let grams = extract_ngrams(&["abcd", "xy"], 2);
        assert_eq!(grams, vec!["ab", "bc", "cd", "xy"]);
        assert_eq!(extract_ngrams(&["ab"], 3), Vec::<&str>::new());
    }

    #[test]
    fn extracts_multibyte_ngrams() {
        let grams = extract_ngrams(&["été"], 2);
        assert_eq!(grams, vec!["ét", "té"]);
        let grams = extract_ngrams(&["公园散步"], 3);
        assert_eq!(grams, vec!["公园散", "园散步"]);
    }

    #[test]
    fn short_texts_use_low_orders_only() {
        let store = store();
        let scorer = Scorer::new(&store, false);
        assert_eq!(scorer.active_orders(1), vec![1]);
        assert_eq!(scorer.active_orders(2), vec![1, 2]);
        assert_eq!(scorer.active_orders(5), vec![1, 2, 3]);
        assert_eq!(scorer.active_orders(9), vec![1, 2, 3, 4]);
        assert_eq!(scorer.active_orders(40), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn low_accuracy_mode_uses_trigrams() {
        let store = store();
        let scorer = Scorer::new(&store, true);
        assert_eq!(scorer.active_orders(40), vec![3]);
        assert_eq!(scorer.active_orders(2), vec![1, 2]);
    }

    #[test]
    fn long_texts_weight_higher_orders() {
        assert_eq!(Scorer::order_weight(5, 50), 1.0);
        assert_eq!(Scorer::order_weight(1, 200), 1.0);
        assert_eq!(Scorer::order_weight(5, 200), 2.0);
    }

    #[test]
    fn empty_text_has_no_viable_candidates() {
        let store = store();
        let scorer = Scorer::new(&store, false);
        let outcome = scorer.score(&[Language::English, Language::French], &normalize(" 42 "));
        assert_eq!(outcome, ScoreOutcome::NoViableCandidates);
    }

    #[test]
    fn disjoint_script_has_no_viable_candidates() {
        let store = store();
        let scorer = Scorer::new(&store, false);
        let outcome = scorer.score(
            &[Language::English, Language::Russian],
            &normalize("我们今天去公园散步"),
        );
        assert_eq!(outcome, ScoreOutcome::NoViableCandidates);
    }

    #[test]
    fn single_candidate_is_trivial() {
        let store = store();
        let scorer = Scorer::new(&store, false);
        let outcome = scorer.score(&[Language::English], &normalize("我们"));
        assert_eq!(outcome, ScoreOutcome::Scores(vec![(Language::English, 0.0)]));
    }

    #[test]
    fn scores_are_finite_and_deterministic() {
        let store = store();
        let scorer = Scorer::new(&store, false);
        let text = normalize("Bonjour, comment allez-vous?");
        let candidates = [
            Language::English,
            Language::French,
            Language::Spanish,
            Language::German,
        ];
        let first = scorer.score(&candidates, &text);
        let second = scorer.score(&candidates, &text);
        assert_eq!(first, second);

        let ScoreOutcome::Scores(scores) = first else {
            panic!("expected scores");
        };
        assert_eq!(scores.len(), 4);
        assert!(scores.iter().all(|(_, s)| s.is_finite() && *s < 0.0));
        let best = scores
            .iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(l, _)| *l);
        assert_eq!(best, Some(Language::French));
    }

    #[test]
    fn pruned_candidates_are_absent_from_scores() {
        let store = store();
        let scorer = Scorer::new(&store, false);
        let outcome = scorer.score(
            &[Language::English, Language::Greek, Language::Chinese],
            &normalize("καλημέρα"),
        );
        let ScoreOutcome::Scores(scores) = outcome else {
            panic!("expected scores");
        };
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].0, Language::Greek);
    }
}
