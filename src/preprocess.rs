//! Text normalization: raw input → lower-case alphabetic tokens.
//!
//! Input is NFC-normalized so that precomposed and decomposed accents produce the
//! same n-grams, lower-cased, and every character that is neither a letter nor a
//! combining mark becomes a separator. Digits, punctuation, symbols and whitespace
//! therefore never reach the scorer.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Tokens extracted from one input text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    tokens: Vec<String>,
    char_count: usize,
}

impl NormalizedText {
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Number of characters across all tokens.
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// `true` when the text carried no alphabetic content at all.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphabetic() || is_combining_mark(c)
}

/// Normalize raw text into alphabetic word tokens.
pub fn normalize(text: &str) -> NormalizedText {
    let lowered: String = text.nfc().collect::<String>().to_lowercase();

    let mut tokens = Vec::new();
    let mut char_count = 0;
    let mut current = String::new();

    for c in lowered.chars() {
        if is_word_char(c) {
            current.push(c);
            char_count += 1;
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    NormalizedText { tokens, char_count }
}

/// Split text into sentences at standard sentence-ending punctuation.
///
/// Terminators stay attached to their sentence; whitespace-only fragments are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        current.push(c);
        if is_sentence_end(c) {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
        }
    }

    // Remaining text (no trailing punctuation)
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }

    sentences
}

fn is_sentence_end(c: char) -> bool {
    matches!(
        c,
        '.' | '!' | '?' |
        '\u{061F}' |  // ؟ Arabic question mark
        '\u{06D4}' |  // ۔ Arabic full stop
        '\u{0964}' |  // । Devanagari danda
        '\u{3002}' |  // 。 CJK full stop
        '\u{FF01}' |  // ！ fullwidth exclamation
        '\u{FF1F}' // ？ fullwidth question mark
    )
}
