//! Script analysis and the alphabet pre-filter.
//!
//! Unicode codepoint ranges map each letter to a coarse writing system. Before any
//! n-gram is scored, candidates whose scripts share nothing with the scripts found in
//! the text are pruned. Languages that share a script are never separated here; that
//! is the scorer's job.

use std::fmt;

use crate::language::Language;

/// A coarse writing-system tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Script {
    Latin,
    Greek,
    Cyrillic,
    Armenian,
    Hebrew,
    Arabic,
    Devanagari,
    Thai,
    Georgian,
    Hangul,
    Hiragana,
    Katakana,
    Han,
}

impl Script {
    /// All script tags in declaration order.
    pub const ALL: [Script; 13] = [
        Script::Latin,
        Script::Greek,
        Script::Cyrillic,
        Script::Armenian,
        Script::Hebrew,
        Script::Arabic,
        Script::Devanagari,
        Script::Thai,
        Script::Georgian,
        Script::Hangul,
        Script::Hiragana,
        Script::Katakana,
        Script::Han,
    ];

    /// Classify a single character. Returns `None` for characters outside every
    /// tagged block (digits, punctuation, generic combining marks, unsupported scripts).
    pub fn of(c: char) -> Option<Script> {
        let script = match c {
            'a'..='z' | 'A'..='Z' => Script::Latin,
            // Latin-1 Supplement letters + Extended-A + Extended-B + Extended Additional
            '\u{00C0}'..='\u{024F}' | '\u{1E00}'..='\u{1EFF}' => Script::Latin,
            // Greek and Coptic + Greek Extended
            '\u{0370}'..='\u{03FF}' | '\u{1F00}'..='\u{1FFF}' => Script::Greek,
            // Cyrillic + Supplement + Extended-A/B
            '\u{0400}'..='\u{052F}' | '\u{2DE0}'..='\u{2DFF}' | '\u{A640}'..='\u{A69F}' => {
                Script::Cyrillic
            }
            '\u{0530}'..='\u{058F}' | '\u{FB13}'..='\u{FB17}' => Script::Armenian,
            '\u{0590}'..='\u{05FF}' | '\u{FB1D}'..='\u{FB4F}' => Script::Hebrew,
            // Arabic + Supplement + Extended-A + Presentation Forms A/B
            '\u{0600}'..='\u{06FF}'
            | '\u{0750}'..='\u{077F}'
            | '\u{08A0}'..='\u{08FF}'
            | '\u{FB50}'..='\u{FDFF}'
            | '\u{FE70}'..='\u{FEFF}' => Script::Arabic,
            '\u{0900}'..='\u{097F}' | '\u{A8E0}'..='\u{A8FF}' => Script::Devanagari,
            '\u{0E00}'..='\u{0E7F}' => Script::Thai,
            '\u{10A0}'..='\u{10FF}' | '\u{1C90}'..='\u{1CBF}' | '\u{2D00}'..='\u{2D2F}' => {
                Script::Georgian
            }
            // Jamo + Compatibility Jamo + Jamo Extended-A + Syllables
            '\u{1100}'..='\u{11FF}'
            | '\u{3130}'..='\u{318F}'
            | '\u{A960}'..='\u{A97F}'
            | '\u{AC00}'..='\u{D7AF}' => Script::Hangul,
            '\u{3040}'..='\u{309F}' => Script::Hiragana,
            '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' | '\u{FF66}'..='\u{FF9F}' => {
                Script::Katakana
            }
            // CJK Unified Ideographs + Extension A/B + Compatibility Ideographs
            '\u{3400}'..='\u{4DBF}'
            | '\u{4E00}'..='\u{9FFF}'
            | '\u{F900}'..='\u{FAFF}'
            | '\u{20000}'..='\u{2A6DF}' => Script::Han,
            _ => return None,
        };
        Some(script)
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A small set of scripts, stored as a bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ScriptSet(u16);

impl ScriptSet {
    pub const EMPTY: ScriptSet = ScriptSet(0);

    pub fn from_scripts(scripts: &[Script]) -> Self {
        let mut set = Self::EMPTY;
        for &script in scripts {
            set.insert(script);
        }
        set
    }

    /// Collect the scripts of every character in the given tokens.
    pub fn of_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut set = Self::EMPTY;
        for token in tokens {
            for c in token.as_ref().chars() {
                if let Some(script) = Script::of(c) {
                    set.insert(script);
                }
            }
        }
        set
    }

    pub fn insert(&mut self, script: Script) {
        self.0 |= script.bit();
    }

    pub fn contains(&self, script: Script) -> bool {
        self.0 & script.bit() != 0
    }

    pub fn intersects(&self, other: &ScriptSet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Script> + '_ {
        Script::ALL.into_iter().filter(|s| self.contains(*s))
    }
}

/// Keep the candidates whose writing systems overlap the scripts present in the text.
///
/// Candidate order is preserved. The result is empty only when no candidate shares
/// a script with the text.
pub fn retain_compatible(candidates: &[Language], text_scripts: &ScriptSet) -> Vec<Language> {
    candidates
        .iter()
        .copied()
        .filter(|language| language.script_set().intersects(text_scripts))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_common_letters() {
        assert_eq!(Script::of('e'), Some(Script::Latin));
        assert_eq!(Script::of('é'), Some(Script::Latin));
        assert_eq!(Script::of('ж'), Some(Script::Cyrillic));
        assert_eq!(Script::of('λ'), Some(Script::Greek));
        assert_eq!(Script::of('ש'), Some(Script::Hebrew));
        assert_eq!(Script::of('ق'), Some(Script::Arabic));
        assert_eq!(Script::of('क'), Some(Script::Devanagari));
        assert_eq!(Script::of('ก'), Some(Script::Thai));
        assert_eq!(Script::of('ა'), Some(Script::Georgian));
        assert_eq!(Script::of('ա'), Some(Script::Armenian));
        assert_eq!(Script::of('한'), Some(Script::Hangul));
        assert_eq!(Script::of('の'), Some(Script::Hiragana));
        assert_eq!(Script::of('カ'), Some(Script::Katakana));
        assert_eq!(Script::of('中'), Some(Script::Han));
    }

    #[test]
    fn digits_and_punctuation_have_no_script() {
        for c in ['1', '.', ' ', '?', '\u{0301}', '€'] {
            assert_eq!(Script::of(c), None, "char {c:?}");
        }
    }

    #[test]
    fn script_set_collects_from_tokens() {
        let set = ScriptSet::of_tokens(&["hello", "мир", "世界"]);
        assert!(set.contains(Script::Latin));
        assert!(set.contains(Script::Cyrillic));
        assert!(set.contains(Script::Han));
        assert!(!set.contains(Script::Greek));
        assert_eq!(set.len(), 3);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Script::Latin, Script::Cyrillic, Script::Han]
        );
    }

    #[test]
    fn han_text_prunes_latin_candidates() {
        let scripts = ScriptSet::of_tokens(&["我们今天去公园散步"]);
        let kept = retain_compatible(
            &[Language::English, Language::French, Language::Chinese],
            &scripts,
        );
        assert_eq!(kept, vec![Language::Chinese]);
    }

    #[test]
    fn shared_script_languages_are_never_separated() {
        let scripts = ScriptSet::of_tokens(&["bonjour"]);
        let candidates = [
            Language::English,
            Language::French,
            Language::German,
            Language::Russian,
        ];
        let kept = retain_compatible(&candidates, &scripts);
        assert_eq!(
            kept,
            vec![Language::English, Language::French, Language::German]
        );
    }

    #[test]
    fn han_keeps_both_chinese_and_japanese() {
        let scripts = ScriptSet::of_tokens(&["東京"]);
        let kept = retain_compatible(&[Language::Chinese, Language::Japanese], &scripts);
        assert_eq!(kept, vec![Language::Chinese, Language::Japanese]);
    }

    #[test]
    fn unsupported_script_prunes_everything() {
        // Tamil is not a tagged script.
        let scripts = ScriptSet::of_tokens(&["வணக்கம்"]);
        assert!(scripts.is_empty());
        assert!(retain_compatible(&[Language::English, Language::Hindi], &scripts).is_empty());
    }
}
