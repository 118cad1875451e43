//! The closed set of supported languages.
//!
//! Each [`Language`] indexes a static table entry carrying its ISO 639-1 code, English
//! name, writing systems and the bundled n-gram model source. Nothing about a language
//! is decided at runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DetectionError;
use crate::script::{Script, ScriptSet};

/// A supported language.
///
/// Declaration order is the engine's stable order: it is what
/// [`Language::all`] yields and what the model store reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "pt")]
    Portuguese,
    #[serde(rename = "nl")]
    Dutch,
    #[serde(rename = "sv")]
    Swedish,
    #[serde(rename = "pl")]
    Polish,
    #[serde(rename = "tr")]
    Turkish,
    #[serde(rename = "ru")]
    Russian,
    #[serde(rename = "uk")]
    Ukrainian,
    #[serde(rename = "bg")]
    Bulgarian,
    #[serde(rename = "el")]
    Greek,
    #[serde(rename = "he")]
    Hebrew,
    #[serde(rename = "ar")]
    Arabic,
    #[serde(rename = "fa")]
    Persian,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "th")]
    Thai,
    #[serde(rename = "ka")]
    Georgian,
    #[serde(rename = "hy")]
    Armenian,
}

/// Static description of one language.
#[derive(Debug)]
pub struct LanguageInfo {
    pub language: Language,
    /// ISO 639-1 code, lower-case.
    pub code: &'static str,
    /// English name.
    pub name: &'static str,
    pub scripts: &'static [Script],
    /// Bundled model, in the JSON table format read by [`crate::model::NgramModel`].
    pub model_source: &'static str,
}

const LATIN: &[Script] = &[Script::Latin];
const CYRILLIC: &[Script] = &[Script::Cyrillic];
const ARABIC: &[Script] = &[Script::Arabic];

macro_rules! entry {
    ($language:ident, $code:literal, $name:literal, $scripts:expr) => {
        LanguageInfo {
            language: Language::$language,
            code: $code,
            name: $name,
            scripts: $scripts,
            model_source: include_str!(concat!("../data/models/", $code, ".json")),
        }
    };
}

/// Indexed by `Language as usize`.
static LANGUAGE_TABLE: [LanguageInfo; Language::COUNT] = [
    entry!(English, "en", "English", LATIN),
    entry!(French, "fr", "French", LATIN),
    entry!(Spanish, "es", "Spanish", LATIN),
    entry!(German, "de", "German", LATIN),
    entry!(Italian, "it", "Italian", LATIN),
    entry!(Portuguese, "pt", "Portuguese", LATIN),
    entry!(Dutch, "nl", "Dutch", LATIN),
    entry!(Swedish, "sv", "Swedish", LATIN),
    entry!(Polish, "pl", "Polish", LATIN),
    entry!(Turkish, "tr", "Turkish", LATIN),
    entry!(Russian, "ru", "Russian", CYRILLIC),
    entry!(Ukrainian, "uk", "Ukrainian", CYRILLIC),
    entry!(Bulgarian, "bg", "Bulgarian", CYRILLIC),
    entry!(Greek, "el", "Greek", &[Script::Greek]),
    entry!(Hebrew, "he", "Hebrew", &[Script::Hebrew]),
    entry!(Arabic, "ar", "Arabic", ARABIC),
    entry!(Persian, "fa", "Persian", ARABIC),
    entry!(Hindi, "hi", "Hindi", &[Script::Devanagari]),
    entry!(Chinese, "zh", "Chinese", &[Script::Han]),
    entry!(
        Japanese,
        "ja",
        "Japanese",
        &[Script::Han, Script::Hiragana, Script::Katakana]
    ),
    entry!(Korean, "ko", "Korean", &[Script::Hangul]),
    entry!(Thai, "th", "Thai", &[Script::Thai]),
    entry!(Georgian, "ka", "Georgian", &[Script::Georgian]),
    entry!(Armenian, "hy", "Armenian", &[Script::Armenian]),
];

impl Language {
    /// Number of supported languages.
    pub const COUNT: usize = 24;

    /// Every supported language in stable order.
    pub fn all() -> impl ExactSizeIterator<Item = Language> {
        LANGUAGE_TABLE.iter().map(|info| info.language)
    }

    pub fn info(self) -> &'static LanguageInfo {
        &LANGUAGE_TABLE[self as usize]
    }

    /// Lower-case ISO 639-1 code, e.g. `"fr"`.
    pub fn iso_code_639_1(self) -> &'static str {
        self.info().code
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn scripts(self) -> &'static [Script] {
        self.info().scripts
    }

    pub fn script_set(self) -> ScriptSet {
        ScriptSet::from_scripts(self.scripts())
    }

    /// Look up a language by ISO 639-1 code. Surrounding whitespace and case are ignored.
    pub fn from_iso_code_639_1(code: &str) -> Option<Language> {
        let code = code.trim();
        LANGUAGE_TABLE
            .iter()
            .find(|info| info.code.eq_ignore_ascii_case(code))
            .map(|info| info.language)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = DetectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_iso_code_639_1(s).ok_or_else(|| DetectionError::UnsupportedLanguage {
            codes: vec![s.trim().to_string()],
        })
    }
}
