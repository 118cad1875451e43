//! Rich diagnostic error types for the glossa engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so callers know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the glossa engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum GlossaError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Detection(#[from] DetectionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Model errors
// ---------------------------------------------------------------------------

/// Failure to load or persist n-gram models.
///
/// Every variant is a `ModelLoadFailure` in the engine's taxonomy: the store that
/// produced it is unusable. Variants carry owned strings so the outcome of the
/// one-time store initialization can be cached and handed to every caller.
#[derive(Debug, Clone, Error, Diagnostic)]
pub enum ModelError {
    #[error("model data missing for language \"{language}\"")]
    #[diagnostic(
        code(glossa::model::missing),
        help(
            "Every supported language needs a model. When loading from a directory, \
             make sure it contains one `<code>.json` file per supported language \
             (export the bundled set with `glossa models export --dir <dir>`)."
        )
    )]
    Missing { language: String },

    #[error("corrupt model for language \"{language}\": {message}")]
    #[diagnostic(
        code(glossa::model::corrupt),
        help(
            "The frequency table failed validation. Regenerate the file or restore \
             it from the bundled models; hand edits must keep every count positive \
             and each order's total equal to the sum of its counts."
        )
    )]
    Corrupt { language: String, message: String },

    #[error("failed to access model file {path}: {message}")]
    #[diagnostic(
        code(glossa::model::io),
        help("Check that the path exists and is readable (or writable, when exporting).")
    )]
    Io { path: String, message: String },

    #[error("invalid model snapshot: {message}")]
    #[diagnostic(
        code(glossa::model::snapshot),
        help(
            "The snapshot could not be decoded. It was probably written by an \
             incompatible version; write a fresh one with `glossa models snapshot`."
        )
    )]
    Snapshot { message: String },
}

impl ModelError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: source.to_string(),
        }
    }

    pub(crate) fn corrupt(language: &str, message: impl Into<String>) -> Self {
        Self::Corrupt {
            language: language.to_string(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Detection errors
// ---------------------------------------------------------------------------

/// Errors raised while constructing or querying a detector.
#[derive(Debug, Error, Diagnostic)]
pub enum DetectionError {
    #[error("unsupported language code(s): {}", .codes.join(", "))]
    #[diagnostic(
        code(glossa::detect::unsupported_language),
        help(
            "Use ISO 639-1 codes of supported languages (run `glossa languages` for \
             the list). Confidence queries must name one of the detector's own candidates."
        )
    )]
    UnsupportedLanguage { codes: Vec<String> },

    #[error("invalid input: {message}")]
    #[diagnostic(code(glossa::detect::invalid_input), help("{message}"))]
    InvalidInput { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    ModelLoad(#[from] ModelError),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file: {path}")]
    #[diagnostic(
        code(glossa::config::read),
        help("Ensure the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config file: {path}")]
    #[diagnostic(
        code(glossa::config::write),
        help("Check that the parent directory exists and you have write permissions.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    #[diagnostic(
        code(glossa::config::parse),
        help(
            "Check the TOML syntax. Recognized keys: `languages`, `models`, and a \
             `[detector]` table with `minimum_relative_distance` and `low_accuracy`."
        )
    )]
    Parse { path: String, message: String },
}

/// Result alias for model loading and persistence.
pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// Result alias for detector construction and queries.
pub type DetectorResult<T> = std::result::Result<T, DetectionError>;

/// Result alias for configuration handling.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Convenience alias for functions returning glossa results.
pub type GlossaResult<T> = std::result::Result<T, GlossaError>;
