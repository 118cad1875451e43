// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # glossa
//!
//! Statistical language identification over character n-gram models.
//!
//! ## Architecture
//!
//! - **Model store** (`model`): One immutable 1–5-gram frequency model per supported
//!   language, bundled into the binary and parsed once behind a `OnceLock`
//! - **Preprocessing** (`preprocess`): NFC normalization, lowercasing, tokenization
//! - **Alphabet filter** (`script`): Prunes candidates whose scripts the text never uses
//! - **Scoring** (`scorer`): Summed log-probabilities with additive smoothing
//! - **Normalization** (`confidence`): Softmax over scores into a ranked distribution
//! - **Detectors** (`detector`, `api`): Immutable, thread-safe query handles
//!
//! ## Library usage
//!
//! ```no_run
//! use glossa::{Language, LanguageDetector};
//!
//! let detector = LanguageDetector::for_languages(&["en", "fr", "es", "de"]).unwrap();
//! assert_eq!(
//!     detector.detect_language_of("Bonjour, comment allez-vous?"),
//!     Some(Language::French)
//! );
//!
//! for entry in detector.compute_language_confidence_values("Wie geht es dir?").iter() {
//!     println!("{entry}");
//! }
//! ```

pub mod api;
pub mod confidence;
pub mod config;
pub mod detector;
pub mod error;
pub mod language;
pub mod model;
pub mod preprocess;
pub mod scorer;
pub mod script;

pub use confidence::{ConfidenceEntry, DetectionResult};
pub use config::{DetectorConfig, GlossaConfig};
pub use detector::{DetectorBuilder, LanguageDetector, SentenceDetection};
pub use error::{DetectionError, GlossaError, ModelError};
pub use language::Language;
pub use model::ModelStore;
pub use model::store::initialize;
pub use script::Script;
