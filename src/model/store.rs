//! The process-wide model store.
//!
//! [`ModelStore::global`] parses the bundled tables exactly once, under a
//! [`OnceLock`]. Concurrent first callers block on the same initialization and all
//! observe its single outcome; a failure is cached just like a success, so a corrupt
//! bundle is reported identically to every caller and never retried mid-query.
//!
//! Stores can also be built from a directory of `<code>.json` files or from a
//! compact bincode snapshot. Whatever the source, a store always holds exactly one
//! model per supported language.

use std::path::Path;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{ModelFile, NgramModel};
use crate::error::{DetectionError, DetectorResult, ModelError, ModelResult};
use crate::language::Language;

static GLOBAL_STORE: OnceLock<ModelResult<Arc<ModelStore>>> = OnceLock::new();

/// Bumped whenever the snapshot layout changes.
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    models: Vec<ModelFile>,
}

/// One immutable model per supported language.
#[derive(Debug)]
pub struct ModelStore {
    /// Indexed by `Language as usize`.
    models: Vec<NgramModel>,
}

impl ModelStore {
    /// The shared store built from the bundled models.
    ///
    /// The first call parses every bundled table; later calls return the cached
    /// result. This is the one-time initialization step of the engine: an `Err`
    /// here means the engine is unusable.
    pub fn global() -> ModelResult<Arc<ModelStore>> {
        GLOBAL_STORE
            .get_or_init(|| {
                let started = Instant::now();
                match ModelStore::bundled() {
                    Ok(store) => {
                        tracing::info!(
                            languages = store.models.len(),
                            ngrams = store.ngram_count(),
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "language model store initialized"
                        );
                        Ok(Arc::new(store))
                    }
                    Err(e) => {
                        tracing::warn!("failed to initialize language model store: {e}");
                        Err(e)
                    }
                }
            })
            .clone()
    }

    /// Parse a fresh store from the models compiled into the binary.
    pub fn bundled() -> ModelResult<Self> {
        Self::from_sources(|language| Ok(language.info().model_source.to_string()))
    }

    /// Load `<code>.json` for every supported language from `dir`.
    pub fn load_from_dir(dir: &Path) -> ModelResult<Self> {
        Self::from_sources(|language| {
            let path = dir.join(format!("{}.json", language.iso_code_639_1()));
            if !path.is_file() {
                return Err(ModelError::Missing {
                    language: language.iso_code_639_1().to_string(),
                });
            }
            std::fs::read_to_string(&path).map_err(|e| ModelError::io(&path, e))
        })
    }

    /// Load from a model directory or, for a regular file, a snapshot.
    pub fn load(path: &Path) -> ModelResult<Self> {
        if path.is_dir() {
            Self::load_from_dir(path)
        } else {
            Self::load_snapshot(path)
        }
    }

    fn from_sources<F>(read: F) -> ModelResult<Self>
    where
        F: Fn(Language) -> ModelResult<String> + Sync,
    {
        let languages: Vec<Language> = Language::all().collect();
        let models = languages
            .into_par_iter()
            .map(|language| NgramModel::from_json(language, &read(language)?))
            .collect::<ModelResult<Vec<_>>>()?;
        Ok(Self { models })
    }

    fn from_files(files: &[ModelFile]) -> ModelResult<Self> {
        let mut slots: Vec<Option<NgramModel>> = vec![None; Language::COUNT];
        for file in files {
            let language = Language::from_iso_code_639_1(&file.language).ok_or_else(|| {
                ModelError::Snapshot {
                    message: format!("unknown language \"{}\"", file.language),
                }
            })?;
            let slot = &mut slots[language as usize];
            if slot.is_some() {
                return Err(ModelError::Snapshot {
                    message: format!("language \"{}\" appears twice", file.language),
                });
            }
            *slot = Some(NgramModel::from_file(language, file)?);
        }

        let models = Language::all()
            .zip(slots)
            .map(|(language, slot)| {
                slot.ok_or_else(|| ModelError::Missing {
                    language: language.iso_code_639_1().to_string(),
                })
            })
            .collect::<ModelResult<Vec<_>>>()?;
        Ok(Self { models })
    }

    /// Every supported language, in stable order.
    pub fn supported_languages(&self) -> Vec<Language> {
        self.models.iter().map(NgramModel::language).collect()
    }

    pub fn model_for(&self, language: Language) -> &NgramModel {
        &self.models[language as usize]
    }

    /// Look up a model by ISO 639-1 code.
    pub fn model_for_code(&self, code: &str) -> DetectorResult<&NgramModel> {
        let language = code.parse::<Language>()?;
        Ok(self.model_for(language))
    }

    pub fn ngram_count(&self) -> usize {
        self.models.iter().map(NgramModel::len).sum()
    }

    /// Write every model as `<code>.json` into `dir`, creating it if needed.
    pub fn export_to_dir(&self, dir: &Path) -> ModelResult<()> {
        std::fs::create_dir_all(dir).map_err(|e| ModelError::io(dir, e))?;
        for model in &self.models {
            let path = dir.join(format!("{}.json", model.language().iso_code_639_1()));
            let mut json = model.to_json()?;
            json.push('\n');
            std::fs::write(&path, json).map_err(|e| ModelError::io(&path, e))?;
        }
        tracing::debug!(dir = %dir.display(), models = self.models.len(), "exported models");
        Ok(())
    }

    /// Encode every count table into a compact bincode snapshot.
    pub fn to_snapshot_bytes(&self) -> ModelResult<Vec<u8>> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            models: self.models.iter().map(NgramModel::to_file).collect(),
        };
        bincode::serialize(&snapshot).map_err(|e| ModelError::Snapshot {
            message: e.to_string(),
        })
    }

    pub fn from_snapshot_bytes(bytes: &[u8]) -> ModelResult<Self> {
        let snapshot: Snapshot = bincode::deserialize(bytes).map_err(|e| ModelError::Snapshot {
            message: e.to_string(),
        })?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(ModelError::Snapshot {
                message: format!(
                    "snapshot version {} (expected {SNAPSHOT_VERSION})",
                    snapshot.version
                ),
            });
        }
        Self::from_files(&snapshot.models)
    }

    pub fn write_snapshot(&self, path: &Path) -> ModelResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ModelError::io(parent, e))?;
        }
        let bytes = self.to_snapshot_bytes()?;
        std::fs::write(path, bytes).map_err(|e| ModelError::io(path, e))
    }

    pub fn load_snapshot(path: &Path) -> ModelResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| ModelError::io(path, e))?;
        Self::from_snapshot_bytes(&bytes)
    }
}

/// Initialize the shared store. Idempotent; see [`ModelStore::global`].
pub fn initialize() -> ModelResult<Arc<ModelStore>> {
    ModelStore::global()
}

/// Map a list of codes to languages, reporting every unknown code at once.
pub(crate) fn resolve_codes<S: AsRef<str>>(codes: &[S]) -> DetectorResult<Vec<Language>> {
    let mut languages = Vec::with_capacity(codes.len());
    let mut unknown = Vec::new();
    for code in codes {
        match Language::from_iso_code_639_1(code.as_ref()) {
            Some(language) => languages.push(language),
            None => unknown.push(code.as_ref().trim().to_string()),
        }
    }
    if unknown.is_empty() {
        Ok(languages)
    } else {
        Err(DetectionError::UnsupportedLanguage { codes: unknown })
    }
}
