//! Detector tuning and the TOML configuration file read by the CLI.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Query-time behaviour of a detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// `detect_language_of` returns `None` when the two best confidences are closer
    /// than this. Must lie in `[0, 0.99]`; `0.0` disables the check.
    pub minimum_relative_distance: f64,
    /// Score trigrams only. Faster, less accurate on short texts.
    pub low_accuracy: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            minimum_relative_distance: 0.0,
            low_accuracy: false,
        }
    }
}

impl DetectorConfig {
    pub const MAX_RELATIVE_DISTANCE: f64 = 0.99;

    /// Reason the configuration is unusable, if any.
    pub fn validate(&self) -> Result<(), String> {
        let d = self.minimum_relative_distance;
        if !(0.0..=Self::MAX_RELATIVE_DISTANCE).contains(&d) {
            return Err(format!(
                "minimum relative distance must lie in [0, {}], got {d}",
                Self::MAX_RELATIVE_DISTANCE
            ));
        }
        Ok(())
    }
}

/// Contents of a `glossa.toml` file.
///
/// ```toml
/// languages = ["en", "fr", "de"]
/// models = "/opt/glossa/models.bin"
///
/// [detector]
/// minimum_relative_distance = 0.1
/// low_accuracy = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlossaConfig {
    /// Candidate languages; empty means every supported language.
    pub languages: Vec<String>,
    /// Model directory or snapshot; `None` uses the bundled models.
    pub models: Option<PathBuf>,
    pub detector: DetectorConfig,
}

impl GlossaConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content).map_err(|message| ConfigError::Parse {
            path: path.display().to_string(),
            message,
        })
    }

    fn from_toml(content: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(content).map_err(|e| e.to_string())?;
        config.detector.validate()?;
        Ok(config)
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }
}
