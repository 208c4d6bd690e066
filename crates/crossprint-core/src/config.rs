use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::consts::{DEFAULT_FULL_CAP_LONG_EDGE, DEFAULT_PREVIEW_LONG_EDGE, DEFAULT_THRESHOLD};
use crate::error::{CrossPrintError, Result};
use crate::history::ThresholdSource;

/// Editor settings, read from TOML. Every field has a default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Image id that threshold applies start from.
    pub threshold_source: ThresholdSource,
    /// Slider value before the user picks one.
    pub default_threshold: u8,
    /// Directory suggested for exports.
    pub export_dir: PathBuf,
    pub store: StoreConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            threshold_source: ThresholdSource::default(),
            default_threshold: DEFAULT_THRESHOLD,
            export_dir: PathBuf::from("output"),
            store: StoreConfig::default(),
        }
    }
}

/// Limits of the local image store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Long edge of the preview bitmap sent to the editor.
    pub preview_long_edge: u32,
    /// Full-resolution images are downscaled beyond this long edge.
    pub full_cap_long_edge: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            preview_long_edge: DEFAULT_PREVIEW_LONG_EDGE,
            full_cap_long_edge: DEFAULT_FULL_CAP_LONG_EDGE,
        }
    }
}

impl EditorConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CrossPrintError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CrossPrintError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load `path` if it exists; otherwise, or on a parse error, use defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), "ignoring config: {e}");
                Self::default()
            }
        }
    }
}
