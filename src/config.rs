use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::loader::{IngestOptions, DEFAULT_SENTINEL};
use crate::data::normalize::SolarReference;

/// Analysis settings, read from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub solar: SolarReference,
    /// Absence marker in numeric columns.
    #[serde(default = "AnalysisConfig::default_sentinel")]
    pub sentinel: String,
    /// Draw internal and literature stars as separate point groups.
    #[serde(default = "AnalysisConfig::default_provenance_groups")]
    pub provenance_groups: bool,
    #[serde(default = "AnalysisConfig::default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "AnalysisConfig::default_image_width")]
    pub image_width: u32,
    #[serde(default = "AnalysisConfig::default_image_height")]
    pub image_height: u32,
}

impl AnalysisConfig {
    fn default_sentinel() -> String {
        DEFAULT_SENTINEL.to_string()
    }
    fn default_provenance_groups() -> bool {
        true
    }
    fn default_output_dir() -> PathBuf {
        PathBuf::from("charts")
    }
    fn default_image_width() -> u32 {
        800
    }
    fn default_image_height() -> u32 {
        600
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            sentinel: self.sentinel.clone(),
        }
    }

    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    /// Read `path` if it exists. A missing file is created with the defaults;
    /// an unreadable or invalid one falls back to defaults with a warning.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(contents) => match serde_json::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        log::warn!(
                            "Failed to parse config {}: {err}. Using defaults.",
                            path.display()
                        );
                    }
                },
                Err(err) => {
                    log::warn!(
                        "Failed to read config {}: {err}. Using defaults.",
                        path.display()
                    );
                }
            }
            return Self::default();
        }

        let default_cfg = Self::default();
        match serde_json::to_string_pretty(&default_cfg) {
            Ok(text) => {
                if let Err(err) = fs::write(path, text) {
                    log::warn!(
                        "Failed to write default config to {}: {err}",
                        path.display()
                    );
                }
            }
            Err(err) => log::warn!("Failed to serialize default config: {err}"),
        }
        default_cfg
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            solar: SolarReference::default(),
            sentinel: Self::default_sentinel(),
            provenance_groups: Self::default_provenance_groups(),
            output_dir: Self::default_output_dir(),
            image_width: Self::default_image_width(),
            image_height: Self::default_image_height(),
        }
    }
}
