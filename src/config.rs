//! Pipeline tunables loaded from an optional `neuroscan.toml` in the app dir.
//!
//! Every field has a default matching the shipped thresholds, so a missing
//! or malformed file silently yields the stock configuration.

use std::path::PathBuf;

use serde::Deserialize;

use crate::classify::heuristic::HeuristicThresholds;
use crate::ml::forest::TrainOptions;

pub const CONFIG_FILE_NAME: &str = "neuroscan.toml";

/// Tunables for the whole inference pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Directory scanned for filename-labeled training images.
    #[serde(default = "default_training_dir")]
    pub training_dir: PathBuf,
    /// Optional weights file for the primary deep model tier.
    #[serde(default)]
    pub deep_weights: Option<PathBuf>,
    /// Heuristic scorer thresholds.
    #[serde(default)]
    pub heuristic: HeuristicThresholds,
    /// Random-forest training parameters.
    #[serde(default)]
    pub forest: TrainOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            training_dir: default_training_dir(),
            deep_weights: None,
            heuristic: HeuristicThresholds::default(),
            forest: TrainOptions::default(),
        }
    }
}

fn default_training_dir() -> PathBuf {
    PathBuf::from("uploads")
}

pub fn config_path() -> Option<PathBuf> {
    let dir = crate::app_dirs::app_root_dir().ok()?;
    Some(dir.join(CONFIG_FILE_NAME))
}

/// Load the config from the app dir, falling back to defaults on any failure.
pub fn load_from_app_dir() -> PipelineConfig {
    let Some(path) = config_path() else {
        return PipelineConfig::default();
    };
    let Ok(text) = std::fs::read_to_string(&path) else {
        return PipelineConfig::default();
    };
    match toml::from_str::<PipelineConfig>(&text) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Ignoring malformed {CONFIG_FILE_NAME}: {err}");
            PipelineConfig::default()
        }
    }
}
