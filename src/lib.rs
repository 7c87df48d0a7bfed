//! Tiered tumor-presence classification for medical scan images.
//!
//! The crate owns the fallback-chain inference pipeline only: feature
//! extraction, an on-demand-trained statistical classifier, a rule-based
//! heuristic scorer, and the orchestration among them. Transport, storage
//! and report rendering live in outer layers that call [`classify()`].
/// Image decoding and feature extraction.
pub mod analysis;
/// Application directory helpers.
pub mod app_dirs;
/// Heuristic scorer and the adaptive classifier lifecycle.
pub mod classify;
/// Pipeline tunables loaded from an optional TOML file.
pub mod config;
/// Training-directory scanning.
pub mod dataset;
/// Filename-convention weak labels.
pub mod labeling;
/// Logging setup.
pub mod logging;
/// Feature scaling and the seeded random-forest classifier.
pub mod ml;
/// Predictor tiers and the fallback orchestrator.
pub mod predict;

pub use labeling::Label;
pub use predict::{Orchestrator, Prediction};

use std::path::Path;

/// Classify a scan image with a default orchestrator.
///
/// Builds the full tier chain from the app-dir config (no deep model
/// attached) and runs one cascade. Always produces a label; see
/// [`predict::Orchestrator`] for the tier contract.
pub fn classify(image_path: &Path) -> Prediction {
    let config = config::load_from_app_dir();
    let mut orchestrator = Orchestrator::from_config(&config);
    orchestrator.classify(image_path)
}
