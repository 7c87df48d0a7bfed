//! Seam for the primary deep model, an external collaborator.
//!
//! The pipeline never owns deep-model weights or inference; it only needs
//! a cheap availability probe at construction time and a black-box predict
//! call. Hosts that ship a model implement [`DeepModel`] and hand it to the
//! orchestrator; everyone else runs on the fallback tiers.

use std::path::Path;

use image::GrayImage;
use thiserror::Error;

use crate::labeling::Label;

/// Errors surfaced by a deep-model backend.
///
/// Any error cascades to the next tier; none is fatal to the caller.
#[derive(Debug, Error)]
pub enum DeepModelError {
    /// The backend rejected the input image.
    #[error("deep model rejected input: {0}")]
    BadInput(String),
    /// Inference failed inside the backend.
    #[error("deep model inference failed: {0}")]
    Inference(String),
}

/// Black-box primary classifier.
pub trait DeepModel {
    /// Human-readable backend name for logs.
    fn name(&self) -> &str;

    /// Predict a label for a preprocessed grayscale image.
    fn predict(&self, image: &GrayImage) -> Result<Label, DeepModelError>;
}

/// Cheap probe for deep-model weights.
///
/// Checked once when the orchestrator is built so an absent model costs a
/// single `stat`, not an error per classification.
pub fn weights_available(weights_path: &Path) -> bool {
    weights_path.is_file()
}
