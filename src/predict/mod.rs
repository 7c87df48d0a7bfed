//! Predictor tiers and the fallback orchestrator.

pub mod deep;
pub mod orchestrator;

use serde::{Deserialize, Serialize};

use crate::labeling::Label;

pub use deep::{DeepModel, DeepModelError, weights_available};
pub use orchestrator::{Orchestrator, PredictorTier, TierUnavailable};

/// Outcome of one classification request.
///
/// Confidence is populated only when the adaptive classifier produced the
/// label; its absence is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: Label,
    pub confidence: Option<f64>,
}
