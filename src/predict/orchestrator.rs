//! Ordered fallback chain over predictor tiers.
//!
//! Each tier either returns a label or cedes to the next; the chain is
//! walked once per request and ends in an unbiased coin flip, so a label
//! is always produced. Tier order is the design contract: deep model,
//! adaptive classifier, heuristic scorer, random.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use super::Prediction;
use super::deep::DeepModel;
use crate::analysis;
use crate::classify::adaptive::AdaptiveClassifier;
use crate::classify::heuristic::{self, HeuristicThresholds};
use crate::config::PipelineConfig;
use crate::labeling::Label;

/// Cascade token: a tier could not produce a label for this request.
#[derive(Debug, Error)]
#[error("prediction tier {tier} unavailable: {reason}")]
pub struct TierUnavailable {
    pub tier: &'static str,
    pub reason: String,
}

impl TierUnavailable {
    fn new(tier: &'static str, reason: impl Into<String>) -> Self {
        Self {
            tier,
            reason: reason.into(),
        }
    }
}

/// One stage of the fallback chain.
pub trait PredictorTier {
    fn name(&self) -> &'static str;

    /// Produce a label or cede to the next tier.
    fn try_predict(&mut self, image_path: &Path) -> Result<Prediction, TierUnavailable>;
}

/// Tier 1: the primary deep model, when a backend was provided.
pub struct DeepTier {
    model: Option<Box<dyn DeepModel>>,
}

impl DeepTier {
    pub fn new(model: Option<Box<dyn DeepModel>>) -> Self {
        Self { model }
    }

    pub fn absent() -> Self {
        Self { model: None }
    }
}

impl PredictorTier for DeepTier {
    fn name(&self) -> &'static str {
        "deep"
    }

    fn try_predict(&mut self, image_path: &Path) -> Result<Prediction, TierUnavailable> {
        let Some(model) = self.model.as_ref() else {
            return Err(TierUnavailable::new(self.name(), "no model attached"));
        };
        let image = analysis::raster::load_grayscale(image_path)
            .map_err(|err| TierUnavailable::new(self.name(), err.to_string()))?;
        match model.predict(&image) {
            Ok(label) => Ok(Prediction {
                label,
                confidence: None,
            }),
            Err(err) => Err(TierUnavailable::new(self.name(), err.to_string())),
        }
    }
}

/// Tier 2: the adaptive classifier.
///
/// Unavailable only while it cannot reach a trained state; once trained its
/// outcome is final because it degrades internally.
pub struct AdaptiveTier {
    classifier: AdaptiveClassifier,
}

impl AdaptiveTier {
    pub fn new(classifier: AdaptiveClassifier) -> Self {
        Self { classifier }
    }
}

impl PredictorTier for AdaptiveTier {
    fn name(&self) -> &'static str {
        "adaptive"
    }

    fn try_predict(&mut self, image_path: &Path) -> Result<Prediction, TierUnavailable> {
        if let Err(err) = self.classifier.ensure_trained() {
            return Err(TierUnavailable::new(self.name(), err.to_string()));
        }
        Ok(self.classifier.predict_trained(image_path))
    }
}

/// Tier 3: the detailed heuristic over extracted features.
pub struct HeuristicTier {
    thresholds: HeuristicThresholds,
}

impl HeuristicTier {
    pub fn new(thresholds: HeuristicThresholds) -> Self {
        Self { thresholds }
    }
}

impl PredictorTier for HeuristicTier {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn try_predict(&mut self, image_path: &Path) -> Result<Prediction, TierUnavailable> {
        match analysis::extract(image_path) {
            Ok(features) => Ok(Prediction {
                label: heuristic::score_detailed(&features, &self.thresholds),
                confidence: None,
            }),
            Err(err) => Err(TierUnavailable::new(self.name(), err.to_string())),
        }
    }
}

/// The ordered cascade. Always produces a label.
pub struct Orchestrator {
    tiers: Vec<Box<dyn PredictorTier>>,
    rng: StdRng,
}

impl Orchestrator {
    /// Build from an explicit tier list and a seed for the terminal
    /// random fallback.
    pub fn new(tiers: Vec<Box<dyn PredictorTier>>, seed: u64) -> Self {
        Self {
            tiers,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Default chain from config, with no deep model attached.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::with_deep_model(config, None)
    }

    /// Default chain from config, with an optional deep-model backend in
    /// the first tier.
    pub fn with_deep_model(config: &PipelineConfig, model: Option<Box<dyn DeepModel>>) -> Self {
        let tiers: Vec<Box<dyn PredictorTier>> = vec![
            Box::new(DeepTier::new(model)),
            Box::new(AdaptiveTier::new(AdaptiveClassifier::from_config(config))),
            Box::new(HeuristicTier::new(config.heuristic.clone())),
        ];
        Self::new(tiers, config.forest.seed)
    }

    /// Walk the chain once and return the first tier's label, falling back
    /// to an unbiased coin flip when every tier is unavailable.
    pub fn classify(&mut self, image_path: &Path) -> Prediction {
        for tier in &mut self.tiers {
            match tier.try_predict(image_path) {
                Ok(prediction) => {
                    tracing::debug!("Tier {} produced label: {}", tier.name(), prediction.label);
                    return prediction;
                }
                Err(err) => tracing::debug!("{err}"),
            }
        }

        let label = if self.rng.random_bool(0.5) {
            Label::Tumor
        } else {
            Label::NoTumor
        };
        tracing::debug!("All tiers unavailable; random fallback chose: {label}");
        Prediction {
            label,
            confidence: None,
        }
    }
}
