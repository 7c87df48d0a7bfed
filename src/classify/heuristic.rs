//! Rule-based scorers with fixed, explainable thresholds.
//!
//! No training step; the decision rules reproduce exactly given the same
//! thresholds. The detailed scorer votes over five features; the simple
//! scorer uses brightness and contrast only and is the degradation path
//! when no full feature vector exists.

use rand::Rng;
use rand::rngs::StdRng;
use serde::Deserialize;

use crate::analysis::ScanFeatures;
use crate::labeling::Label;

/// Detailed scorer emits tumor when at least this many rules fire.
const DETAILED_MIN_SCORE: i32 = 2;

/// Fixed thresholds for both scorer modes.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeuristicThresholds {
    /// Brightness above this counts toward tumor.
    pub bright_high: f64,
    /// Brightness below this counts against tumor.
    pub bright_low: f64,
    /// Contrast threshold used by the detailed scorer.
    pub contrast_detailed: f64,
    /// Contrast threshold used by the simple scorer.
    pub contrast_simple: f64,
    /// Edge-density threshold.
    pub edge_density: f64,
    /// Texture-variance threshold.
    pub texture_variance: f64,
    /// Histogram-std threshold.
    pub hist_std: f64,
}

impl Default for HeuristicThresholds {
    fn default() -> Self {
        Self {
            bright_high: 120.0,
            bright_low: 80.0,
            contrast_detailed: 40.0,
            contrast_simple: 30.0,
            edge_density: 0.1,
            texture_variance: 500.0,
            hist_std: 2000.0,
        }
    }
}

/// Score a full feature vector; pure and deterministic.
pub fn score_detailed(features: &ScanFeatures, thresholds: &HeuristicThresholds) -> Label {
    let mut score = 0i32;

    if features.mean_brightness > thresholds.bright_high {
        score += 1;
    } else if features.mean_brightness < thresholds.bright_low {
        score -= 1;
    }
    if features.std_brightness > thresholds.contrast_detailed {
        score += 1;
    }
    if features.edge_density > thresholds.edge_density {
        score += 1;
    }
    if features.texture_variance > thresholds.texture_variance {
        score += 1;
    }
    if features.hist_std > thresholds.hist_std {
        score += 1;
    }

    if score >= DETAILED_MIN_SCORE {
        Label::Tumor
    } else {
        Label::NoTumor
    }
}

/// Score raw brightness/contrast when no feature vector is available.
///
/// Uncertain inputs (brightness inside the band, low contrast) draw an
/// unbiased vote from the injected random source.
pub fn score_simple(
    brightness: f64,
    contrast: f64,
    thresholds: &HeuristicThresholds,
    rng: &mut StdRng,
) -> Label {
    if brightness > thresholds.bright_high && contrast > thresholds.contrast_simple {
        Label::Tumor
    } else if brightness < thresholds.bright_low {
        Label::NoTumor
    } else if rng.random_bool(0.5) {
        Label::Tumor
    } else {
        Label::NoTumor
    }
}
