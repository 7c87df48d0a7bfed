//! On-demand-trained statistical classifier with graceful degradation.

use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use crate::analysis::{self, FEATURE_LEN};
use crate::classify::heuristic::{self, HeuristicThresholds};
use crate::config::PipelineConfig;
use crate::dataset::{self, DatasetError};
use crate::labeling::Label;
use crate::ml::forest::{ForestModel, TrainDataset, TrainOptions, train_forest};
use crate::ml::scaler::FeatureScaler;
use crate::predict::Prediction;

/// Minimum filename-labeled files required per class.
pub const MIN_FILES_PER_CLASS: usize = 2;
/// Minimum successful feature extractions across both classes.
pub const MIN_EXTRACTED_SAMPLES: usize = 4;

/// Errors leaving the classifier untrained.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error(transparent)]
    Scan(#[from] DatasetError),
    #[error(
        "insufficient training data: {tumor_files} tumor / {clear_files} clear files, {extracted} extracted"
    )]
    InsufficientData {
        tumor_files: usize,
        clear_files: usize,
        extracted: usize,
    },
    #[error("failed to fit classifier: {0}")]
    Fit(String),
}

/// Summary of one successful training pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainReport {
    pub tumor_samples: usize,
    pub clear_samples: usize,
    pub total: usize,
}

#[derive(Debug, Clone)]
struct TrainedState {
    scaler: FeatureScaler,
    forest: ForestModel,
}

/// Classifier that trains itself from a directory of filename-labeled
/// images on first use.
///
/// Constructed empty; `train` transitions it to the fitted state for the
/// rest of the process's life. Nothing is persisted, so a fresh process
/// retrains before its first confident prediction. Internal failures never
/// escape `predict`: they degrade to the simple heuristic or a random vote.
#[derive(Debug)]
pub struct AdaptiveClassifier {
    training_dir: PathBuf,
    thresholds: HeuristicThresholds,
    options: TrainOptions,
    state: Option<TrainedState>,
    rng: StdRng,
}

impl AdaptiveClassifier {
    pub fn new(
        training_dir: PathBuf,
        thresholds: HeuristicThresholds,
        options: TrainOptions,
    ) -> Self {
        let rng = StdRng::seed_from_u64(options.seed);
        Self {
            training_dir,
            thresholds,
            options,
            state: None,
            rng,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            config.training_dir.clone(),
            config.heuristic.clone(),
            config.forest.clone(),
        )
    }

    /// Whether a fitted scaler and forest are resident.
    pub fn is_trained(&self) -> bool {
        self.state.is_some()
    }

    /// Scan the training directory and fit scaler + forest.
    ///
    /// Leaves the classifier untrained on any error.
    pub fn train(&mut self) -> Result<TrainReport, TrainError> {
        let set = dataset::collect(&self.training_dir)?;
        if set.tumor_files < MIN_FILES_PER_CLASS
            || set.clear_files < MIN_FILES_PER_CLASS
            || set.samples.len() < MIN_EXTRACTED_SAMPLES
        {
            return Err(TrainError::InsufficientData {
                tumor_files: set.tumor_files,
                clear_files: set.clear_files,
                extracted: set.samples.len(),
            });
        }

        let rows: Vec<Vec<f64>> = set
            .samples
            .iter()
            .map(|sample| sample.features.to_vec())
            .collect();
        let scaler = FeatureScaler::fit(&rows).map_err(TrainError::Fit)?;
        let scaled: Vec<Vec<f64>> = rows.iter().map(|row| scaler.transform(row)).collect();
        let labels: Vec<usize> = set
            .samples
            .iter()
            .map(|sample| sample.label.class_index())
            .collect();

        let forest = train_forest(
            &TrainDataset {
                feature_len: FEATURE_LEN,
                n_classes: 2,
                x: scaled,
                y: labels,
            },
            &self.options,
        )
        .map_err(TrainError::Fit)?;

        let report = TrainReport {
            tumor_samples: set.samples_with(Label::Tumor),
            clear_samples: set.samples_with(Label::NoTumor),
            total: set.samples.len(),
        };
        tracing::info!(
            "Trained classifier on {} images ({} tumor, {} clear)",
            report.total,
            report.tumor_samples,
            report.clear_samples
        );
        self.state = Some(TrainedState { scaler, forest });
        Ok(report)
    }

    /// Train unless already trained in this process.
    pub fn ensure_trained(&mut self) -> Result<(), TrainError> {
        if self.is_trained() {
            return Ok(());
        }
        self.train().map(|_| ())
    }

    /// Predict with lazy training; never fails.
    pub fn predict(&mut self, image_path: &Path) -> Prediction {
        if let Err(err) = self.ensure_trained() {
            tracing::debug!("Training unavailable, degrading: {err}");
            return self.degraded_predict(image_path);
        }
        self.predict_trained(image_path)
    }

    /// Predict with the fitted model; extraction failure degrades to the
    /// simple heuristic, never an error.
    pub(crate) fn predict_trained(&mut self, image_path: &Path) -> Prediction {
        let Some(state) = self.state.as_ref() else {
            return self.degraded_predict(image_path);
        };
        match analysis::extract(image_path) {
            Ok(features) => {
                let scaled = state.scaler.transform(&features.to_vector());
                let proba = state.forest.predict_proba(&scaled);
                let (class, confidence) = top_class(&proba);
                tracing::debug!("Prediction confidence: {confidence:.2}");
                Prediction {
                    label: Label::from_class_index(class).unwrap_or(Label::NoTumor),
                    confidence: Some(confidence),
                }
            }
            Err(err) => {
                tracing::debug!(
                    "Extraction failed for {}, degrading: {err}",
                    image_path.display()
                );
                self.degraded_predict(image_path)
            }
        }
    }

    fn degraded_predict(&mut self, image_path: &Path) -> Prediction {
        let label = match analysis::raster::quick_stats(image_path) {
            Ok((brightness, contrast)) => {
                heuristic::score_simple(brightness, contrast, &self.thresholds, &mut self.rng)
            }
            Err(_) => self.random_label(),
        };
        Prediction {
            label,
            confidence: None,
        }
    }

    fn random_label(&mut self) -> Label {
        use rand::Rng;
        if self.rng.random_bool(0.5) {
            Label::Tumor
        } else {
            Label::NoTumor
        }
    }
}

fn top_class(proba: &[f64]) -> (usize, f64) {
    let mut best_idx = 0usize;
    let mut best_val = f64::NEG_INFINITY;
    for (idx, &p) in proba.iter().enumerate() {
        if p > best_val {
            best_val = p;
            best_idx = idx;
        }
    }
    (best_idx, best_val.max(0.0))
}
