//! End-to-end exercise of the tier cascade on synthetic scans.

use std::path::Path;

use image::GrayImage;
use neuroscan::analysis;
use neuroscan::classify::adaptive::{AdaptiveClassifier, TrainError};
use neuroscan::classify::heuristic::{self, HeuristicThresholds};
use neuroscan::config::PipelineConfig;
use neuroscan::labeling::Label;
use neuroscan::ml::forest::TrainOptions;
use neuroscan::predict::Orchestrator;
use tempfile::tempdir;

/// Bright lesion-like blob on a mid-gray field.
fn write_positive(dir: &Path, name: &str) {
    let image = GrayImage::from_fn(48, 48, |x, y| {
        let dx = x as i32 - 24;
        let dy = y as i32 - 24;
        if dx * dx + dy * dy < 100 {
            image::Luma([235u8])
        } else {
            image::Luma([110u8])
        }
    });
    image.save(dir.join(name)).unwrap();
}

/// Low-intensity scan with mild gradient texture.
fn write_negative(dir: &Path, name: &str) {
    let image = GrayImage::from_fn(48, 48, |x, y| image::Luma([((x * 2 + y) % 45) as u8]));
    image.save(dir.join(name)).unwrap();
}

fn small_forest() -> TrainOptions {
    TrainOptions {
        trees: 20,
        ..TrainOptions::default()
    }
}

#[test]
fn balanced_training_set_yields_confident_predictions() {
    let uploads = tempdir().unwrap();
    for idx in 0..4 {
        write_positive(uploads.path(), &format!("Y_{idx}.png"));
        write_negative(uploads.path(), &format!("N_{idx}.png"));
    }

    let mut classifier = AdaptiveClassifier::new(
        uploads.path().to_path_buf(),
        HeuristicThresholds::default(),
        small_forest(),
    );
    let report = classifier.train().unwrap();
    assert_eq!(report.tumor_samples, 4);
    assert_eq!(report.clear_samples, 4);

    let prediction = classifier.predict(&uploads.path().join("Y_0.png"));
    assert_eq!(prediction.label, Label::Tumor);
    let confidence = prediction.confidence.expect("trained path reports confidence");
    assert!((0.0..=1.0).contains(&confidence));

    let prediction = classifier.predict(&uploads.path().join("N_2.png"));
    assert_eq!(prediction.label, Label::NoTumor);
}

#[test]
fn unbalanced_training_set_is_rejected() {
    let uploads = tempdir().unwrap();
    write_positive(uploads.path(), "Y_lonely.png");
    for idx in 0..5 {
        write_negative(uploads.path(), &format!("N_{idx}.png"));
    }

    let mut classifier = AdaptiveClassifier::new(
        uploads.path().to_path_buf(),
        HeuristicThresholds::default(),
        small_forest(),
    );
    assert!(matches!(
        classifier.train(),
        Err(TrainError::InsufficientData { .. })
    ));
}

#[test]
fn repeated_runs_reproduce_labels() {
    let uploads = tempdir().unwrap();
    for idx in 0..3 {
        write_positive(uploads.path(), &format!("Y_{idx}.png"));
        write_negative(uploads.path(), &format!("N_{idx}.png"));
    }
    let target = uploads.path().join("Y_1.png");

    let mut labels = Vec::new();
    for _ in 0..2 {
        let mut classifier = AdaptiveClassifier::new(
            uploads.path().to_path_buf(),
            HeuristicThresholds::default(),
            small_forest(),
        );
        labels.push(classifier.predict(&target));
    }
    assert_eq!(labels[0].label, labels[1].label);
    assert_eq!(labels[0].confidence, labels[1].confidence);
}

#[test]
fn orchestrator_without_training_data_matches_heuristic() {
    let scans = tempdir().unwrap();
    let scan = scans.path().join("incoming.png");
    write_positive(scans.path(), "incoming.png");

    let empty_uploads = tempdir().unwrap();
    let mut config = PipelineConfig::default();
    config.training_dir = empty_uploads.path().to_path_buf();
    config.forest = small_forest();

    let mut orchestrator = Orchestrator::from_config(&config);
    let prediction = orchestrator.classify(&scan);

    let features = analysis::extract(&scan).unwrap();
    let expected = heuristic::score_detailed(&features, &config.heuristic);
    assert_eq!(prediction.label, expected);
    assert!(prediction.confidence.is_none());
}

#[test]
fn orchestrator_always_produces_a_label() {
    let empty_uploads = tempdir().unwrap();
    let mut config = PipelineConfig::default();
    config.training_dir = empty_uploads.path().to_path_buf();

    let mut orchestrator = Orchestrator::from_config(&config);
    // Unreadable input defeats every tier; the terminal coin flip answers.
    let prediction = orchestrator.classify(Path::new("/definitely/not/here.png"));
    assert!(prediction.confidence.is_none());
}
