//! Training-set collection from a directory of filename-labeled images.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::analysis::{self, FEATURE_LEN};
use crate::labeling::{Label, filename};

/// Image file extensions considered for training.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read training directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A feature vector paired with its filename-derived label.
#[derive(Debug, Clone)]
pub struct LabeledSample {
    pub features: [f64; FEATURE_LEN],
    pub label: Label,
    pub path: PathBuf,
}

/// Everything collected from one directory scan.
///
/// File counts are per filename label, before extraction; `samples` holds
/// only the files whose features extracted successfully.
#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    pub samples: Vec<LabeledSample>,
    pub tumor_files: usize,
    pub clear_files: usize,
    pub failed_extractions: usize,
}

impl TrainingSet {
    /// Number of extracted samples carrying the given label.
    pub fn samples_with(&self, label: Label) -> usize {
        self.samples
            .iter()
            .filter(|sample| sample.label == label)
            .count()
    }
}

/// Scan a directory for labeled images and extract their features.
///
/// Files whose names match no labeling rule are ignored; extraction
/// failures are counted but do not abort the scan. Entries are visited in
/// path order so repeated scans produce identical training sets.
pub fn collect(dir: &Path) -> Result<TrainingSet, DatasetError> {
    let entries = std::fs::read_dir(dir).map_err(|source| DatasetError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut labeled: Vec<(PathBuf, Label)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_supported_image(path))
        .filter_map(|path| {
            filename::label_for_path(&path).map(|found| (path, found.label))
        })
        .collect();
    labeled.sort_by(|a, b| a.0.cmp(&b.0));

    let mut set = TrainingSet::default();
    for (_, label) in &labeled {
        match label {
            Label::Tumor => set.tumor_files += 1,
            Label::NoTumor => set.clear_files += 1,
        }
    }

    for (path, label) in labeled {
        match analysis::extract(&path) {
            Ok(features) => set.samples.push(LabeledSample {
                features: features.to_vector(),
                label,
                path,
            }),
            Err(err) => {
                tracing::debug!("Skipping {}: {err}", path.display());
                set.failed_extractions += 1;
            }
        }
    }

    tracing::info!(
        "Collected {} training samples ({} tumor, {} clear files, {} failed)",
        set.samples.len(),
        set.tumor_files,
        set.clear_files,
        set.failed_extractions
    );
    Ok(set)
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.iter().any(|&allowed| allowed == ext)
        })
        .unwrap_or(false)
}
