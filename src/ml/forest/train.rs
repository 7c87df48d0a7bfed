use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use super::model::{DecisionTree, ForestModel, TreeNode};

/// Training hyperparameters for the forest.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrainOptions {
    /// Number of trees in the ensemble.
    pub trees: usize,
    /// Maximum tree depth.
    pub max_depth: usize,
    /// Minimum rows on each side of a split.
    pub min_leaf: usize,
    /// Seed for bootstrap sampling and feature subsampling.
    pub seed: u64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            trees: 100,
            max_depth: 12,
            min_leaf: 1,
            seed: 42,
        }
    }
}

/// In-memory dataset used for training.
#[derive(Debug, Clone)]
pub struct TrainDataset {
    /// Number of `f64` values in each feature vector.
    pub feature_len: usize,
    /// Number of classes.
    pub n_classes: usize,
    /// Feature matrix, row-major.
    pub x: Vec<Vec<f64>>,
    /// Class indices aligned with `x`.
    pub y: Vec<usize>,
}

/// Train a bagged forest with Gini splits and sqrt-feature subsampling.
pub fn train_forest(dataset: &TrainDataset, options: &TrainOptions) -> Result<ForestModel, String> {
    if dataset.x.len() != dataset.y.len() {
        return Err("Mismatched X/Y lengths".to_string());
    }
    if dataset.x.is_empty() {
        return Err("Empty dataset".to_string());
    }
    if dataset.n_classes < 2 {
        return Err("Need at least 2 classes".to_string());
    }
    if options.trees == 0 {
        return Err("Need at least one tree".to_string());
    }
    for (idx, row) in dataset.x.iter().enumerate() {
        if row.len() != dataset.feature_len {
            return Err(format!(
                "Row {idx} has {} features but expected {}",
                row.len(),
                dataset.feature_len
            ));
        }
    }
    for &label in &dataset.y {
        if label >= dataset.n_classes {
            return Err(format!("Class index {label} out of range"));
        }
    }

    let mut rng = StdRng::seed_from_u64(options.seed);
    let n = dataset.x.len();
    let candidates = sqrt_feature_count(dataset.feature_len);

    let mut trees = Vec::with_capacity(options.trees);
    for _ in 0..options.trees {
        let sample: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
        let mut nodes = Vec::new();
        grow_node(&mut nodes, dataset, &sample, 0, options, candidates, &mut rng);
        trees.push(DecisionTree { nodes });
    }

    let model = ForestModel {
        model_version: 1,
        feature_len: dataset.feature_len,
        n_classes: dataset.n_classes,
        trees,
    };
    model.validate()?;
    Ok(model)
}

fn sqrt_feature_count(feature_len: usize) -> usize {
    ((feature_len as f64).sqrt().round() as usize).clamp(1, feature_len.max(1))
}

fn grow_node(
    nodes: &mut Vec<TreeNode>,
    dataset: &TrainDataset,
    rows: &[usize],
    depth: usize,
    options: &TrainOptions,
    candidates: usize,
    rng: &mut StdRng,
) -> usize {
    let idx = nodes.len();
    nodes.push(TreeNode::Leaf { probs: Vec::new() });

    let counts = class_counts(rows, &dataset.y, dataset.n_classes);
    let at_limit = depth >= options.max_depth || rows.len() < options.min_leaf.saturating_mul(2);
    if at_limit || is_pure(&counts) {
        nodes[idx] = leaf_from_counts(&counts, rows.len());
        return idx;
    }

    let Some(split) = best_split(dataset, rows, candidates, options.min_leaf, rng) else {
        nodes[idx] = leaf_from_counts(&counts, rows.len());
        return idx;
    };

    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
        .iter()
        .copied()
        .partition(|&row| dataset.x[row][split.feature_index] <= split.threshold);

    let left = grow_node(nodes, dataset, &left_rows, depth + 1, options, candidates, rng);
    let right = grow_node(nodes, dataset, &right_rows, depth + 1, options, candidates, rng);
    nodes[idx] = TreeNode::Split {
        feature_index: split.feature_index as u16,
        threshold: split.threshold,
        left,
        right,
    };
    idx
}

#[derive(Debug, Clone)]
struct CandidateSplit {
    feature_index: usize,
    threshold: f64,
    score: f64,
}

fn best_split(
    dataset: &TrainDataset,
    rows: &[usize],
    candidates: usize,
    min_leaf: usize,
    rng: &mut StdRng,
) -> Option<CandidateSplit> {
    let mut features: Vec<usize> = (0..dataset.feature_len).collect();
    features.shuffle(rng);
    features.truncate(candidates.max(1));

    let total = rows.len();
    let mut best: Option<CandidateSplit> = None;

    for feature_index in features {
        let mut pairs: Vec<(f64, usize)> = rows
            .iter()
            .map(|&row| (dataset.x[row][feature_index], dataset.y[row]))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut left_counts = vec![0usize; dataset.n_classes];
        let mut right_counts = class_counts(rows, &dataset.y, dataset.n_classes);

        for i in 0..total - 1 {
            let class = pairs[i].1;
            left_counts[class] += 1;
            right_counts[class] -= 1;

            // No threshold separates equal values.
            if pairs[i].0 == pairs[i + 1].0 {
                continue;
            }
            let n_left = i + 1;
            let n_right = total - n_left;
            if n_left < min_leaf || n_right < min_leaf {
                continue;
            }

            let score = (n_left as f64 * gini(&left_counts, n_left)
                + n_right as f64 * gini(&right_counts, n_right))
                / total as f64;
            let improves = best.as_ref().map(|b| score < b.score).unwrap_or(true);
            if improves {
                best = Some(CandidateSplit {
                    feature_index,
                    threshold: (pairs[i].0 + pairs[i + 1].0) / 2.0,
                    score,
                });
            }
        }
    }
    best
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let mut sum_sq = 0.0_f64;
    for &count in counts {
        let p = count as f64 / total as f64;
        sum_sq += p * p;
    }
    1.0 - sum_sq
}

fn class_counts(rows: &[usize], y: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for &row in rows {
        if y[row] < n_classes {
            counts[y[row]] += 1;
        }
    }
    counts
}

fn is_pure(counts: &[usize]) -> bool {
    counts.iter().filter(|&&c| c > 0).count() <= 1
}

fn leaf_from_counts(counts: &[usize], total: usize) -> TreeNode {
    let total = total.max(1) as f64;
    TreeNode::Leaf {
        probs: counts.iter().map(|&c| c as f64 / total).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable_dataset() -> TrainDataset {
        // Class 0 clusters near the origin, class 1 near (10, 10).
        let x = vec![
            vec![0.0, 0.5],
            vec![0.4, 0.1],
            vec![0.2, 0.3],
            vec![9.8, 10.1],
            vec![10.2, 9.9],
            vec![10.0, 10.4],
        ];
        let y = vec![0, 0, 0, 1, 1, 1];
        TrainDataset {
            feature_len: 2,
            n_classes: 2,
            x,
            y,
        }
    }

    #[test]
    fn learns_a_separable_problem() {
        let dataset = separable_dataset();
        let options = TrainOptions {
            trees: 25,
            ..TrainOptions::default()
        };
        let model = train_forest(&dataset, &options).unwrap();

        assert_eq!(model.predict_class_index(&[0.1, 0.2]), 0);
        assert_eq!(model.predict_class_index(&[10.0, 10.0]), 1);
        let proba = model.predict_proba(&[10.0, 10.0]);
        assert!(proba[1] > 0.7);
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn same_seed_reproduces_the_model() {
        let dataset = separable_dataset();
        let options = TrainOptions::default();
        let first = train_forest(&dataset, &options).unwrap();
        let second = train_forest(&dataset, &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn different_seeds_may_differ_but_stay_valid() {
        let dataset = separable_dataset();
        let a = train_forest(
            &dataset,
            &TrainOptions {
                seed: 1,
                ..TrainOptions::default()
            },
        )
        .unwrap();
        a.validate().unwrap();
        assert_eq!(a.predict_class_index(&[0.0, 0.0]), 0);
    }

    #[test]
    fn rejects_degenerate_inputs() {
        let mut dataset = separable_dataset();
        dataset.n_classes = 1;
        assert!(train_forest(&dataset, &TrainOptions::default()).is_err());

        let empty = TrainDataset {
            feature_len: 2,
            n_classes: 2,
            x: Vec::new(),
            y: Vec::new(),
        };
        assert!(train_forest(&empty, &TrainOptions::default()).is_err());
    }
}
