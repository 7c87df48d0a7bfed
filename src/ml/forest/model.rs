use serde::{Deserialize, Serialize};

/// One node of a fitted decision tree, stored in an arena.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum TreeNode {
    /// Terminal node holding the class distribution of its training rows.
    Leaf {
        /// Class probabilities, indexed by class.
        probs: Vec<f64>,
    },
    /// Internal split; rows with `feature <= threshold` go left.
    Split {
        /// Feature index used for the split.
        feature_index: u16,
        /// Threshold in (scaled) feature units.
        threshold: f64,
        /// Arena index of the left child.
        left: usize,
        /// Arena index of the right child.
        right: usize,
    },
}

/// A single fitted tree; the root lives at arena index 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Walk the tree and return the leaf class distribution.
    pub fn predict_probs<'a>(&'a self, features: &[f64]) -> &'a [f64] {
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { probs } => return probs,
                TreeNode::Split {
                    feature_index,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(*feature_index as usize).copied().unwrap_or(0.0);
                    idx = if value <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

/// Bagged ensemble of decision trees for multi-class classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForestModel {
    /// Model format version.
    pub model_version: i64,
    /// Number of `f64` values per feature vector.
    pub feature_len: usize,
    /// Number of classes the forest votes over.
    pub n_classes: usize,
    /// Fitted trees; probabilities are averaged across them.
    pub trees: Vec<DecisionTree>,
}

impl ForestModel {
    /// Validate structural invariants of the model.
    pub fn validate(&self) -> Result<(), String> {
        if self.n_classes < 2 {
            return Err("Model must contain at least 2 classes".to_string());
        }
        if self.trees.is_empty() {
            return Err("Model must contain at least one tree".to_string());
        }
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(format!("Tree {tree_idx} has no nodes"));
            }
            for node in &tree.nodes {
                match node {
                    TreeNode::Leaf { probs } if probs.len() != self.n_classes => {
                        return Err(format!(
                            "Tree {tree_idx} leaf has {} classes but expected {}",
                            probs.len(),
                            self.n_classes
                        ));
                    }
                    TreeNode::Split { left, right, .. }
                        if *left >= tree.nodes.len() || *right >= tree.nodes.len() =>
                    {
                        return Err(format!("Tree {tree_idx} split points outside its arena"));
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Average class probabilities across all trees.
    pub fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        let mut sums = vec![0.0_f64; self.n_classes];
        for tree in &self.trees {
            for (k, &p) in tree.predict_probs(features).iter().enumerate() {
                if k < sums.len() {
                    sums[k] += p;
                }
            }
        }
        let count = self.trees.len().max(1) as f64;
        for sum in &mut sums {
            *sum /= count;
        }
        sums
    }

    /// Predict the best class index for a feature vector.
    pub fn predict_class_index(&self, features: &[f64]) -> usize {
        argmax(&self.predict_proba(features))
    }
}

fn argmax(values: &[f64]) -> usize {
    let mut best_idx = 0usize;
    let mut best_val = f64::NEG_INFINITY;
    for (idx, &v) in values.iter().enumerate() {
        if v > best_val {
            best_val = v;
            best_idx = idx;
        }
    }
    best_idx
}
