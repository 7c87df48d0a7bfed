//! Random forest of axis-aligned decision trees.
//!
//! Trained in-process on small filename-labeled datasets; all randomness
//! flows from one seed so repeated trainings reproduce bit-identical models.

mod model;
mod train;

pub use model::{DecisionTree, ForestModel, TreeNode};
pub use train::{TrainDataset, TrainOptions, train_forest};
