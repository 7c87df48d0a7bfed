//! Heuristic scoring and the adaptive classifier lifecycle.

pub mod adaptive;
pub mod heuristic;

pub use adaptive::{AdaptiveClassifier, TrainError, TrainReport};
pub use heuristic::HeuristicThresholds;
