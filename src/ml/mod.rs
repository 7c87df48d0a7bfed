//! Classical ML building blocks: feature scaling and a seeded random forest.

pub mod forest;
pub mod scaler;
