//! Automatic labeling helpers.
//!
//! Labels are inferred from filename conventions only and bootstrap the
//! adaptive classifier's training set. Filenames are a weak proxy for
//! medical ground truth; nothing here validates them against pixel content.

pub mod filename;

use serde::{Deserialize, Serialize};

/// Binary classification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// No tumor present.
    NoTumor,
    /// Tumor present.
    Tumor,
}

impl Label {
    /// Class index used by the classifier (0 = no tumor, 1 = tumor).
    pub fn class_index(self) -> usize {
        match self {
            Label::NoTumor => 0,
            Label::Tumor => 1,
        }
    }

    /// Map a classifier class index back to a label.
    pub fn from_class_index(index: usize) -> Option<Label> {
        match index {
            0 => Some(Label::NoTumor),
            1 => Some(Label::Tumor),
            _ => None,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::NoTumor => write!(f, "no tumor"),
            Label::Tumor => write!(f, "tumor"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_indices_round_trip() {
        assert_eq!(Label::from_class_index(Label::Tumor.class_index()), Some(Label::Tumor));
        assert_eq!(Label::from_class_index(Label::NoTumor.class_index()), Some(Label::NoTumor));
        assert_eq!(Label::from_class_index(2), None);
    }
}
