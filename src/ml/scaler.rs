use serde::{Deserialize, Serialize};

/// Per-dimension standardization transform (zero mean, unit variance).
///
/// Fitted once over the training matrix; the same transform must be applied
/// to every vector at prediction time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl FeatureScaler {
    /// Fit the transform over training rows.
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self, String> {
        let Some(first) = rows.first() else {
            return Err("Cannot fit scaler on an empty matrix".to_string());
        };
        let dims = first.len();
        if dims == 0 {
            return Err("Cannot fit scaler on zero-length vectors".to_string());
        }
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != dims {
                return Err(format!(
                    "Row {idx} has {} dimensions but expected {dims}",
                    row.len()
                ));
            }
        }

        let n = rows.len() as f64;
        let mut means = vec![0.0_f64; dims];
        for row in rows {
            for (j, &v) in row.iter().enumerate() {
                means[j] += v;
            }
        }
        for mean in &mut means {
            *mean /= n;
        }

        let mut scales = vec![0.0_f64; dims];
        for row in rows {
            for (j, &v) in row.iter().enumerate() {
                let d = v - means[j];
                scales[j] += d * d;
            }
        }
        for scale in &mut scales {
            let std = (*scale / n).sqrt();
            // Constant dimensions pass through unscaled.
            *scale = if std > 0.0 { std } else { 1.0 };
        }

        Ok(Self { means, scales })
    }

    /// Number of dimensions the transform was fitted for.
    pub fn dims(&self) -> usize {
        self.means.len()
    }

    /// Standardize one vector; out-of-range dimensions read as 0.
    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        self.means
            .iter()
            .zip(&self.scales)
            .enumerate()
            .map(|(j, (&mean, &scale))| {
                let v = row.get(j).copied().unwrap_or(0.0);
                (v - mean) / scale
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standardizes_to_zero_mean_unit_variance() {
        let rows = vec![vec![1.0, 10.0], vec![3.0, 30.0], vec![5.0, 50.0]];
        let scaler = FeatureScaler::fit(&rows).unwrap();
        let transformed: Vec<Vec<f64>> = rows.iter().map(|r| scaler.transform(r)).collect();

        for j in 0..2 {
            let mean: f64 = transformed.iter().map(|r| r[j]).sum::<f64>() / 3.0;
            let var: f64 = transformed.iter().map(|r| (r[j] - mean).powi(2)).sum::<f64>() / 3.0;
            assert!(mean.abs() < 1e-9);
            assert!((var - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn constant_dimension_does_not_blow_up() {
        let rows = vec![vec![7.0, 1.0], vec![7.0, 2.0]];
        let scaler = FeatureScaler::fit(&rows).unwrap();
        let out = scaler.transform(&[7.0, 1.5]);
        assert!(out[0].abs() < 1e-9);
        assert!(out[0].is_finite());
    }

    #[test]
    fn mismatched_rows_are_rejected() {
        let rows = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(FeatureScaler::fit(&rows).is_err());
        assert!(FeatureScaler::fit(&[]).is_err());
    }
}
