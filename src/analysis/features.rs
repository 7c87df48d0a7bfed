//! Fixed-length feature vector extracted from a scan image.

use std::path::Path;

use image::GrayImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of statistics in a feature vector.
pub const FEATURE_LEN: usize = 16;

/// Errors preventing feature extraction.
///
/// Extraction is all-or-nothing; on any failure no vector exists and the
/// caller moves to its next fallback tier.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The file could not be read or decoded as an image.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    /// The decoded image has a zero dimension.
    #[error("image has no pixels")]
    EmptyImage,
}

/// The full statistical summary of one scan image.
///
/// Field order is the vector order and must match between training and
/// prediction; see [`ScanFeatures::to_vector`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanFeatures {
    /// Mean pixel intensity.
    pub mean_brightness: f64,
    /// Standard deviation of pixel intensity (contrast).
    pub std_brightness: f64,
    /// Variance of pixel intensity.
    pub variance: f64,
    /// Maximum pixel intensity.
    pub max_intensity: f64,
    /// Minimum pixel intensity.
    pub min_intensity: f64,
    /// Mean of the 256-bin histogram counts.
    pub hist_mean: f64,
    /// Standard deviation of histogram counts.
    pub hist_std: f64,
    /// 25th percentile of histogram counts.
    pub hist_p25: f64,
    /// 75th percentile of histogram counts.
    pub hist_p75: f64,
    /// Fraction of pixels marked by the Canny edge detector.
    pub edge_density: f64,
    /// Mean of the 5x5 box-blur residual.
    pub texture_mean: f64,
    /// Standard deviation of the box-blur residual.
    pub texture_std: f64,
    /// Variance of the box-blur residual.
    pub texture_variance: f64,
    /// Largest external contour area over total image area.
    pub contour_area_ratio: f64,
    /// Mean of the log-scaled FFT magnitude spectrum.
    pub fft_mean: f64,
    /// Standard deviation of the log-scaled FFT magnitude spectrum.
    pub fft_std: f64,
}

impl ScanFeatures {
    /// Flatten into the documented 16-element order.
    pub fn to_vector(&self) -> [f64; FEATURE_LEN] {
        [
            self.mean_brightness,
            self.std_brightness,
            self.variance,
            self.max_intensity,
            self.min_intensity,
            self.hist_mean,
            self.hist_std,
            self.hist_p25,
            self.hist_p75,
            self.edge_density,
            self.texture_mean,
            self.texture_std,
            self.texture_variance,
            self.contour_area_ratio,
            self.fft_mean,
            self.fft_std,
        ]
    }
}

/// Extract the full feature vector from an image file.
pub fn extract(path: &Path) -> Result<ScanFeatures, ExtractError> {
    let image = super::raster::load_grayscale(path)?;
    Ok(extract_from_gray(&image))
}

pub(crate) fn extract_from_gray(image: &GrayImage) -> ScanFeatures {
    let intensity = super::intensity::intensity_stats(image);
    let histogram = super::intensity::histogram_stats(image);
    let edge_density = super::edges::edge_density(image);
    let texture = super::texture::texture_stats(image);
    let contour_area_ratio = super::shape::largest_contour_area_ratio(image);
    let spectrum = super::spectrum::spectrum_stats(image);

    ScanFeatures {
        mean_brightness: intensity.mean,
        std_brightness: intensity.std,
        variance: intensity.variance,
        max_intensity: intensity.max,
        min_intensity: intensity.min,
        hist_mean: histogram.mean,
        hist_std: histogram.std,
        hist_p25: histogram.p25,
        hist_p75: histogram.p75,
        edge_density,
        texture_mean: texture.mean,
        texture_std: texture.std,
        texture_variance: texture.variance,
        contour_area_ratio,
        fft_mean: spectrum.mean,
        fft_std: spectrum.std,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn vector_has_documented_length_and_order() {
        let image = GrayImage::from_fn(32, 32, |x, y| image::Luma([((x * 7 + y * 3) % 256) as u8]));
        let features = extract_from_gray(&image);
        let vector = features.to_vector();
        assert_eq!(vector.len(), FEATURE_LEN);
        assert!((vector[0] - features.mean_brightness).abs() < 1e-12);
        assert!((vector[1] - features.std_brightness).abs() < 1e-12);
        assert!((vector[9] - features.edge_density).abs() < 1e-12);
        assert!((vector[12] - features.texture_variance).abs() < 1e-12);
        assert!((vector[15] - features.fft_std).abs() < 1e-12);
    }

    #[test]
    fn extract_round_trips_through_a_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Y_sample.png");
        let image = GrayImage::from_fn(48, 48, |x, y| {
            if (16..32).contains(&x) && (16..32).contains(&y) {
                image::Luma([230u8])
            } else {
                image::Luma([40u8])
            }
        });
        image.save(&path).unwrap();

        let features = extract(&path).unwrap();
        assert!(features.mean_brightness > 40.0);
        assert!(features.mean_brightness < 230.0);
        assert!(features.edge_density > 0.0);
        assert!(features.contour_area_ratio > 0.0);
    }

    #[test]
    fn unreadable_file_yields_no_vector() {
        let dir = tempdir().unwrap();
        assert!(extract(&dir.path().join("missing.jpg")).is_err());
    }
}
