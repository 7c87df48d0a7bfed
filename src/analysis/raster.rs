use std::path::Path;

use image::GrayImage;

use super::features::ExtractError;

/// Decode an image file into 8-bit grayscale.
///
/// Color sources are collapsed to a single intensity channel; zero-sized
/// images are rejected so downstream statistics never divide by zero.
pub(crate) fn load_grayscale(path: &Path) -> Result<GrayImage, ExtractError> {
    let image = image::open(path)?.to_luma8();
    if image.width() == 0 || image.height() == 0 {
        return Err(ExtractError::EmptyImage);
    }
    Ok(image)
}

/// Mean and standard deviation of raw pixel intensities.
///
/// Cheaper than full feature extraction; used by the simple heuristic when
/// the full vector is unavailable.
pub(crate) fn quick_stats(path: &Path) -> Result<(f64, f64), ExtractError> {
    let image = load_grayscale(path)?;
    let stats = super::intensity::intensity_stats(&image);
    Ok((stats.mean, stats.std))
}
