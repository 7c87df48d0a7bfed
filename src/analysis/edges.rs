use image::GrayImage;

/// Canny hysteresis thresholds; fixed, matching the pipeline contract.
pub(crate) const CANNY_LOW: f32 = 50.0;
pub(crate) const CANNY_HIGH: f32 = 150.0;

/// Fraction of pixels marked as edges by a Canny detector.
pub(crate) fn edge_density(image: &GrayImage) -> f64 {
    let edges = imageproc::edges::canny(image, CANNY_LOW, CANNY_HIGH);
    let total = (edges.width() as u64 * edges.height() as u64).max(1);
    let marked = edges.as_raw().iter().filter(|&&p| p > 0).count() as u64;
    marked as f64 / total as f64
}
