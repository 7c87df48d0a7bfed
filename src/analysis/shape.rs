use image::{GrayImage, Luma};
use imageproc::contours::{BorderType, find_contours};
use imageproc::point::Point;

/// Mid-range binarization threshold applied before contour extraction.
pub(crate) const BINARY_THRESHOLD: u8 = 127;

/// Area of the largest external contour, normalized by total image area.
///
/// Returns 0 when the binarized image contains no contours. Contour area is
/// the polygon area of the traced boundary, so single-pixel blobs count as 0.
pub(crate) fn largest_contour_area_ratio(image: &GrayImage) -> f64 {
    let binary = binarize(image, BINARY_THRESHOLD);
    let contours = find_contours::<i32>(&binary);
    let largest = contours
        .iter()
        .filter(|contour| contour.border_type == BorderType::Outer)
        .map(|contour| polygon_area(&contour.points))
        .fold(0.0_f64, f64::max);
    let total = (image.width() as f64) * (image.height() as f64);
    if total > 0.0 { largest / total } else { 0.0 }
}

fn binarize(image: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        if image.get_pixel(x, y).0[0] > threshold {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// Shoelace area of a closed contour.
fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0_f64;
    for (i, a) in points.iter().enumerate() {
        let b = &points[(i + 1) % points.len()];
        twice_area += a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64;
    }
    twice_area.abs() / 2.0
}
