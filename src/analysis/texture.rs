use image::GrayImage;
use imageproc::filter::box_filter;

/// Statistics of the residual between an image and its 5x5 box blur.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextureStats {
    pub(crate) mean: f64,
    pub(crate) std: f64,
    pub(crate) variance: f64,
}

pub(crate) fn texture_stats(image: &GrayImage) -> TextureStats {
    // Radius 2 in each axis gives the 5x5 mean kernel.
    let blurred = box_filter(image, 2, 2);
    let count = image.as_raw().len().max(1) as f64;

    let mut sum = 0.0_f64;
    for (&raw, &smooth) in image.as_raw().iter().zip(blurred.as_raw()) {
        sum += raw as f64 - smooth as f64;
    }
    let mean = sum / count;

    let mut var = 0.0_f64;
    for (&raw, &smooth) in image.as_raw().iter().zip(blurred.as_raw()) {
        let d = (raw as f64 - smooth as f64) - mean;
        var += d * d;
    }
    let variance = var / count;

    TextureStats {
        mean,
        std: variance.sqrt(),
        variance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_image_has_zero_residual() {
        let image = GrayImage::from_pixel(16, 16, image::Luma([80u8]));
        let stats = texture_stats(&image);
        assert!(stats.mean.abs() < 1e-9);
        assert!(stats.variance.abs() < 1e-9);
    }

    #[test]
    fn checkerboard_has_high_residual_variance() {
        let image = GrayImage::from_fn(32, 32, |x, y| {
            if (x + y) % 2 == 0 { image::Luma([255u8]) } else { image::Luma([0u8]) }
        });
        let stats = texture_stats(&image);
        assert!(stats.variance > 1_000.0);
    }
}
