use image::GrayImage;
use rustfft::{FftPlanner, num_complex::Complex};

/// Statistics of the log-scaled 2D FFT magnitude spectrum.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SpectrumStats {
    pub(crate) mean: f64,
    pub(crate) std: f64,
}

/// 2D FFT of the intensity plane, rows then columns.
///
/// The magnitude spectrum is log-scaled with a +1 offset to avoid the
/// singularity at zero magnitude. Mean and std are invariant under the
/// usual DC-centering shift, so no shift is applied.
pub(crate) fn spectrum_stats(image: &GrayImage) -> SpectrumStats {
    let width = image.width() as usize;
    let height = image.height() as usize;

    let mut grid: Vec<Complex<f32>> = image
        .as_raw()
        .iter()
        .map(|&p| Complex::new(p as f32, 0.0))
        .collect();

    let mut planner = FftPlanner::<f32>::new();
    let row_fft = planner.plan_fft_forward(width);
    for row in grid.chunks_exact_mut(width) {
        row_fft.process(row);
    }

    let col_fft = planner.plan_fft_forward(height);
    let mut column = vec![Complex::new(0.0, 0.0); height];
    for x in 0..width {
        for (y, cell) in column.iter_mut().enumerate() {
            *cell = grid[y * width + x];
        }
        col_fft.process(&mut column);
        for (y, cell) in column.iter().enumerate() {
            grid[y * width + x] = *cell;
        }
    }

    let count = grid.len().max(1) as f64;
    let magnitudes: Vec<f64> = grid
        .iter()
        .map(|z| (1.0 + z.norm() as f64).ln())
        .collect();
    let mean = magnitudes.iter().sum::<f64>() / count;
    let mut var = 0.0_f64;
    for &m in &magnitudes {
        let d = m - mean;
        var += d * d;
    }

    SpectrumStats {
        mean,
        std: (var / count).sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_image_has_empty_spectrum() {
        let image = GrayImage::from_pixel(16, 16, image::Luma([0u8]));
        let stats = spectrum_stats(&image);
        assert!(stats.mean.abs() < 1e-6);
        assert!(stats.std.abs() < 1e-6);
    }

    #[test]
    fn flat_image_concentrates_energy_in_dc() {
        let image = GrayImage::from_pixel(8, 8, image::Luma([100u8]));
        let stats = spectrum_stats(&image);
        // One huge DC bin among 64 near-zero bins: small mean, large spread.
        assert!(stats.mean > 0.0);
        assert!(stats.std > stats.mean);
    }

    #[test]
    fn textured_image_spreads_energy() {
        let flat = GrayImage::from_pixel(16, 16, image::Luma([128u8]));
        let striped = GrayImage::from_fn(16, 16, |x, _| {
            if x % 2 == 0 { image::Luma([255u8]) } else { image::Luma([0u8]) }
        });
        let flat_stats = spectrum_stats(&flat);
        let striped_stats = spectrum_stats(&striped);
        assert!(striped_stats.mean > flat_stats.mean);
    }
}
