use image::GrayImage;

/// First-order statistics over all pixel intensities.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct IntensityStats {
    pub(crate) mean: f64,
    pub(crate) std: f64,
    pub(crate) variance: f64,
    pub(crate) max: f64,
    pub(crate) min: f64,
}

/// Statistics over the 256-bin intensity histogram's bin counts.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HistogramStats {
    pub(crate) mean: f64,
    pub(crate) std: f64,
    pub(crate) p25: f64,
    pub(crate) p75: f64,
}

pub(crate) fn intensity_stats(image: &GrayImage) -> IntensityStats {
    let pixels = image.as_raw();
    let count = pixels.len().max(1) as f64;

    let mut sum = 0.0_f64;
    let mut max = u8::MIN;
    let mut min = u8::MAX;
    for &value in pixels {
        sum += value as f64;
        max = max.max(value);
        min = min.min(value);
    }
    let mean = sum / count;

    let mut var = 0.0_f64;
    for &value in pixels {
        let d = value as f64 - mean;
        var += d * d;
    }
    let variance = var / count;

    IntensityStats {
        mean,
        std: variance.sqrt(),
        variance,
        max: max as f64,
        min: min as f64,
    }
}

pub(crate) fn histogram_stats(image: &GrayImage) -> HistogramStats {
    let mut counts = [0u32; 256];
    for &value in image.as_raw() {
        counts[value as usize] += 1;
    }
    let bins: Vec<f64> = counts.iter().map(|&c| c as f64).collect();

    let mean = bins.iter().sum::<f64>() / bins.len() as f64;
    let mut var = 0.0_f64;
    for &count in &bins {
        let d = count - mean;
        var += d * d;
    }
    let std = (var / bins.len() as f64).sqrt();

    let mut sorted = bins;
    sorted.sort_by(|a, b| a.total_cmp(b));
    HistogramStats {
        mean,
        std,
        p25: percentile(&sorted, 25.0),
        p75: percentile(&sorted, 75.0),
    }
}

/// Linear-interpolated percentile over an ascending-sorted slice.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}
