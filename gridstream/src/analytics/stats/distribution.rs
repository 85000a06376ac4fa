use super::{Result, StatsError};

const SIZE_STEP: f64 = 0.001;

/// Normalised `x / (1 - x)` density over `[size_min, size_max)` sampled every 0.001.
#[derive(Debug, PartialEq, Clone)]
pub struct SizeDistribution {
    pub sizes: Vec<f64>,
    pub frequencies: Vec<f64>,
}

/// antiderivative of `x / (1 - x)`
fn integral(x: f64) -> f64 {
    -x - (1.0 - x).ln()
}

pub fn freq_vs_size(size_min: f64, size_max: f64) -> Result<SizeDistribution> {
    if !(size_min < size_max && size_max < 1.0) {
        return Err(StatsError::InvalidSizeRange(size_min, size_max));
    }

    let area = integral(size_max) - integral(size_min);
    let steps = ((size_max - size_min) / SIZE_STEP).ceil() as usize;
    let sizes: Vec<f64> = (0..steps)
        .map(|i| size_min + i as f64 * SIZE_STEP)
        .filter(|x| *x < size_max)
        .collect();
    let frequencies = sizes.iter().map(|x| x / (1.0 - x) / area).collect();

    Ok(SizeDistribution { sizes, frequencies })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_freq_vs_size() {
        let dist = freq_vs_size(0.1, 0.5).unwrap();
        assert!((dist.sizes.len() as i64 - 400).abs() <= 1);
        assert_eq!(dist.sizes[0], 0.1);
        assert!(*dist.sizes.last().unwrap() < 0.5);

        let area = integral(0.5) - integral(0.1);
        assert!((dist.frequencies[0] - (0.1 / 0.9) / area).abs() < 1e-12);

        // the density integrates to about one
        let total: f64 = dist.frequencies.iter().map(|y| y * SIZE_STEP).sum();
        assert!((total - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_invalid_range() {
        assert!(freq_vs_size(0.5, 0.1).is_err());
        assert!(freq_vs_size(0.1, 1.0).is_err());
        assert!(freq_vs_size(0.1, 0.1).is_err());
    }
}
