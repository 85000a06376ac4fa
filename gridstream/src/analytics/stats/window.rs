use super::{Result, StatsError};

/// Result of a trailing window statistic.
#[derive(Debug, PartialEq, Clone)]
pub struct WindowedSeries {
    pub values: Vec<f64>,
    /// samples per window
    pub window_len: usize,
}

fn window_len(sampling_period: f64, num_seconds: f64) -> Result<usize> {
    let n = (num_seconds / sampling_period).trunc();
    if !n.is_finite() || n < 1.0 {
        return Err(StatsError::EmptyWindow {
            num_seconds,
            sampling_period,
        });
    }
    Ok(n as usize)
}

fn windowed<F>(
    series: &[f64],
    sampling_period: f64,
    num_seconds: f64,
    f: F,
) -> Result<WindowedSeries>
where
    F: Fn(&[f64]) -> f64,
{
    let n = window_len(sampling_period, num_seconds)?;
    log::debug!("sampling period {}s, {} samples per window", sampling_period, n);

    let values = if series.len() > n {
        (0..series.len() - n).map(|i| f(&series[i..i + n])).collect()
    } else {
        vec![]
    };
    Ok(WindowedSeries {
        values,
        window_len: n,
    })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std(values: &[f64]) -> f64 {
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

/// Rolling mean over `num_seconds / sampling_period` samples.
/// Entry `i` covers `series[i..i + n]`, so the output is `n` entries shorter than the input.
pub fn window_avg(
    series: &[f64],
    sampling_period: f64,
    num_seconds: f64,
) -> Result<WindowedSeries> {
    windowed(series, sampling_period, num_seconds, mean)
}

/// Rolling population standard deviation, laid out like [`window_avg`].
pub fn window_std(
    series: &[f64],
    sampling_period: f64,
    num_seconds: f64,
) -> Result<WindowedSeries> {
    windowed(series, sampling_period, num_seconds, population_std)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_window_avg() {
        let series = [1.0, 2.0, 3.0, 4.0, 5.0];
        let result = window_avg(&series, 0.5, 1.0).unwrap();
        assert_eq!(result.window_len, 2);
        // the last full window [4, 5] is not emitted
        assert_eq!(result.values, vec![1.5, 2.5, 3.5]);

        let result = window_avg(&series, 1.0, 60.0).unwrap();
        assert_eq!(result.window_len, 60);
        assert!(result.values.is_empty());

        // 2.9 samples truncate to 2
        assert_eq!(window_avg(&series, 1.0, 2.9).unwrap().window_len, 2);
    }

    #[test]
    fn test_window_std() {
        let series = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0, 0.0];
        let result = window_std(&series, 1.0, 8.0).unwrap();
        assert_eq!(result.values, vec![2.0]);
    }

    #[test]
    fn test_empty_window() {
        assert!(matches!(
            window_avg(&[1.0, 2.0], 2.0, 1.0),
            Err(StatsError::EmptyWindow { .. })
        ));
        assert!(window_std(&[1.0], 0.0, 1.0).is_err());
    }
}
