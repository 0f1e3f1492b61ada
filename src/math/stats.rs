//! Missing-value-aware summary statistics.
//!
//! Missing values are encoded as `NaN` in numeric columns, so every statistic
//! here skips `NaN` inputs. An input with no finite-or-infinite values yields `NaN`.

/// Arithmetic mean over non-`NaN` values.
pub fn nan_mean(values: &[f64]) -> f64 {
    let (sum, n) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

/// Population standard deviation (`ddof = 0`) over non-`NaN` values.
pub fn nan_population_std(values: &[f64]) -> f64 {
    let mean = nan_mean(values);
    if mean.is_nan() {
        return f64::NAN;
    }
    let (sum_sq, n) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(acc, n), v| (acc + (v - mean).powi(2), n + 1));
    (sum_sq / n as f64).sqrt()
}
