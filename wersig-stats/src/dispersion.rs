//! Dispersion of the Bootstrap Distribution

/// Arithmetic mean (0.0 for an empty slice)
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Bootstrap standard error: Bessel-corrected sample standard deviation.
///
/// ```text
/// sqrt(Σ (x_i - mean)² / (n - 1))
/// ```
///
/// Undefined for fewer than two samples; returns `NaN` in that case. The
/// resampling engine refuses to run with `total_batch < 2`.
pub fn standard_error(samples: &[f64], mean: f64) -> f64 {
    if samples.len() < 2 {
        return f64::NAN;
    }
    let sum_sq: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();
    (sum_sq / (samples.len() - 1) as f64).sqrt()
}
