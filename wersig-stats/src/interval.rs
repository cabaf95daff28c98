//! Confidence Intervals
//!
//! Two strategies turn a bootstrap distribution into an interval:
//!
//! - **Percentile**: the `alpha` and `1 - alpha` percentiles of the
//!   distribution, with `alpha = (1 - level) / 2`. Needs `total_batch`
//!   comfortably above `1 / alpha` to resolve the tails.
//! - **Gaussian**: `estimate ∓ z * std_err`, for the three tabulated levels
//!   0.90, 0.95 and 0.99 only.

use crate::bootstrap::BootstrapDistribution;
use crate::error::ConfigError;

/// z-scores of the supported gaussian confidence levels
pub const Z_SCORES: [(f64, f64); 3] = [(0.90, 1.645), (0.95, 1.960), (0.99, 2.576)];

/// Interval derivation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntervalMethod {
    /// Empirical percentiles of the bootstrap distribution
    #[default]
    Percentile,
    /// Normal approximation from the bootstrap standard error
    Gaussian,
}

impl std::fmt::Display for IntervalMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntervalMethod::Percentile => write!(f, "percentile"),
            IntervalMethod::Gaussian => write!(f, "gaussian"),
        }
    }
}

impl std::str::FromStr for IntervalMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "percentile" | "empirical" => Ok(IntervalMethod::Percentile),
            "gaussian" | "normal" => Ok(IntervalMethod::Gaussian),
            other => Err(format!("Unknown interval method: {}", other)),
        }
    }
}

/// Confidence interval bounds, always ordered `lower <= upper`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInterval {
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
    /// Confidence level the bounds were computed for
    pub level: f64,
}

impl ConfidenceInterval {
    /// Build an interval from two bounds given in either order
    pub fn ordered(a: f64, b: f64, level: f64) -> Self {
        let (lower, upper) = if a <= b { (a, b) } else { (b, a) };
        Self {
            lower,
            upper,
            level,
        }
    }

    /// `upper - lower`
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// True if `value` lies within the closed interval
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Check that `level` lies strictly inside (0, 1)
pub fn validate_confidence_level(level: f64) -> Result<(), ConfigError> {
    if level > 0.0 && level < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::ConfidenceOutOfRange(level))
    }
}

/// Tabulated z-score for a gaussian confidence level
pub fn z_score(level: f64) -> Result<f64, ConfigError> {
    validate_confidence_level(level)?;
    Z_SCORES
        .iter()
        .find(|(supported, _)| (supported - level).abs() < 1e-9)
        .map(|&(_, z)| z)
        .ok_or(ConfigError::UnsupportedGaussianLevel(level))
}

/// Tail mass on each side of the interval
pub fn alpha(level: f64) -> f64 {
    (1.0 - level) / 2.0
}

/// Empirical percentile interval
pub fn percentile_interval(distribution: &BootstrapDistribution, level: f64) -> ConfidenceInterval {
    let alpha = alpha(level);
    let low = distribution.percentile(alpha * 100.0);
    let high = distribution.percentile((1.0 - alpha) * 100.0);
    ConfidenceInterval::ordered(low, high, level)
}

/// Normal-approximation interval `estimate ∓ z * std_err`
pub fn gaussian_interval(
    estimate: f64,
    std_err: f64,
    level: f64,
) -> Result<ConfidenceInterval, ConfigError> {
    let margin = z_score(level)? * std_err;
    Ok(ConfidenceInterval::ordered(
        estimate - margin,
        estimate + margin,
        level,
    ))
}
