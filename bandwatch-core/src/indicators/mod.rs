//! Rolling indicators over the close series.
//!
//! Indicators are pure functions: a numeric series in, a series of the same
//! length out. Warmup entries are `f64::NAN`, and every consumer treats NaN
//! as "insufficient data", never as zero.

pub mod bollinger;
pub mod sma;

pub use bollinger::{BandSet, BandTriple, Bollinger, BollingerBand};
pub use sma::Sma;

/// Trait for single-series indicators.
///
/// # Look-ahead contamination guard
/// No output value at index t may depend on input from index t+1 or later.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20").
    fn name(&self) -> &str;

    /// Number of leading entries that are always NaN.
    fn lookback(&self) -> usize;

    /// Compute the indicator over the whole input.
    ///
    /// Returns a `Vec<f64>` of the same length as `values`.
    fn compute(&self, values: &[f64]) -> Vec<f64>;
}

/// Value at `index` if it exists and is defined.
pub fn defined_at(series: &[f64], index: usize) -> Option<f64> {
    series.get(index).copied().filter(|v| !v.is_nan())
}

/// Index of the first defined entry.
pub fn first_defined(series: &[f64]) -> Option<usize> {
    series.iter().position(|v| !v.is_nan())
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
