//! %B: where the close sits inside the band envelope.
//!
//! 0 is the lower band, 1 the upper band. Values outside [0, 1] mean the
//! close is outside the envelope and are reported as-is.

use crate::indicators::BandTriple;

/// %B for one price, or `None` when the envelope has zero width or any
/// input is undefined.
pub fn percent_b(price: f64, bands: &BandTriple) -> Option<f64> {
    if price.is_nan() || bands.is_degenerate() {
        return None;
    }
    let value = (price - bands.lower) / (bands.upper - bands.lower);
    value.is_finite().then_some(value)
}

/// %B at every index; NaN where undefined.
pub fn percent_b_series(closes: &[f64], upper: &[f64], lower: &[f64]) -> Vec<f64> {
    closes
        .iter()
        .zip(upper.iter().zip(lower.iter()))
        .map(|(&price, (&up, &low))| {
            if up.is_nan() || low.is_nan() || up == low {
                f64::NAN
            } else {
                (price - low) / (up - low)
            }
        })
        .collect()
}
