//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//!
//! Uses population stddev (divide by N).
//! Lookback: period - 1.

use super::sma::Sma;
use super::Indicator;
use serde::{Deserialize, Serialize};

/// One of the three band lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

/// Band values at a single index, all defined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandTriple {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BandTriple {
    pub fn get(&self, band: BollingerBand) -> f64 {
        match band {
            BollingerBand::Upper => self.upper,
            BollingerBand::Middle => self.middle,
            BollingerBand::Lower => self.lower,
        }
    }

    /// Zero-width envelope (stddev was zero over the window).
    pub fn is_degenerate(&self) -> bool {
        self.upper == self.lower
    }
}

/// Three index-aligned band series. Warmup entries are NaN in all three.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BandSet {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

impl BandSet {
    pub fn len(&self) -> usize {
        self.middle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middle.is_empty()
    }

    pub fn band(&self, band: BollingerBand) -> &[f64] {
        match band {
            BollingerBand::Upper => &self.upper,
            BollingerBand::Middle => &self.middle,
            BollingerBand::Lower => &self.lower,
        }
    }

    /// The triple at `index`, or `None` if any band is undefined there.
    pub fn triple(&self, index: usize) -> Option<BandTriple> {
        let upper = *self.upper.get(index)?;
        let middle = *self.middle.get(index)?;
        let lower = *self.lower.get(index)?;
        if upper.is_nan() || middle.is_nan() || lower.is_nan() {
            return None;
        }
        Some(BandTriple {
            upper,
            middle,
            lower,
        })
    }

    pub fn latest(&self) -> Option<BandTriple> {
        self.len().checked_sub(1).and_then(|i| self.triple(i))
    }

    /// Number of indices where all three bands are defined.
    pub fn defined_count(&self) -> usize {
        (0..self.len()).filter(|&i| self.triple(i).is_some()).count()
    }
}

/// Band calculator parameterized by window and stddev multiplier.
#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    name: String,
}

impl Bollinger {
    pub fn new(period: usize, multiplier: f64) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        assert!(
            multiplier >= 0.0 && multiplier.is_finite(),
            "Bollinger multiplier must be non-negative and finite"
        );
        Self {
            period,
            multiplier,
            name: format!("bollinger_{period}_{multiplier}"),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    /// Compute all three bands for the close series.
    pub fn compute(&self, closes: &[f64]) -> BandSet {
        let n = closes.len();
        let mut middle = Sma::new(self.period).compute(closes);
        let mut upper = vec![f64::NAN; n];
        let mut lower = vec![f64::NAN; n];

        for i in 0..n {
            let mean = middle[i];
            if mean.is_nan() {
                continue;
            }
            let window = &closes[i + 1 - self.period..=i];
            // A flat window has zero stddev; the rolling sum may not return
            // the price exactly, so pin all three lines to it.
            let first = window[0];
            if window.iter().all(|&close| close == first) {
                middle[i] = first;
                upper[i] = first;
                lower[i] = first;
                continue;
            }
            let variance: f64 = window
                .iter()
                .map(|close| {
                    let diff = close - mean;
                    diff * diff
                })
                .sum::<f64>()
                / self.period as f64;
            let offset = self.multiplier * variance.sqrt();
            upper[i] = mean + offset;
            lower[i] = mean - offset;
        }

        BandSet {
            upper,
            middle,
            lower,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn middle_is_sma() {
        let bands = Bollinger::new(3, 2.0).compute(&[10.0, 11.0, 12.0, 13.0, 14.0]);

        assert!(bands.middle[0].is_nan());
        assert!(bands.middle[1].is_nan());
        assert_approx(bands.middle[2], 11.0, DEFAULT_EPSILON);
        assert_approx(bands.middle[3], 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn population_stddev() {
        // window [10,11,12]: mean 11, population variance 2/3
        let bands = Bollinger::new(3, 2.0).compute(&[10.0, 11.0, 12.0]);
        let expected = 2.0 * (2.0_f64 / 3.0).sqrt();
        assert_approx(bands.upper[2] - bands.middle[2], expected, DEFAULT_EPSILON);
    }

    #[test]
    fn bands_symmetric() {
        let bands = Bollinger::new(3, 2.0).compute(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        for i in 2..5 {
            let half_width = bands.upper[i] - bands.middle[i];
            assert_approx(bands.middle[i] - bands.lower[i], half_width, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn constant_price_zero_width() {
        let bands = Bollinger::new(3, 2.0).compute(&[100.0, 100.0, 100.0, 100.0]);
        let triple = bands.latest().unwrap();
        assert_eq!(triple.upper, 100.0);
        assert_eq!(triple.lower, 100.0);
        assert!(triple.is_degenerate());
    }

    #[test]
    fn inexact_constant_price_is_degenerate() {
        // 10.1 and 0.1 have no exact binary form, so a rolling mean drifts.
        for price in [10.1, 0.1] {
            let closes = vec![price; 40];
            let bands = Bollinger::new(20, 2.0).compute(&closes);
            for i in 19..40 {
                let triple = bands.triple(i).unwrap();
                assert!(triple.is_degenerate(), "index {i}: {triple:?}");
                assert_eq!(triple.middle, price);
            }
        }
    }

    #[test]
    fn flat_tail_after_movement_is_degenerate() {
        let mut closes: Vec<f64> = (0..10).map(|i| 9.0 + i as f64 * 0.37).collect();
        closes.extend(std::iter::repeat(10.1).take(5));
        let bands = Bollinger::new(5, 2.0).compute(&closes);
        assert!(bands.latest().unwrap().is_degenerate());
        assert!(!bands.triple(13).unwrap().is_degenerate());
    }

    #[test]
    fn empty_input_gives_empty_bands() {
        let bands = Bollinger::new(20, 2.0).compute(&[]);
        assert!(bands.is_empty());
        assert!(bands.upper.is_empty());
        assert!(bands.lower.is_empty());
        assert!(bands.latest().is_none());
    }

    #[test]
    fn warmup_is_undefined() {
        let closes: Vec<f64> = (0..25).map(|i| 10.0 + i as f64).collect();
        let bands = Bollinger::new(20, 2.0).compute(&closes);
        assert_eq!(bands.len(), 25);
        assert!(bands.triple(18).is_none());
        assert!(bands.triple(19).is_some());
        assert_eq!(bands.defined_count(), 6);
    }

    #[test]
    fn nan_close_blanks_window() {
        let bands = Bollinger::new(3, 2.0).compute(&[10.0, 11.0, f64::NAN, 13.0]);
        assert!(bands.triple(2).is_none());
        assert!(bands.triple(3).is_none());
    }

    #[test]
    fn band_selector() {
        let bands = Bollinger::new(2, 1.0).compute(&[10.0, 12.0]);
        assert_approx(bands.band(BollingerBand::Upper)[1], 12.0, DEFAULT_EPSILON);
        assert_approx(bands.band(BollingerBand::Middle)[1], 11.0, DEFAULT_EPSILON);
        assert_approx(bands.band(BollingerBand::Lower)[1], 10.0, DEFAULT_EPSILON);
        assert_eq!(bands.latest().unwrap().get(BollingerBand::Middle), 11.0);
    }

    #[test]
    fn lookback_and_name() {
        assert_eq!(Bollinger::new(20, 2.0).lookback(), 19);
        assert_eq!(Bollinger::new(20, 2.0).name(), "bollinger_20_2");
    }
}
