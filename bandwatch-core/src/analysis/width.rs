//! Band width regime and midline slope.
//!
//! width = (upper - lower) / middle. The trend compares the latest width to
//! the width `lookback` bars earlier; when the series holds fewer than
//! `lookback + 1` defined widths the earliest defined one is used instead.

use crate::config::WidthConfig;
use crate::indicators::{defined_at, first_defined, BandSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthTrend {
    Expanding,
    Contracting,
    Stable,
}

impl WidthTrend {
    pub fn label(&self) -> &'static str {
        match self {
            WidthTrend::Expanding => "expanding - volatility rising, trend may be starting",
            WidthTrend::Contracting => "contracting - volatility falling, reversal or pause likely",
            WidthTrend::Stable => "stable - range-bound",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlopeDirection {
    Up,
    Down,
    Flat,
}

impl SlopeDirection {
    pub fn label(&self) -> &'static str {
        match self {
            SlopeDirection::Up => "up",
            SlopeDirection::Down => "down",
            SlopeDirection::Flat => "flat",
        }
    }
}

/// Width-derived part of the regime at the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WidthAnalysis {
    pub current: Option<f64>,
    pub ratio: Option<f64>,
    pub trend: Option<WidthTrend>,
    pub midline_slope: Option<SlopeDirection>,
}

/// Relative width at every index; NaN where the middle is zero or
/// undefined, or where the envelope has collapsed to a line.
pub fn width_series(bands: &BandSet) -> Vec<f64> {
    (0..bands.len())
        .map(|i| match bands.triple(i) {
            Some(t) if t.middle != 0.0 && !t.is_degenerate() => (t.upper - t.lower) / t.middle,
            _ => f64::NAN,
        })
        .collect()
}

/// Comparison index for `latest`: `latest - lookback`, or the first defined
/// index when that would reach back into the warmup.
pub fn lookback_index(series: &[f64], latest: usize, lookback: usize) -> Option<usize> {
    let first = first_defined(series)?;
    if first > latest {
        return None;
    }
    Some(latest.checked_sub(lookback).filter(|&i| i >= first).unwrap_or(first))
}

/// Ratio of the latest value to the value at the lookback index.
pub fn lookback_ratio(series: &[f64], lookback: usize) -> Option<f64> {
    let latest = series.len().checked_sub(1)?;
    let current = defined_at(series, latest)?;
    let past = defined_at(series, lookback_index(series, latest, lookback)?)?;
    if past == 0.0 {
        return None;
    }
    let ratio = current / past;
    ratio.is_finite().then_some(ratio)
}

pub fn classify_trend(ratio: f64, config: &WidthConfig) -> WidthTrend {
    if ratio > config.expanding_ratio {
        WidthTrend::Expanding
    } else if ratio < config.contracting_ratio {
        WidthTrend::Contracting
    } else {
        WidthTrend::Stable
    }
}

/// Sign of the midline change over the lookback.
pub fn midline_slope(middle: &[f64], lookback: usize) -> Option<SlopeDirection> {
    let latest = middle.len().checked_sub(1)?;
    let current = defined_at(middle, latest)?;
    let past = defined_at(middle, lookback_index(middle, latest, lookback)?)?;
    let delta = current - past;
    Some(if delta > 0.0 {
        SlopeDirection::Up
    } else if delta < 0.0 {
        SlopeDirection::Down
    } else {
        SlopeDirection::Flat
    })
}

pub fn analyze(bands: &BandSet, config: &WidthConfig) -> WidthAnalysis {
    let widths = width_series(bands);
    let current = widths.len().checked_sub(1).and_then(|i| defined_at(&widths, i));
    let ratio = lookback_ratio(&widths, config.lookback);
    WidthAnalysis {
        current,
        ratio,
        trend: ratio.map(|r| classify_trend(r, config)),
        midline_slope: midline_slope(&bands.middle, config.lookback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, Bollinger, DEFAULT_EPSILON};

    fn bands_from(upper: &[f64], middle: &[f64], lower: &[f64]) -> BandSet {
        BandSet {
            upper: upper.to_vec(),
            middle: middle.to_vec(),
            lower: lower.to_vec(),
        }
    }

    #[test]
    fn width_is_relative_to_middle() {
        let bands = bands_from(&[12.0], &[10.0], &[8.0]);
        assert_approx(width_series(&bands)[0], 0.4, DEFAULT_EPSILON);
    }

    #[test]
    fn zero_middle_and_collapsed_band_are_undefined() {
        let bands = bands_from(&[1.0, 10.0], &[0.0, 10.0], &[-1.0, 10.0]);
        let widths = width_series(&bands);
        assert!(widths[0].is_nan());
        assert!(widths[1].is_nan());
    }

    #[test]
    fn lookback_index_uses_full_lookback_when_available() {
        let series = vec![1.0; 10];
        assert_eq!(lookback_index(&series, 9, 5), Some(4));
    }

    #[test]
    fn lookback_index_falls_back_to_first_defined() {
        let mut series = vec![f64::NAN; 19];
        series.extend([1.0, 1.1]);
        assert_eq!(lookback_index(&series, 20, 5), Some(19));
        assert_eq!(lookback_index(&[1.0, 2.0], 1, 5), Some(0));
    }

    #[test]
    fn lookback_index_none_without_data() {
        assert_eq!(lookback_index(&[f64::NAN, f64::NAN], 1, 5), None);
    }

    #[test]
    fn trend_thresholds() {
        let config = WidthConfig::default();
        assert_eq!(classify_trend(1.06, &config), WidthTrend::Expanding);
        assert_eq!(classify_trend(1.05, &config), WidthTrend::Stable);
        assert_eq!(classify_trend(0.95, &config), WidthTrend::Stable);
        assert_eq!(classify_trend(0.94, &config), WidthTrend::Contracting);
    }

    #[test]
    fn ratio_over_lookback() {
        // widths 0.2 .. 0.7; latest 0.7 vs index 0 (0.2) with lookback 5
        let widths = [0.2, 0.3, 0.4, 0.5, 0.6, 0.7];
        assert_approx(lookback_ratio(&widths, 5).unwrap(), 3.5, DEFAULT_EPSILON);
        assert_approx(lookback_ratio(&widths, 1).unwrap(), 0.7 / 0.6, DEFAULT_EPSILON);
    }

    #[test]
    fn single_defined_width_is_stable() {
        let widths = [f64::NAN, f64::NAN, 0.3];
        assert_eq!(lookback_ratio(&widths, 5), Some(1.0));
    }

    #[test]
    fn slope_direction() {
        assert_eq!(midline_slope(&[10.0, 10.5, 11.0], 5), Some(SlopeDirection::Up));
        assert_eq!(midline_slope(&[11.0, 10.5, 10.0], 5), Some(SlopeDirection::Down));
        assert_eq!(midline_slope(&[10.0, 11.0, 10.0], 5), Some(SlopeDirection::Flat));
        assert_eq!(midline_slope(&[f64::NAN, f64::NAN], 5), None);
        assert_eq!(midline_slope(&[], 5), None);
    }

    #[test]
    fn constant_prices_leave_width_undefined() {
        let bands = Bollinger::new(20, 2.0).compute(&[10.0; 20]);
        let analysis = analyze(&bands, &WidthConfig::default());
        assert_eq!(analysis.current, None);
        assert_eq!(analysis.ratio, None);
        assert_eq!(analysis.trend, None);
        assert_eq!(analysis.midline_slope, Some(SlopeDirection::Flat));
    }

    #[test]
    fn volatility_burst_expands() {
        let mut closes = vec![10.0, 10.1, 9.9, 10.0, 10.1, 9.9, 10.0, 10.1, 9.9, 10.0];
        closes.extend([10.0, 11.0, 12.5, 14.0, 16.0]);
        let bands = Bollinger::new(10, 2.0).compute(&closes);
        let analysis = analyze(&bands, &WidthConfig::default());
        assert!(analysis.ratio.unwrap() > 1.05);
        assert_eq!(analysis.trend, Some(WidthTrend::Expanding));
        assert_eq!(analysis.midline_slope, Some(SlopeDirection::Up));
    }
}
