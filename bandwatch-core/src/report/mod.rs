//! Analysis report: the complete output of one run.
//!
//! - `RegimeSnapshot`: band values and derived classifications at the latest bar.
//! - `AnalysisReport`: snapshot + signals + advisory + chart arrays + fingerprint.
//! - `analyze()`: the pipeline producing the report from a `PriceSeries`.
//! - `render`: text, JSON and chart CSV presentation of a finished report.

pub mod pipeline;
pub mod render;

pub use pipeline::analyze;

use crate::advisory::Advisory;
use crate::analysis::{PositionRegion, SlopeDirection, WidthTrend};
use crate::domain::Bar;
use crate::signals::SignalSet;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures that stop the pipeline. Short history is not one of them; it
/// degrades the report instead (see `ReportStatus`). Malformed bars never
/// reach the pipeline: `PriceSeries::new` rejects them.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("price series for {symbol} is empty")]
    EmptySeries { symbol: String },

    #[error("invalid configuration: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("failed to serialize report for fingerprinting: {0}")]
    Fingerprint(#[from] serde_json::Error),
}

/// Whether the series was long enough for every check to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReportStatus {
    Complete,
    InsufficientHistory { bars: usize, required: usize },
}

impl ReportStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, ReportStatus::Complete)
    }

    pub fn describe(&self) -> String {
        match self {
            ReportStatus::Complete => "complete".to_string(),
            ReportStatus::InsufficientHistory { bars, required } => {
                format!("insufficient data: {bars} bars, {required} required")
            }
        }
    }
}

/// Regime at the latest bar. Band-derived fields are `None` while undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeSnapshot {
    pub current_price: f64,
    pub current_upper: Option<f64>,
    pub current_mid: Option<f64>,
    pub current_lower: Option<f64>,
    pub percent_b: Option<f64>,
    pub width: Option<f64>,
    pub width_ratio: Option<f64>,
    pub width_trend: Option<WidthTrend>,
    pub midline_slope: Option<SlopeDirection>,
    pub position: Option<PositionRegion>,
}

/// Latest value of one moving average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageReading {
    pub period: usize,
    pub value: Option<f64>,
}

/// Aligned per-bar arrays for a chart overlay of price and bands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub dates: Vec<NaiveDate>,
    pub close: Vec<f64>,
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
    pub percent_b: Vec<Option<f64>>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub as_of: NaiveDate,
    pub bar_count: usize,
    pub preset: String,
    pub status: ReportStatus,
    pub regime: RegimeSnapshot,
    pub moving_averages: Vec<MovingAverageReading>,
    pub recent_bars: Vec<Bar>,
    pub signals: SignalSet,
    pub advisory: Advisory,
    pub chart: ChartSeries,
    /// BLAKE3 hex digest of the regime, signals and advisory.
    pub fingerprint: String,
}

#[derive(Serialize)]
struct FingerprintView<'a> {
    regime: &'a RegimeSnapshot,
    signals: &'a SignalSet,
    advisory: &'a Advisory,
}

/// Hash the decision-bearing part of a report.
///
/// Field order is fixed by the struct definitions, so identical inputs
/// always serialize to identical bytes.
pub fn fingerprint(
    regime: &RegimeSnapshot,
    signals: &SignalSet,
    advisory: &Advisory,
) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(&FingerprintView {
        regime,
        signals,
        advisory,
    })?;
    Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
}

impl AnalysisReport {
    /// Recompute the fingerprint and compare it with the stored one.
    pub fn verify_fingerprint(&self) -> bool {
        fingerprint(&self.regime, &self.signals, &self.advisory)
            .map(|hash| hash == self.fingerprint)
            .unwrap_or(false)
    }

    pub fn moving_average(&self, period: usize) -> Option<f64> {
        self.moving_averages
            .iter()
            .find(|ma| ma.period == period)
            .and_then(|ma| ma.value)
    }
}
