//! Pipeline: PriceSeries → bands → classifiers → signals → advisory → report.
//!
//! Data flows strictly forward. Each stage reads the outputs of the stages
//! before it and never mutates them.

use super::{
    fingerprint, AnalysisError, AnalysisReport, ChartSeries, MovingAverageReading, RegimeSnapshot,
    ReportStatus,
};
use crate::advisory::advise;
use crate::analysis::{crossing, percent_b, persistence::MidlineTally, position, width};
use crate::config::AnalysisConfig;
use crate::domain::PriceSeries;
use crate::indicators::{defined_at, BandSet, Bollinger, Indicator, Sma};
use crate::signals::{AggregatorInput, SignalAggregator};
use tracing::{debug, info};

/// Run the full analysis over one series.
///
/// An empty series is an error. A series shorter than the band window still
/// produces a report, with `status = InsufficientHistory` and the checks that
/// could not run listed in `signals.unavailable`.
pub fn analyze(
    series: &PriceSeries,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, AnalysisError> {
    config.validate()?;
    let last = series.last().ok_or_else(|| AnalysisError::EmptySeries {
        symbol: series.symbol().to_string(),
    })?;
    let as_of = last.date;
    let current_price = last.close;

    let closes = series.closes();
    let bollinger = Bollinger::new(config.bands.window, config.bands.multiplier);
    let bands = bollinger.compute(&closes);

    let status = history_status(closes.len(), config.bands.window);
    if let ReportStatus::InsufficientHistory { bars, required } = status {
        info!(
            symbol = series.symbol(),
            bars,
            required,
            "series shorter than band window; reporting partial regime"
        );
    }

    let latest = bands.latest();
    let percent_b = latest.and_then(|t| percent_b::percent_b(current_price, &t));
    let width = width::analyze(&bands, &config.width);
    if latest.is_some_and(|t| t.is_degenerate()) {
        debug!(symbol = series.symbol(), "band envelope collapsed to a line");
    }

    let regime = RegimeSnapshot {
        current_price,
        current_upper: latest.map(|t| t.upper),
        current_mid: latest.map(|t| t.middle),
        current_lower: latest.map(|t| t.lower),
        percent_b,
        width: width.current,
        width_ratio: width.ratio,
        width_trend: width.trend,
        midline_slope: width.midline_slope,
        position: latest.map(|t| position::classify(current_price, &t)),
    };

    let crossings = crossing::detect_latest(&closes, &bands, &config.crossing);
    let tally = MidlineTally::count(&closes, &bands.middle, config.persistence.window);
    let signals = SignalAggregator::new(config).aggregate(&AggregatorInput {
        crossings: &crossings,
        percent_b,
        width_ratio: width.ratio,
        tally,
    });
    if !signals.unavailable.is_empty() {
        debug!(
            symbol = series.symbol(),
            unavailable = ?signals.unavailable,
            "some signal checks could not run"
        );
    }

    let advisory = advise(percent_b, width.ratio, &config.advisory);
    let fingerprint = fingerprint(&regime, &signals, &advisory)?;

    debug!(
        symbol = series.symbol(),
        signals = signals.signals.len(),
        ?advisory,
        "analysis complete"
    );

    Ok(AnalysisReport {
        symbol: series.symbol().to_string(),
        as_of,
        bar_count: series.len(),
        preset: config.preset.clone(),
        status,
        regime,
        moving_averages: moving_averages(&closes, &config.report.moving_averages),
        recent_bars: series.tail(config.report.recent_bars).to_vec(),
        signals,
        advisory,
        chart: chart_series(series, &closes, &bands),
        fingerprint,
    })
}

/// Bands need a full window, crossings need two bars.
fn history_status(bars: usize, window: usize) -> ReportStatus {
    let required = window.max(2);
    if bars < required {
        ReportStatus::InsufficientHistory { bars, required }
    } else {
        ReportStatus::Complete
    }
}

fn moving_averages(closes: &[f64], periods: &[usize]) -> Vec<MovingAverageReading> {
    periods
        .iter()
        .map(|&period| {
            let values = Sma::new(period).compute(closes);
            let value = values.len().checked_sub(1).and_then(|i| defined_at(&values, i));
            MovingAverageReading { period, value }
        })
        .collect()
}

fn chart_series(series: &PriceSeries, closes: &[f64], bands: &BandSet) -> ChartSeries {
    let defined = |values: &[f64]| -> Vec<Option<f64>> {
        values.iter().map(|&v| v.is_finite().then_some(v)).collect()
    };
    ChartSeries {
        dates: series.dates(),
        close: closes.to_vec(),
        upper: defined(&bands.upper),
        middle: defined(&bands.middle),
        lower: defined(&bands.lower),
        percent_b: defined(&percent_b::percent_b_series(closes, &bands.upper, &bands.lower)),
    }
}
