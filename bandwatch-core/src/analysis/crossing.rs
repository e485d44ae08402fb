//! Band crossings between the last two bars.
//!
//! Each check pairs a non-strict inequality on the previous bar with a
//! strict one on the current bar, so a close sitting exactly on a line can
//! trigger at most one side of that line's pair.

use crate::config::{BoundaryMode, CrossingConfig, CrossingReference};
use crate::indicators::{BandSet, BandTriple, BollingerBand};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossingKind {
    UpperBreakout,
    UpperRejection,
    LowerBreakdown,
    LowerRebound,
    MidlineBullish,
    MidlineBearish,
}

impl CrossingKind {
    /// Evaluation order. Outer-band checks first, then the midline.
    pub const ALL: [CrossingKind; 6] = [
        CrossingKind::UpperBreakout,
        CrossingKind::UpperRejection,
        CrossingKind::LowerBreakdown,
        CrossingKind::LowerRebound,
        CrossingKind::MidlineBullish,
        CrossingKind::MidlineBearish,
    ];

    pub fn boundary(&self) -> BollingerBand {
        match self {
            CrossingKind::UpperBreakout | CrossingKind::UpperRejection => BollingerBand::Upper,
            CrossingKind::LowerBreakdown | CrossingKind::LowerRebound => BollingerBand::Lower,
            CrossingKind::MidlineBullish | CrossingKind::MidlineBearish => BollingerBand::Middle,
        }
    }

    /// True when the close moved from at-or-below the line to above it.
    pub fn is_upward(&self) -> bool {
        matches!(
            self,
            CrossingKind::UpperBreakout | CrossingKind::LowerRebound | CrossingKind::MidlineBullish
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            CrossingKind::UpperBreakout => "upper breakout - strong move starting",
            CrossingKind::UpperRejection => "upper rejection - overbought pullback",
            CrossingKind::LowerBreakdown => "lower breakdown - panic selling",
            CrossingKind::LowerRebound => "lower rebound - oversold stabilizing",
            CrossingKind::MidlineBullish => "midline bullish cross - trend strengthening",
            CrossingKind::MidlineBearish => "midline bearish cross - trend weakening",
        }
    }

    fn fires(&self, prev_close: f64, prev_line: f64, close: f64, line: f64) -> bool {
        if self.is_upward() {
            prev_close <= prev_line && close > line
        } else {
            prev_close >= prev_line && close < line
        }
    }
}

/// Close and band values of one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarState {
    pub close: f64,
    pub bands: BandTriple,
}

/// Result of running the detector over a series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrossingOutcome {
    /// Fewer than two consecutive bars with defined bands at the end of the series.
    InsufficientHistory,
    /// Checks ran; the list may be empty.
    Evaluated(Vec<CrossingKind>),
}

/// Run the six checks between two bars, in `CrossingKind::ALL` order.
pub fn detect(prev: &BarState, current: &BarState, config: &CrossingConfig) -> Vec<CrossingKind> {
    let outer_reference = match config.reference {
        CrossingReference::PreviousBands => &prev.bands,
        CrossingReference::CurrentBands => &current.bands,
    };

    let mut fired: Vec<CrossingKind> = Vec::new();
    for kind in CrossingKind::ALL {
        let boundary = kind.boundary();
        if config.boundary_mode == BoundaryMode::FirstMatch {
            let outer = boundary != BollingerBand::Middle;
            let group_taken = fired
                .iter()
                .any(|k| (k.boundary() != BollingerBand::Middle) == outer);
            if group_taken {
                continue;
            }
        }
        // The midline always compares the previous close with its own bar's middle.
        let reference = if boundary == BollingerBand::Middle {
            &prev.bands
        } else {
            outer_reference
        };
        if kind.fires(
            prev.close,
            reference.get(boundary),
            current.close,
            current.bands.get(boundary),
        ) {
            fired.push(kind);
        }
    }
    fired
}

/// Detect crossings between the last two bars of a series.
pub fn detect_latest(closes: &[f64], bands: &BandSet, config: &CrossingConfig) -> CrossingOutcome {
    let n = closes.len().min(bands.len());
    if n < 2 {
        return CrossingOutcome::InsufficientHistory;
    }
    let (Some(prev_bands), Some(cur_bands)) = (bands.triple(n - 2), bands.triple(n - 1)) else {
        return CrossingOutcome::InsufficientHistory;
    };
    let prev = BarState {
        close: closes[n - 2],
        bands: prev_bands,
    };
    let current = BarState {
        close: closes[n - 1],
        bands: cur_bands,
    };
    CrossingOutcome::Evaluated(detect(&prev, &current, config))
}
