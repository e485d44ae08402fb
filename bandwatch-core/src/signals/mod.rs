//! Discrete signals emitted for the latest bar.
//!
//! A `Signal` is drawn from a closed set of categories: crossing events,
//! %B positional alerts, width-regime alerts and midline persistence
//! alerts. The aggregator collects them in a fixed emission order and
//! records which checks could not run.

pub mod aggregator;

pub use aggregator::{AggregatorInput, SignalAggregator};

use crate::analysis::{Continuation, CrossingKind, WidthTrend};
use serde::{Deserialize, Serialize};

/// %B bucket for the positional alert, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionalBucket {
    NearUpper,
    Strong,
    NeutralStrong,
    NeutralWeak,
    Weak,
    NearLower,
}

impl PositionalBucket {
    /// Bucket for `percent_b` given five strictly descending lower bounds.
    pub fn from_percent_b(percent_b: f64, thresholds: &[f64; 5]) -> Self {
        const ORDER: [PositionalBucket; 5] = [
            PositionalBucket::NearUpper,
            PositionalBucket::Strong,
            PositionalBucket::NeutralStrong,
            PositionalBucket::NeutralWeak,
            PositionalBucket::Weak,
        ];
        ORDER
            .iter()
            .zip(thresholds)
            .find(|(_, bound)| percent_b > **bound)
            .map(|(bucket, _)| *bucket)
            .unwrap_or(PositionalBucket::NearLower)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PositionalBucket::NearUpper => "near upper band",
            PositionalBucket::Strong => "strong zone",
            PositionalBucket::NeutralStrong => "neutral-strong",
            PositionalBucket::NeutralWeak => "neutral-weak",
            PositionalBucket::Weak => "weak zone",
            PositionalBucket::NearLower => "near lower band",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            PositionalBucket::NearUpper => "high-pressure area, avoid chasing",
            PositionalBucket::Strong => "riding the upper half of the channel",
            PositionalBucket::NeutralStrong => "just above the midline",
            PositionalBucket::NeutralWeak => "just below the midline",
            PositionalBucket::Weak => "riding the lower half of the channel",
            PositionalBucket::NearLower => "support area, watch for a rebound",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    Crossing,
    Positional,
    WidthRegime,
    Persistence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Signal {
    Crossing {
        crossing: CrossingKind,
    },
    Positional {
        bucket: PositionalBucket,
        percent_b: f64,
    },
    WidthRegime {
        trend: WidthTrend,
        ratio: f64,
    },
    Persistence {
        continuation: Continuation,
        days: usize,
        window: usize,
    },
}

impl Signal {
    pub fn category(&self) -> SignalCategory {
        match self {
            Signal::Crossing { .. } => SignalCategory::Crossing,
            Signal::Positional { .. } => SignalCategory::Positional,
            Signal::WidthRegime { .. } => SignalCategory::WidthRegime,
            Signal::Persistence { .. } => SignalCategory::Persistence,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Signal::Crossing { crossing } => crossing.label().to_string(),
            Signal::Positional { bucket, percent_b } => format!(
                "{} ({:.1}%) - {}",
                bucket.name(),
                percent_b * 100.0,
                bucket.hint()
            ),
            Signal::WidthRegime { trend, ratio } => match trend {
                WidthTrend::Expanding => format!(
                    "bands opening (x{ratio:.2}) - volatility rising, trend likely to extend"
                ),
                WidthTrend::Contracting => format!(
                    "bands squeezing (x{ratio:.2}) - volatility converging, a move is near"
                ),
                WidthTrend::Stable => format!("band width steady (x{ratio:.2})"),
            },
            Signal::Persistence {
                continuation,
                days,
                window,
            } => match continuation {
                Continuation::Strong => format!(
                    "strong continuation - {days} of the last {window} closes above the midline"
                ),
                Continuation::Weak => format!(
                    "weak continuation - {days} of the last {window} closes below the midline"
                ),
            },
        }
    }
}

/// A check that could not run for lack of defined inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unavailable {
    /// Fewer than two bars with defined bands.
    CrossingHistory,
    /// %B undefined (warmup or zero-width band).
    PercentB,
    /// Width ratio undefined (warmup, zero middle or zero-width band).
    WidthRatio,
    /// Too few recent bars with a defined midline.
    Persistence,
}

impl Unavailable {
    pub fn label(&self) -> &'static str {
        match self {
            Unavailable::CrossingHistory => "crossings: insufficient history",
            Unavailable::PercentB => "position: %B undefined",
            Unavailable::WidthRatio => "band width: ratio undefined",
            Unavailable::Persistence => "persistence: insufficient history",
        }
    }
}

/// Ordered signals plus the checks that were skipped.
///
/// An empty `signals` list with nothing unavailable means "nothing to
/// report"; entries in `unavailable` mean part of the table could not run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalSet {
    pub signals: Vec<Signal>,
    pub unavailable: Vec<Unavailable>,
}

impl SignalSet {
    pub fn is_quiet(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn has_crossing(&self) -> bool {
        self.signals
            .iter()
            .any(|s| s.category() == SignalCategory::Crossing)
    }

    pub fn of_category(&self, category: SignalCategory) -> impl Iterator<Item = &Signal> {
        self.signals.iter().filter(move |s| s.category() == category)
    }

    pub fn messages(&self) -> Vec<String> {
        self.signals.iter().map(Signal::message).collect()
    }
}
