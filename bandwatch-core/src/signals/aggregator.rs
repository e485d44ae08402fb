//! Signal aggregation rule table.
//!
//! Emission order is fixed:
//! 1. crossings, in detector order;
//! 2. one %B positional alert, only when no crossing fired;
//! 3. a width-regime alert when the ratio leaves the signal band;
//! 4. a midline persistence alert.

use super::{PositionalBucket, Signal, SignalSet, Unavailable};
use crate::analysis::{Continuation, CrossingOutcome, MidlineTally, WidthTrend};
use crate::config::AnalysisConfig;

/// Inputs the rule table reads, all derived from the latest bars.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatorInput<'a> {
    pub crossings: &'a CrossingOutcome,
    pub percent_b: Option<f64>,
    pub width_ratio: Option<f64>,
    pub tally: MidlineTally,
}

#[derive(Debug, Clone)]
pub struct SignalAggregator<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> SignalAggregator<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn aggregate(&self, input: &AggregatorInput<'_>) -> SignalSet {
        let mut set = SignalSet::default();

        let crossing_count = match input.crossings {
            CrossingOutcome::InsufficientHistory => {
                set.unavailable.push(Unavailable::CrossingHistory);
                0
            }
            CrossingOutcome::Evaluated(kinds) => {
                set.signals
                    .extend(kinds.iter().map(|&crossing| Signal::Crossing { crossing }));
                kinds.len()
            }
        };

        // Crossings outrank static position.
        if crossing_count == 0 {
            match input.percent_b {
                Some(percent_b) => set.signals.push(Signal::Positional {
                    bucket: PositionalBucket::from_percent_b(
                        percent_b,
                        &self.config.positional.thresholds,
                    ),
                    percent_b,
                }),
                None => set.unavailable.push(Unavailable::PercentB),
            }
        }

        match input.width_ratio {
            Some(ratio) if ratio > self.config.width.signal_expanding_ratio => {
                set.signals.push(Signal::WidthRegime {
                    trend: WidthTrend::Expanding,
                    ratio,
                });
            }
            Some(ratio) if ratio < self.config.width.signal_contracting_ratio => {
                set.signals.push(Signal::WidthRegime {
                    trend: WidthTrend::Contracting,
                    ratio,
                });
            }
            Some(_) => {}
            None => set.unavailable.push(Unavailable::WidthRatio),
        }

        let min_days = self.config.persistence.min_days;
        if input.tally.is_conclusive(min_days) {
            if let Some(continuation) = input.tally.continuation(min_days) {
                let days = match continuation {
                    Continuation::Strong => input.tally.above,
                    Continuation::Weak => input.tally.below,
                };
                set.signals.push(Signal::Persistence {
                    continuation,
                    days,
                    window: input.tally.window,
                });
            }
        } else {
            set.unavailable.push(Unavailable::Persistence);
        }

        set
    }
}
