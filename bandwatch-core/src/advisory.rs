//! Advisory rule table: %B and width ratio to one fixed recommendation.
//!
//! Rules are evaluated top to bottom and the first match wins:
//! 1. %B above the overbought line while bands expand → reduce exposure
//! 2. %B below the oversold line while bands expand → watch for a rebound
//! 3. %B mid-channel while bands contract → range-bound
//! 4. anything else → follow the trend

use crate::config::AdvisoryConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    ReduceExposure,
    WatchForRebound,
    RangeBound,
    FollowTrend,
    InsufficientData,
}

impl Advisory {
    pub fn message(&self) -> &'static str {
        match self {
            Advisory::ReduceExposure => "reduce exposure if holding; stay out if flat",
            Advisory::WatchForRebound => "watch for rebound; small speculative long acceptable",
            Advisory::RangeBound => "range-bound; trade the edges or stay flat",
            Advisory::FollowTrend => {
                "follow the trend; bias long above the midline, short below it"
            }
            Advisory::InsufficientData => "insufficient data for advisory",
        }
    }
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Pick the advisory. An undefined width ratio matches none of the
/// width-conditioned rules.
pub fn advise(
    percent_b: Option<f64>,
    width_ratio: Option<f64>,
    config: &AdvisoryConfig,
) -> Advisory {
    let Some(pb) = percent_b else {
        return Advisory::InsufficientData;
    };
    let expanding = width_ratio.is_some_and(|r| r > config.expanding_ratio);
    let contracting = width_ratio.is_some_and(|r| r < config.contracting_ratio);

    if pb > config.overbought_percent_b && expanding {
        Advisory::ReduceExposure
    } else if pb < config.oversold_percent_b && expanding {
        Advisory::WatchForRebound
    } else if pb > config.range_low_percent_b && pb < config.range_high_percent_b && contracting {
        Advisory::RangeBound
    } else {
        Advisory::FollowTrend
    }
}
