//! Midline persistence over the most recent bars.

use serde::{Deserialize, Serialize};

/// Which side of the midline the recent closes have held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Continuation {
    Strong,
    Weak,
}

/// Counts of recent closes strictly above / below the middle band.
///
/// Bars whose middle band is undefined count for neither side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidlineTally {
    pub above: usize,
    pub below: usize,
    pub defined: usize,
    pub window: usize,
}

impl MidlineTally {
    pub fn count(closes: &[f64], middle: &[f64], window: usize) -> Self {
        let n = closes.len().min(middle.len());
        let start = n.saturating_sub(window);
        let mut tally = Self {
            above: 0,
            below: 0,
            defined: 0,
            window,
        };
        for (&close, &mid) in closes[start..n].iter().zip(&middle[start..n]) {
            if mid.is_nan() {
                continue;
            }
            tally.defined += 1;
            if close > mid {
                tally.above += 1;
            } else if close < mid {
                tally.below += 1;
            }
        }
        tally
    }

    /// Whether enough bars were defined for a continuation call to be possible.
    pub fn is_conclusive(&self, min_days: usize) -> bool {
        self.defined >= min_days
    }

    pub fn continuation(&self, min_days: usize) -> Option<Continuation> {
        if self.above >= min_days {
            Some(Continuation::Strong)
        } else if self.below >= min_days {
            Some(Continuation::Weak)
        } else {
            None
        }
    }
}
