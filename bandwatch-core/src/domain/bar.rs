//! Bar: the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLC bar for a single security.
///
/// `volume` is carried through for display only; no indicator reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Returns true if the close is not a finite number (void bar).
    ///
    /// Only the close feeds the indicators, so a bar with a usable close is
    /// kept even when its other fields are missing.
    pub fn is_void(&self) -> bool {
        !self.close.is_finite()
    }

    /// Basic OHLC sanity check: high >= low, high >= open, high >= close, etc.
    pub fn is_sane(&self) -> bool {
        if self.is_void() || self.open.is_nan() || self.high.is_nan() || self.low.is_nan() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.close > 0.0
    }
}
