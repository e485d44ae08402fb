//! PriceSeries: the immutable, date-ordered view over fetched bars.

use super::bar::Bar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a bar sequence cannot form a valid series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("bars out of order at index {index}: {date} does not follow {previous}")]
    NotAscending {
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },

    #[error("bar at index {index} ({date}) has a non-finite close")]
    VoidClose { index: usize, date: NaiveDate },
}

/// Chronologically ascending bars for one security.
///
/// Dates are strictly increasing and every close is finite. Gaps between
/// dates (weekends, holidays, suspensions) are allowed. Once built the series
/// is read-only; indicators borrow it and never mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        for (index, bar) in bars.iter().enumerate() {
            if bar.is_void() {
                return Err(SeriesError::VoidClose {
                    index,
                    date: bar.date,
                });
            }
            if index > 0 {
                let previous = bars[index - 1].date;
                if bar.date <= previous {
                    return Err(SeriesError::NotAscending {
                        index,
                        previous,
                        date: bar.date,
                    });
                }
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    /// Build a series from bare closes on consecutive calendar days.
    ///
    /// OHLC are synthesized around the close (open = previous close). Useful
    /// for tests and for callers that only hold a close array.
    pub fn from_closes(
        symbol: impl Into<String>,
        start: NaiveDate,
        closes: &[f64],
    ) -> Result<Self, SeriesError> {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let open = if i == 0 { close } else { closes[i - 1] };
                Bar {
                    date: start + chrono::Duration::days(i as i64),
                    open,
                    high: open.max(close),
                    low: open.min(close),
                    close,
                    volume: 0,
                }
            })
            .collect();
        Self::new(symbol, bars)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// The close-price column, index-aligned with `bars()`.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// The last `n` bars (fewer if the series is shorter).
    pub fn tail(&self, n: usize) -> &[Bar] {
        &self.bars[self.bars.len().saturating_sub(n)..]
    }
}
