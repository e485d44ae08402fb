//! Deterministic synthetic bars for demos and offline runs.
//!
//! A random walk seeded from the BLAKE3 hash of the symbol: the same symbol
//! and date range always produce the same bars. Weekends are skipped.

use super::provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    start_price: f64,
    max_daily_move: f64,
}

impl SyntheticProvider {
    pub fn new(start_price: f64, max_daily_move: f64) -> Self {
        Self {
            start_price,
            max_daily_move,
        }
    }
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new(100.0, 0.03)
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn generate_bars(
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    start_price: f64,
    max_move: f64,
) -> Vec<RawBar> {
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::new();
    let mut price = start_price;
    let mut current = start;
    while current <= end {
        if !is_weekend(current) {
            let daily_return: f64 = if max_move > 0.0 {
                rng.gen_range(-max_move..max_move)
            } else {
                0.0
            };
            let open = price;
            let close = price * (1.0 + daily_return);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            bars.push(RawBar {
                date: current,
                open,
                high,
                low,
                close,
                volume: rng.gen_range(500_000..5_000_000u64),
            });
            price = close;
        }
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    bars
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        if !(self.start_price.is_finite() && self.start_price > 0.0) {
            return Err(DataError::Other(format!(
                "synthetic start price must be positive, got {}",
                self.start_price
            )));
        }
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars: generate_bars(symbol, start, end, self.start_price, self.max_daily_move),
            source: DataSource::Synthetic,
        })
    }
}
