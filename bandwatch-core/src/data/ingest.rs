//! Ingestion: provider bars → validated `PriceSeries`.
//!
//! Bars are sorted by date, void bars (no finite close) are dropped and
//! duplicate dates collapse to the last occurrence. Bars whose OHLC fields
//! disagree are kept (only the close is analyzed) but counted.

use super::provider::{DataError, FetchResult, RawBar};
use crate::domain::{Bar, PriceSeries};
use tracing::{debug, warn};

/// Counts of what ingestion removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub received: usize,
    pub void_dropped: usize,
    pub duplicates_dropped: usize,
    pub kept: usize,
    /// Kept bars that fail the OHLC sanity check.
    pub inconsistent: usize,
}

pub fn normalize_bars(raw: Vec<RawBar>) -> (Vec<Bar>, IngestStats) {
    let mut stats = IngestStats {
        received: raw.len(),
        ..IngestStats::default()
    };

    let mut raw: Vec<RawBar> = raw
        .into_iter()
        .filter(|b| {
            let usable = b.close.is_finite();
            if !usable {
                stats.void_dropped += 1;
            }
            usable
        })
        .collect();
    // Stable sort keeps provider order among equal dates, so "last" stays last.
    raw.sort_by_key(|b| b.date);

    let mut bars: Vec<Bar> = Vec::with_capacity(raw.len());
    for b in raw {
        let bar = Bar {
            date: b.date,
            open: b.open,
            high: b.high,
            low: b.low,
            close: b.close,
            volume: b.volume,
        };
        match bars.last_mut() {
            Some(prev) if prev.date == bar.date => {
                *prev = bar;
                stats.duplicates_dropped += 1;
            }
            _ => bars.push(bar),
        }
    }
    stats.kept = bars.len();
    stats.inconsistent = bars.iter().filter(|b| !b.is_sane()).count();
    (bars, stats)
}

/// Build the series for a fetch result.
pub fn ingest(fetched: FetchResult) -> Result<PriceSeries, DataError> {
    let (bars, stats) = normalize_bars(fetched.bars);
    if stats.void_dropped > 0 || stats.duplicates_dropped > 0 {
        warn!(
            symbol = %fetched.symbol,
            void = stats.void_dropped,
            duplicates = stats.duplicates_dropped,
            "dropped unusable bars during ingestion"
        );
    }
    if stats.inconsistent > 0 {
        debug!(
            symbol = %fetched.symbol,
            inconsistent = stats.inconsistent,
            "bars with inconsistent OHLC kept"
        );
    }
    debug!(symbol = %fetched.symbol, source = ?fetched.source, kept = stats.kept, "ingested bars");
    if bars.is_empty() {
        return Err(DataError::NoBars {
            symbol: fetched.symbol,
        });
    }
    Ok(PriceSeries::new(fetched.symbol, bars)?)
}
