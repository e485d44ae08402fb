//! Fetch window: "the last `count` trading days ending at `end`".
//!
//! Providers take calendar dates, so the count is widened to a calendar
//! span (five trading days per seven calendar days plus a holiday pad) and
//! the ingested series is cut back to the last `count` bars.

use super::ingest::ingest;
use super::provider::{DataError, DataProvider};
use super::symbol::SecurityId;
use crate::domain::PriceSeries;
use chrono::{Days, NaiveDate};
use tracing::info;

pub const DEFAULT_COUNT: usize = 120;

/// Calendar days added on top of the weekday estimate for exchange holidays.
const HOLIDAY_PAD_DAYS: u64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub count: usize,
    /// Last date to include; today when `None`.
    pub end: Option<NaiveDate>,
}

impl Default for FetchRequest {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            end: None,
        }
    }
}

impl FetchRequest {
    pub fn new(count: usize, end: Option<NaiveDate>) -> Self {
        Self { count, end }
    }

    /// Calendar span wide enough to hold `count` trading days, or `None`
    /// when the count is too large to express.
    pub fn calendar_days(&self) -> Option<u64> {
        let count = u64::try_from(self.count).ok()?;
        let weekdays = count.checked_mul(7)?.checked_add(4)? / 5;
        weekdays.checked_add(HOLIDAY_PAD_DAYS)
    }

    /// Inclusive `(start, end)` dates to request from a provider.
    pub fn resolve(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), DataError> {
        if self.count == 0 {
            return Err(DataError::InvalidWindow("bar count must be >= 1".into()));
        }
        let end = self.end.unwrap_or(today);
        let start = self
            .calendar_days()
            .and_then(|days| end.checked_sub_days(Days::new(days)))
            .ok_or_else(|| {
                let reason = format!("{} bars before {end} is out of range", self.count);
                DataError::InvalidWindow(reason)
            })?;
        Ok((start, end))
    }
}

/// Fetch, ingest and trim a series for one security.
pub fn load_series(
    provider: &dyn DataProvider,
    id: &SecurityId,
    request: &FetchRequest,
    today: NaiveDate,
) -> Result<PriceSeries, DataError> {
    let (start, end) = request.resolve(today)?;
    let symbol = id.yahoo_symbol();
    info!(
        provider = provider.name(),
        %symbol,
        %start,
        %end,
        count = request.count,
        "fetching bars"
    );

    let fetched = provider.fetch(&symbol, start, end)?;
    let source = fetched.source;
    let series = ingest(fetched)?;
    if series.len() < request.count {
        info!(
            %symbol,
            bars = series.len(),
            requested = request.count,
            ?source,
            "provider returned fewer bars than requested"
        );
    }
    if series.len() <= request.count {
        return Ok(series);
    }
    Ok(PriceSeries::new(symbol, series.tail(request.count).to_vec())?)
}
