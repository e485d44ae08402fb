//! Market-data provider contract and its error type.
//!
//! The analysis core never talks to a provider directly. A provider returns
//! raw bars for a symbol and date range; ingestion turns them into a
//! `PriceSeries`.

use crate::domain::SeriesError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Daily bar as delivered by a provider, before validation.
///
/// Missing fields arrive as NaN; a NaN close makes the bar void.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("provider has blocked requests (circuit breaker open, {remaining_secs}s left)")]
    CircuitBreakerTripped { remaining_secs: u64 },

    #[error("invalid security identifier '{input}': {reason}")]
    InvalidSymbol { input: String, reason: String },

    #[error("invalid fetch window: {0}")]
    InvalidWindow(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {message}")]
    Csv { path: String, message: String },

    #[error("no usable bars for {symbol}")]
    NoBars { symbol: String },

    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error("data error: {0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<RawBar>,
    pub source: DataSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Synthetic,
}

impl DataSource {
    pub fn label(&self) -> &'static str {
        match self {
            DataSource::YahooFinance => "yahoo finance",
            DataSource::CsvImport => "csv import",
            DataSource::Synthetic => "SYNTHETIC",
        }
    }
}

/// Source of daily OHLC bars.
pub trait DataProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch daily bars for `symbol` with dates in `[start, end]`.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError>;

    /// False while the provider is refusing requests (e.g. circuit breaker open).
    fn is_available(&self) -> bool {
        true
    }
}
