//! Yahoo Finance data provider.
//!
//! Fetches daily bars from the v8 chart API with exponential-backoff retry
//! and the provider circuit breaker. Yahoo has no official API and its
//! response format can change without notice; the CSV provider is the
//! fallback.

use super::circuit_breaker::CircuitBreaker;
use super::provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

pub struct YahooProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooProvider {
    /// 30 s timeout, 3 retries starting at 500 ms.
    pub fn new(circuit_breaker: Arc<CircuitBreaker>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            circuit_breaker,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    /// Override the retry count and the first backoff delay.
    pub fn with_retry(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.base_delay = base_delay;
        self
    }

    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let end_ts = end.and_time(NaiveTime::MIN).and_utc().timestamp() + 86_399;
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d"
        )
    }

    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<RawBar>, DataError> {
        let ChartResult { result, error } = resp.chart;
        let result = result.ok_or_else(|| match error {
            Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            },
            Some(err) => {
                DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
            }
            None => DataError::ResponseFormatChanged("empty result with no error".into()),
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| DataError::ResponseFormatChanged("no timestamps".into()))?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();

            // Non-trading days come back as all-null rows.
            if open.is_none()
                && high.is_none()
                && low.is_none()
                && close.is_none()
                && volume.is_none()
            {
                continue;
            }

            bars.push(RawBar {
                date,
                open: open.unwrap_or(f64::NAN),
                high: high.unwrap_or(f64::NAN),
                low: low.unwrap_or(f64::NAN),
                close: close.unwrap_or(f64::NAN),
                volume: volume.unwrap_or(0),
            });
        }

        if bars.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        Ok(bars)
    }

    fn tripped(&self) -> DataError {
        DataError::CircuitBreakerTripped {
            remaining_secs: self.circuit_breaker.remaining_cooldown().as_secs(),
        }
    }

    fn fetch_with_retry(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, DataError> {
        let url = Self::chart_url(symbol, start, end);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                let delay_ms = delay.as_millis() as u64;
                debug!(symbol, attempt, delay_ms, "retrying chart request");
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(self.tripped());
            }

            let resp = match self.client.get(&url).send() {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    warn!(symbol, error = %e, "chart request failed");
                    last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                    continue;
                }
                Err(e) => return Err(DataError::NetworkUnreachable(e.to_string())),
            };

            let status = resp.status();
            if status == reqwest::StatusCode::FORBIDDEN {
                self.circuit_breaker.trip();
                return Err(self.tripped());
            }
            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(DataError::AuthenticationRequired(
                    "Yahoo Finance requires authentication".into(),
                ));
            }
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                self.circuit_breaker.record_failure();
                let retry_after = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                warn!(symbol, retry_after, "rate limited by provider");
                last_error = Some(DataError::RateLimited {
                    retry_after_secs: retry_after,
                });
                continue;
            }
            if !status.is_success() {
                self.circuit_breaker.record_failure();
                warn!(symbol, %status, "chart request returned an error status");
                last_error = Some(DataError::Other(format!("HTTP {status} for {symbol}")));
                continue;
            }

            let chart: ChartResponse = resp.json().map_err(|e| {
                let reason = format!("failed to parse response for {symbol}: {e}");
                DataError::ResponseFormatChanged(reason)
            })?;
            let bars = Self::parse_response(symbol, chart)?;
            self.circuit_breaker.record_success();
            debug!(symbol, bars = bars.len(), "chart request succeeded");
            return Ok(bars);
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        if start > end {
            return Err(DataError::InvalidWindow(format!("start {start} is after end {end}")));
        }
        let bars = self.fetch_with_retry(symbol, start, end)?;
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::YahooFinance,
        })
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Vec<RawBar>, DataError> {
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        YahooProvider::parse_response("600519.SS", resp)
    }

    #[test]
    fn url_covers_whole_end_day() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
        let url = YahooProvider::chart_url("600519.SS", start, end);
        assert!(url.starts_with("https://query2.finance.yahoo.com/v8/finance/chart/600519.SS?"));
        assert!(url.contains("period1=1735776000"));
        assert!(url.contains("period2=1735948799"));
        assert!(url.contains("interval=1d"));
    }

    #[test]
    fn parses_quotes_and_skips_empty_rows() {
        let json = r#"{"chart":{"result":[{
            "timestamp":[1735781400,1735867800,1735954200],
            "indicators":{"quote":[{
                "open":[10.0,null,10.4],
                "high":[10.5,null,10.9],
                "low":[9.8,null,10.1],
                "close":[10.2,null,null],
                "volume":[1000,null,1200]
            }]}
        }],"error":null}}"#;
        let bars = parse(json).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(bars[0].close, 10.2);
        assert!(bars[1].close.is_nan());
        assert_eq!(bars[1].volume, 1200);
    }

    #[test]
    fn not_found_error() {
        let json = r#"{"chart":{"result":null,
            "error":{"code":"Not Found","description":"No data found"}}}"#;
        assert!(matches!(parse(json), Err(DataError::SymbolNotFound { .. })));
    }

    #[test]
    fn other_errors_are_format_changes() {
        let json = r#"{"chart":{"result":null,
            "error":{"code":"Bad Request","description":"Invalid input"}}}"#;
        assert!(matches!(parse(json), Err(DataError::ResponseFormatChanged(_))));
    }

    #[test]
    fn refuses_while_breaker_open() {
        let breaker = Arc::new(CircuitBreaker::default_provider());
        breaker.trip();
        let provider = YahooProvider::new(Arc::clone(&breaker)).unwrap();
        assert!(!provider.is_available());
        let day = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let err = provider.fetch("SPY", day, day).unwrap_err();
        assert!(matches!(err, DataError::CircuitBreakerTripped { .. }));
    }

    #[test]
    fn retry_settings_override_defaults() {
        let breaker = Arc::new(CircuitBreaker::default_provider());
        let provider = YahooProvider::new(Arc::clone(&breaker)).unwrap();
        assert_eq!(provider.max_retries, 3);
        assert_eq!(provider.base_delay, Duration::from_millis(500));

        let provider = provider.with_retry(0, Duration::ZERO);
        assert_eq!(provider.max_retries, 0);
        assert_eq!(provider.base_delay, Duration::ZERO);

        // No retries still consults the breaker before the first request.
        breaker.trip();
        let day = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let err = provider.fetch("SPY", day, day).unwrap_err();
        assert!(matches!(err, DataError::CircuitBreakerTripped { .. }));
    }
}
