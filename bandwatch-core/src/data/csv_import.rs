//! CSV file provider.
//!
//! Expected header: `date,open,high,low,close[,volume]`, dates as
//! `YYYY-MM-DD`. Empty numeric cells are read as missing.

use super::provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Open")]
    open: Option<f64>,
    #[serde(alias = "High")]
    high: Option<f64>,
    #[serde(alias = "Low")]
    low: Option<f64>,
    #[serde(alias = "Close")]
    close: Option<f64>,
    #[serde(default, alias = "Volume")]
    volume: Option<f64>,
}

impl From<CsvRow> for RawBar {
    fn from(row: CsvRow) -> Self {
        RawBar {
            date: row.date,
            open: row.open.unwrap_or(f64::NAN),
            high: row.high.unwrap_or(f64::NAN),
            low: row.low.unwrap_or(f64::NAN),
            close: row.close.unwrap_or(f64::NAN),
            volume: row.volume.filter(|v| v.is_finite() && *v >= 0.0).map_or(0, |v| v as u64),
        }
    }
}

/// Read every row of a bar CSV.
pub fn read_bars(path: &Path) -> Result<Vec<RawBar>, DataError> {
    let file = std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_bars_from(file, &path.display().to_string())
}

fn read_bars_from<R: std::io::Read>(reader: R, origin: &str) -> Result<Vec<RawBar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    rdr.deserialize::<CsvRow>()
        .enumerate()
        .map(|(i, row)| {
            row.map(RawBar::from).map_err(|e| DataError::Csv {
                path: origin.to_string(),
                message: format!("row {}: {e}", i + 1),
            })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct CsvProvider {
    path: PathBuf,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let bars: Vec<RawBar> = read_bars(&self.path)?
            .into_iter()
            .filter(|b| b.date >= start && b.date <= end)
            .collect();
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::CsvImport,
        })
    }
}
