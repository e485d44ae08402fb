//! Market-data collaborators: identifier normalization, providers,
//! ingestion and fetch-window resolution.

pub mod circuit_breaker;
pub mod csv_import;
pub mod ingest;
pub mod provider;
pub mod symbol;
pub mod synthetic;
pub mod window;
pub mod yahoo;

pub use circuit_breaker::CircuitBreaker;
pub use csv_import::CsvProvider;
pub use ingest::{ingest, IngestStats};
pub use provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
pub use symbol::{Exchange, SecurityId};
pub use synthetic::SyntheticProvider;
pub use window::{load_series, FetchRequest, DEFAULT_COUNT};
pub use yahoo::YahooProvider;
