//! BandWatch Core: Bollinger Band regime analysis for a daily price series.
//!
//! This crate contains the analysis engine and its data collaborators:
//! - Domain types (bars, the validated price series)
//! - Rolling indicators (simple moving average, Bollinger bands)
//! - Regime classifiers (position, %B, width trend, crossings, persistence)
//! - Signal aggregation and the advisory rule table
//! - The pipeline producing an `AnalysisReport`, plus text/JSON/CSV rendering
//! - Market-data providers (Yahoo Finance, CSV, synthetic) and ingestion

pub mod advisory;
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod report;
pub mod signals;

pub use advisory::Advisory;
pub use config::{AnalysisConfig, ConfigError, Preset};
pub use domain::{Bar, PriceSeries, SeriesError};
pub use report::{analyze, AnalysisError, AnalysisReport};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: public core types are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain
        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();

        // Indicators
        require_send::<indicators::Sma>();
        require_sync::<indicators::Sma>();
        require_send::<indicators::Bollinger>();
        require_sync::<indicators::Bollinger>();
        require_send::<indicators::BandSet>();
        require_sync::<indicators::BandSet>();

        // Analysis
        require_send::<analysis::WidthAnalysis>();
        require_sync::<analysis::WidthAnalysis>();
        require_send::<analysis::CrossingOutcome>();
        require_sync::<analysis::CrossingOutcome>();
        require_send::<analysis::MidlineTally>();
        require_sync::<analysis::MidlineTally>();

        // Signals, advisory, report
        require_send::<signals::SignalSet>();
        require_sync::<signals::SignalSet>();
        require_send::<signals::SignalAggregator<'static>>();
        require_sync::<signals::SignalAggregator<'static>>();
        require_send::<Advisory>();
        require_sync::<Advisory>();
        require_send::<AnalysisReport>();
        require_sync::<AnalysisReport>();
        require_send::<AnalysisConfig>();
        require_sync::<AnalysisConfig>();

        // Data
        require_send::<data::CircuitBreaker>();
        require_sync::<data::CircuitBreaker>();
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
        require_send::<data::CsvProvider>();
        require_sync::<data::CsvProvider>();
        require_send::<data::SyntheticProvider>();
        require_sync::<data::SyntheticProvider>();
        require_send::<data::SecurityId>();
        require_sync::<data::SecurityId>();
    }

    /// The pipeline depends on the provider only through the trait object.
    #[test]
    fn providers_are_object_safe() {
        fn _takes(provider: &dyn data::DataProvider) -> &str {
            provider.name()
        }
        let synthetic = data::SyntheticProvider::default();
        assert_eq!(_takes(&synthetic), "synthetic");
    }
}
