//! Analysis configuration and named presets.
//!
//! Every tunable of the engine lives here: band window and multiplier, width
//! lookback and thresholds, crossing strictness, positional buckets,
//! persistence window, and the advisory rule table. Configs are loaded from
//! TOML; any omitted field takes its canonical default.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("unknown preset '{0}' (valid: canonical, classic)")]
    UnknownPreset(String),
}

/// Which bands the previous close is compared against when detecting crossings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossingReference {
    /// Previous close vs previous bar's bands.
    PreviousBands,
    /// Previous close vs the current bar's upper and lower bands. The
    /// midline check still uses the previous bar's middle band.
    CurrentBands,
}

/// Whether crossing checks within a boundary group may fire together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMode {
    /// All six checks run independently.
    Independent,
    /// At most one outer-band crossing and at most one midline crossing.
    FirstMatch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandConfig {
    pub window: usize,
    pub multiplier: f64,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            window: 20,
            multiplier: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidthConfig {
    /// Bars between the latest width and the comparison point.
    pub lookback: usize,
    /// Trend classification: ratio above this is expanding.
    pub expanding_ratio: f64,
    /// Trend classification: ratio below this is contracting.
    pub contracting_ratio: f64,
    /// Width-regime signal fires above this ratio.
    pub signal_expanding_ratio: f64,
    /// Width-regime signal fires below this ratio.
    pub signal_contracting_ratio: f64,
}

impl Default for WidthConfig {
    fn default() -> Self {
        Self {
            lookback: 5,
            expanding_ratio: 1.05,
            contracting_ratio: 0.95,
            signal_expanding_ratio: 1.1,
            signal_contracting_ratio: 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossingConfig {
    pub reference: CrossingReference,
    pub boundary_mode: BoundaryMode,
}

impl Default for CrossingConfig {
    fn default() -> Self {
        Self {
            reference: CrossingReference::PreviousBands,
            boundary_mode: BoundaryMode::Independent,
        }
    }
}

/// %B bucket lower bounds, strictly descending:
/// near-upper, strong, neutral-strong, neutral-weak, weak. Anything at or
/// below the last bound is near-lower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionalConfig {
    pub thresholds: [f64; 5],
}

impl Default for PositionalConfig {
    fn default() -> Self {
        Self {
            thresholds: [0.9, 0.7, 0.5, 0.3, 0.1],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Number of most recent bars inspected.
    pub window: usize,
    /// Closes on one side of the midline needed to call a continuation.
    pub min_days: usize,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            window: 5,
            min_days: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    pub overbought_percent_b: f64,
    pub oversold_percent_b: f64,
    pub expanding_ratio: f64,
    pub range_low_percent_b: f64,
    pub range_high_percent_b: f64,
    pub contracting_ratio: f64,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            overbought_percent_b: 0.9,
            oversold_percent_b: 0.1,
            expanding_ratio: 1.05,
            range_low_percent_b: 0.3,
            range_high_percent_b: 0.7,
            contracting_ratio: 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Periods of the plain moving averages shown alongside the bands.
    pub moving_averages: Vec<usize>,
    /// Number of trailing bars echoed in the report.
    pub recent_bars: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            moving_averages: vec![5, 10],
            recent_bars: 5,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Name of the preset this config started from.
    pub preset: String,
    pub bands: BandConfig,
    pub width: WidthConfig,
    pub crossing: CrossingConfig,
    pub positional: PositionalConfig,
    pub persistence: PersistenceConfig,
    pub advisory: AdvisoryConfig,
    pub report: ReportConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Preset::Canonical.config()
    }
}

impl AnalysisConfig {
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Build a config from a preset with an optional TOML document on top.
    ///
    /// The preset is `preset` if given, else the document's `preset` key,
    /// else canonical. Keys present in the document override the preset's
    /// values; omitted keys keep them.
    pub fn layered(preset: Option<Preset>, document: Option<&str>) -> Result<Self, ConfigError> {
        let overrides: toml::Table = match document {
            Some(text) => toml::from_str(text)?,
            None => toml::Table::new(),
        };
        let preset = match preset {
            Some(p) => p,
            None => match overrides.get("preset").and_then(toml::Value::as_str) {
                Some(name) => Preset::from_name(name)?,
                None => Preset::Canonical,
            },
        };

        let mut merged = toml::Value::try_from(preset.config())
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if let toml::Value::Table(base) = &mut merged {
            merge_tables(base, overrides);
            base.insert("preset".into(), toml::Value::String(preset.name().into()));
        }
        let config: Self = merged.try_into()?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bands.window == 0 {
            return Err(ConfigError::Invalid("bands.window must be >= 1".into()));
        }
        if !(self.bands.multiplier.is_finite() && self.bands.multiplier >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "bands.multiplier must be finite and >= 0, got {}",
                self.bands.multiplier
            )));
        }
        if self.width.lookback == 0 {
            return Err(ConfigError::Invalid("width.lookback must be >= 1".into()));
        }
        if self.width.contracting_ratio > self.width.expanding_ratio {
            return Err(ConfigError::Invalid(
                "width.contracting_ratio must not exceed width.expanding_ratio".into(),
            ));
        }
        if self.width.signal_contracting_ratio > self.width.signal_expanding_ratio {
            return Err(ConfigError::Invalid(
                "width.signal_contracting_ratio must not exceed width.signal_expanding_ratio"
                    .into(),
            ));
        }
        let t = &self.positional.thresholds;
        if t.windows(2).any(|pair| pair[0] <= pair[1]) || t.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "positional.thresholds must be finite and strictly descending, got {t:?}"
            )));
        }
        if self.persistence.window == 0 {
            return Err(ConfigError::Invalid("persistence.window must be >= 1".into()));
        }
        if self.persistence.min_days == 0 || self.persistence.min_days > self.persistence.window {
            return Err(ConfigError::Invalid(format!(
                "persistence.min_days must be in 1..={}, got {}",
                self.persistence.window, self.persistence.min_days
            )));
        }
        if self.advisory.range_low_percent_b >= self.advisory.range_high_percent_b {
            return Err(ConfigError::Invalid(
                "advisory.range_low_percent_b must be below advisory.range_high_percent_b".into(),
            ));
        }
        if self.report.moving_averages.contains(&0) {
            return Err(ConfigError::Invalid("report.moving_averages periods must be >= 1".into()));
        }
        Ok(())
    }
}

fn merge_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(inner)), toml::Value::Table(over)) => {
                merge_tables(inner, over)
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Named starting points for the engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Crossings against the previous bar's bands, all checks independent.
    Canonical,
    /// Crossings against the current bar's bands, first match per boundary
    /// group, wider extreme %B buckets.
    Classic,
}

impl Preset {
    pub fn all() -> &'static [Preset] {
        &[Preset::Canonical, Preset::Classic]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Canonical => "canonical",
            Preset::Classic => "classic",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Preset::Canonical => {
                "prev close vs prev bands; all six crossings independent; \
                 %B buckets 0.9/0.7/0.5/0.3/0.1"
            }
            Preset::Classic => {
                "prev close vs current outer bands and prev midline; \
                 one outer and one midline crossing at most; %B buckets 0.95/0.7/0.5/0.3/0.05"
            }
        }
    }

    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "canonical" => Ok(Preset::Canonical),
            "classic" => Ok(Preset::Classic),
            _ => Err(ConfigError::UnknownPreset(name.to_string())),
        }
    }

    pub fn config(&self) -> AnalysisConfig {
        let base = AnalysisConfig {
            preset: self.name().to_string(),
            bands: BandConfig::default(),
            width: WidthConfig::default(),
            crossing: CrossingConfig::default(),
            positional: PositionalConfig::default(),
            persistence: PersistenceConfig::default(),
            advisory: AdvisoryConfig::default(),
            report: ReportConfig::default(),
        };
        match self {
            Preset::Canonical => base,
            Preset::Classic => AnalysisConfig {
                crossing: CrossingConfig {
                    reference: CrossingReference::CurrentBands,
                    boundary_mode: BoundaryMode::FirstMatch,
                },
                positional: PositionalConfig {
                    thresholds: [0.95, 0.7, 0.5, 0.3, 0.05],
                },
                ..base
            },
        }
    }
}
