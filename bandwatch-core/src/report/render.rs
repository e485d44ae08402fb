//! Presentation of a finished report: plain text, JSON and chart CSV.

use super::{AnalysisReport, ChartSeries};
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

// ─── Text ───────────────────────────────────────────────────────────

fn price(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.1}%", v * 100.0))
}

/// Render the report as a human-readable block of text.
pub fn render_text(report: &AnalysisReport) -> String {
    let mut out = String::with_capacity(1024);
    let r = &report.regime;

    out.push_str(&format!(
        "{} - Bollinger regime as of {} ({} bars, preset {})\n",
        report.symbol, report.as_of, report.bar_count, report.preset
    ));
    out.push_str(&format!("status: {}\n\n", report.status.describe()));

    out.push_str("Regime\n");
    out.push_str(&format!("  price          {:.2}\n", r.current_price));
    out.push_str(&format!("  upper band     {}\n", price(r.current_upper)));
    out.push_str(&format!("  middle band    {}\n", price(r.current_mid)));
    out.push_str(&format!("  lower band     {}\n", price(r.current_lower)));
    out.push_str(&format!("  %B             {}\n", percent(r.percent_b)));
    out.push_str(&format!("  band width     {}\n", percent(r.width)));
    out.push_str(&format!(
        "  width ratio    {}\n",
        r.width_ratio
            .map_or_else(|| "n/a".to_string(), |v| format!("x{v:.3}"))
    ));
    out.push_str(&format!(
        "  width trend    {}\n",
        r.width_trend.map_or("n/a", |t| t.label())
    ));
    out.push_str(&format!(
        "  midline slope  {}\n",
        r.midline_slope.map_or("n/a", |s| s.label())
    ));
    out.push_str(&format!(
        "  position       {}\n",
        r.position.map_or("n/a", |p| p.label())
    ));

    out.push_str("\nMoving averages\n");
    for ma in &report.moving_averages {
        out.push_str(&format!("  MA{:<12} {}\n", ma.period, price(ma.value)));
    }

    out.push_str("\nSignals\n");
    if report.signals.signals.is_empty() {
        out.push_str("  (none)\n");
    }
    for message in report.signals.messages() {
        out.push_str(&format!("  - {message}\n"));
    }
    for skipped in &report.signals.unavailable {
        out.push_str(&format!("  ? {}\n", skipped.label()));
    }

    out.push_str(&format!("\nAdvisory: {}\n", report.advisory.message()));

    if !report.recent_bars.is_empty() {
        out.push_str("\nRecent bars\n");
        out.push_str("  date        open      high      low       close     volume\n");
        for bar in &report.recent_bars {
            out.push_str(&format!(
                "  {}  {:<9.2} {:<9.2} {:<9.2} {:<9.2} {}\n",
                bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
            ));
        }
    }

    out.push_str(&format!("\nfingerprint {}\n", report.fingerprint));
    out
}

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_json(report: &AnalysisReport) -> Result<String, RenderError> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn import_json(json: &str) -> Result<AnalysisReport, RenderError> {
    Ok(serde_json::from_str(json)?)
}

// ─── Chart CSV ──────────────────────────────────────────────────────

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}

/// Write `date,close,upper,middle,lower`; undefined band entries are empty cells.
pub fn write_chart_csv<W: io::Write>(chart: &ChartSeries, writer: W) -> Result<(), RenderError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["date", "close", "upper", "middle", "lower"])?;
    for i in 0..chart.len() {
        wtr.write_record([
            chart.dates[i].to_string(),
            format!("{:.6}", chart.close[i]),
            cell(chart.upper[i]),
            cell(chart.middle[i]),
            cell(chart.lower[i]),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn export_chart_csv(chart: &ChartSeries) -> Result<String, RenderError> {
    let mut buf = Vec::new();
    write_chart_csv(chart, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn save_chart_csv(chart: &ChartSeries, path: &Path) -> Result<(), RenderError> {
    let file = std::fs::File::create(path).map_err(|source| RenderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    write_chart_csv(chart, io::BufWriter::new(file))
}
