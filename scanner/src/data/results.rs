// Results table, one row per analysed ticker
use csv::WriterBuilder;
use serde::Serialize;
use shared::{Strategy, TradeSignal};
use std::path::Path;
use tracing::info;

use crate::error::ScanError;
use crate::services::analysis::AnalysisResult;

#[derive(Debug, Serialize)]
struct RsiSmaRow<'a> {
    symbol: &'a str,
    close: Option<f64>,
    rsi: Option<f64>,
    sma: Option<f64>,
    signal: TradeSignal,
}

#[derive(Debug, Serialize)]
struct MacdRow<'a> {
    symbol: &'a str,
    macd: Option<f64>,
    signal: Option<f64>,
    histogram: Option<f64>,
    close: Option<f64>,
    sma50: Option<f64>,
    trade_signal: TradeSignal,
}

// NaN is written as an empty cell
fn cell(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

pub fn columns(strategy: Strategy) -> &'static [&'static str] {
    match strategy {
        Strategy::RsiSma => &["symbol", "close", "rsi", "sma", "signal"],
        Strategy::Macd => &["symbol", "macd", "signal", "histogram", "close", "sma50", "trade_signal"],
    }
}

/// Overwrite `path` with the results table of `strategy`. The header is
/// written even when there are no results.
pub fn write_results(path: &Path, strategy: Strategy, results: &[AnalysisResult]) -> Result<(), ScanError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut wtr = WriterBuilder::new().has_headers(false).from_path(path)?;
    wtr.write_record(columns(strategy))?;

    for result in results {
        let s = &result.snapshot;
        match strategy {
            Strategy::RsiSma => wtr.serialize(RsiSmaRow {
                symbol: &result.symbol,
                close: cell(s.close),
                rsi: cell(s.rsi),
                sma: cell(s.sma20),
                signal: result.signal,
            })?,
            Strategy::Macd => wtr.serialize(MacdRow {
                symbol: &result.symbol,
                macd: cell(s.macd),
                signal: cell(s.signal),
                histogram: cell(s.histogram),
                close: cell(s.close),
                sma50: cell(s.sma50),
                trade_signal: result.signal,
            })?,
        }
    }
    wtr.flush()?;
    info!(path = %path.display(), rows = results.len(), %strategy, "Results written");
    Ok(())
}
