// Persisted ticker list: a single-column CSV with header `ticker`
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::ScanError;

pub const TICKER_HEADER: &str = "ticker";

#[derive(Debug, Serialize, Deserialize)]
struct TickerRow {
    ticker: String,
}

/// Create the ticker file with only its header when it does not exist.
/// Returns `true` when a new file was written.
pub fn ensure_ticker_file(path: &Path) -> Result<bool, ScanError> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record([TICKER_HEADER])?;
    wtr.flush()?;
    info!(path = %path.display(), "Created ticker file with header '{}'. Fill it with tickers.", TICKER_HEADER);
    Ok(true)
}

/// Symbols in file order, trimmed, blank rows skipped.
pub fn load_tickers(path: &Path) -> Result<Vec<String>, ScanError> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = rdr.headers()?.clone();
    if !headers.iter().any(|h| h.trim() == TICKER_HEADER) {
        return Err(ScanError::CsvDataFormatError(format!(
            "'{}' has no '{}' column",
            path.display(),
            TICKER_HEADER
        )));
    }

    let mut tickers = Vec::new();
    for row in rdr.deserialize::<TickerRow>() {
        let symbol = row?.ticker.trim().to_string();
        if !symbol.is_empty() {
            tickers.push(symbol);
        }
    }
    Ok(tickers)
}

/// Overwrite the ticker file with `tickers`, header included.
pub fn save_tickers(path: &Path, tickers: &[String]) -> Result<(), ScanError> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_path(path)?;
    wtr.write_record([TICKER_HEADER])?;
    for ticker in tickers {
        wtr.write_record([ticker.as_str()])?;
    }
    wtr.flush()?;
    info!(path = %path.display(), count = tickers.len(), "Saved updated ticker list");
    Ok(())
}
