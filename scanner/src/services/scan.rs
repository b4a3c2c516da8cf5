// One scheduled scan: ticker file in, results table out
use std::path::PathBuf;
use tracing::info;

use super::batch_runner::{BatchOutcome, BatchRunner};
use crate::config::ScanSettings;
use crate::data::{results, ticker_list, PriceSource};
use crate::error::ScanError;

#[derive(Debug)]
pub struct ScanReport {
    pub results_file: PathBuf,
    pub outcome: BatchOutcome,
}

/// Run the whole scan. Returns `None` when the ticker list is empty, in which
/// case nothing is analysed and no file besides the ticker file is touched.
pub async fn run_scan(settings: &ScanSettings, source: &dyn PriceSource) -> Result<Option<ScanReport>, ScanError> {
    let tickers_file = settings.tickers_file.as_path();
    ticker_list::ensure_ticker_file(tickers_file)?;
    let tickers = ticker_list::load_tickers(tickers_file)?;

    if tickers.is_empty() {
        info!(path = %tickers_file.display(), "No tickers found. Fill the file with tickers and run again.");
        return Ok(None);
    }

    let outcome = BatchRunner::new(source, settings.strategy)
        .with_previous_from_series(settings.macd_previous_from_series)
        .run(&tickers)
        .await;

    ticker_list::save_tickers(tickers_file, &outcome.kept)?;
    info!(
        working = outcome.kept.len(),
        total = tickers.len(),
        dropped = ?outcome.dropped,
        "Analysis finished"
    );

    let results_file = settings.results_file();
    results::write_results(&results_file, settings.strategy, &outcome.results)?;

    Ok(Some(ScanReport { results_file, outcome }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{rising, FakeSource};
    use shared::Strategy;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn settings_in(dir: &TempDir, strategy: Strategy) -> ScanSettings {
        ScanSettings {
            strategy,
            tickers_file: dir.path().join("tickers.csv"),
            results_dir: dir.path().to_path_buf(),
            ..ScanSettings::default()
        }
    }

    fn source() -> FakeSource {
        FakeSource {
            series: HashMap::from([
                ("AAPL".to_string(), rising(120)),
                ("EMPTY".to_string(), Vec::new()),
                ("MSFT".to_string(), rising(40)),
            ]),
        }
    }

    #[tokio::test]
    async fn test_missing_ticker_file_is_created_and_scan_skipped() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir, Strategy::RsiSma);

        let report = run_scan(&settings, &source()).await.unwrap();
        assert!(report.is_none());
        assert_eq!(std::fs::read_to_string(&settings.tickers_file).unwrap(), "ticker\n");
        assert!(!settings.results_file().exists());
    }

    #[tokio::test]
    async fn test_scan_prunes_failed_tickers() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir, Strategy::RsiSma);
        std::fs::write(&settings.tickers_file, "ticker\nAAPL\nEMPTY\nMSFT\nUNKNOWN\n").unwrap();

        let report = run_scan(&settings, &source()).await.unwrap().unwrap();
        assert_eq!(report.outcome.kept, vec!["AAPL", "MSFT"]);
        assert_eq!(report.outcome.dropped, vec!["EMPTY", "UNKNOWN"]);

        assert_eq!(std::fs::read_to_string(&settings.tickers_file).unwrap(), "ticker\nAAPL\nMSFT\n");

        let table = std::fs::read_to_string(&report.results_file).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "symbol,close,rsi,sma,signal");
        assert!(lines[1].starts_with("AAPL,"));
        assert!(lines[2].starts_with("MSFT,"));
        assert_eq!(lines.len(), 3);
    }

    #[tokio::test]
    async fn test_macd_scan_writes_macd_table() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir, Strategy::Macd);
        std::fs::write(&settings.tickers_file, "ticker\nMSFT\n").unwrap();

        let report = run_scan(&settings, &source()).await.unwrap().unwrap();
        assert!(report.results_file.ends_with("analysis_results_macd.csv"));
        let table = std::fs::read_to_string(&report.results_file).unwrap();
        assert!(table.starts_with("symbol,macd,signal,histogram,close,sma50,trade_signal\n"));
        assert!(table.trim_end().ends_with(",BUY"));
    }
}
