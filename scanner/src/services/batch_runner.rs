// Sequential batch over the ticker list
use shared::Strategy;
use tracing::{info, warn};

use super::analysis::{analyze_ticker, AnalysisResult};
use crate::data::PriceSource;

/// Results of one batch. `results` and `kept` follow input order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub results: Vec<AnalysisResult>,
    pub kept: Vec<String>,
    pub dropped: Vec<String>,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.kept.len() + self.dropped.len()
    }
}

pub struct BatchRunner<'a> {
    source: &'a dyn PriceSource,
    strategy: Strategy,
    previous_from_series: bool,
}

impl<'a> BatchRunner<'a> {
    pub fn new(source: &'a dyn PriceSource, strategy: Strategy) -> Self {
        Self {
            source,
            strategy,
            previous_from_series: false,
        }
    }

    pub fn with_previous_from_series(mut self, enabled: bool) -> Self {
        self.previous_from_series = enabled;
        self
    }

    /// Analyse every ticker one after another. A failing ticker is logged and
    /// dropped; it never stops the batch.
    pub async fn run(&self, tickers: &[String]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        info!(count = tickers.len(), strategy = %self.strategy, "Starting analysis of tickers (latest day)");

        for (idx, ticker) in tickers.iter().enumerate() {
            match analyze_ticker(self.source, ticker, self.strategy, self.previous_from_series).await {
                Ok(result) => {
                    let s = &result.snapshot;
                    match self.strategy {
                        Strategy::RsiSma => info!(
                            progress = %format!("{}/{}", idx + 1, tickers.len()),
                            symbol = %ticker,
                            close = %format!("{:.2}", s.close),
                            rsi = %format!("{:.2}", s.rsi),
                            sma20 = %format!("{:.2}", s.sma20),
                            signal = %result.signal,
                            "Ticker analysed"
                        ),
                        Strategy::Macd => info!(
                            progress = %format!("{}/{}", idx + 1, tickers.len()),
                            symbol = %ticker,
                            close = %format!("{:.2}", s.close),
                            macd = %format!("{:.2}", s.macd),
                            signal_line = %format!("{:.2}", s.signal),
                            sma50 = %format!("{:.2}", s.sma50),
                            trade = %result.signal,
                            "Ticker analysed"
                        ),
                    }
                    outcome.kept.push(ticker.clone());
                    outcome.results.push(result);
                }
                Err(e) => {
                    warn!(symbol = %ticker, error = %e, "No usable data for ticker, dropping it");
                    outcome.dropped.push(ticker.clone());
                }
            }
        }
        outcome
    }
}
