// Per-ticker fetch, indicator and classification step
use serde::Serialize;
use shared::{Strategy, TradeSignal};
use tracing::debug;

use crate::data::PriceSource;
use crate::error::ScanError;
use crate::indicators::IndicatorSnapshot;
use crate::signals;

/// Outcome of analysing one ticker in one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub symbol: String,
    pub strategy: Strategy,
    pub snapshot: IndicatorSnapshot,
    pub signal: TradeSignal,
}

/// Fetch the history of `symbol`, compute its latest snapshot and classify it.
///
/// With `previous_from_series` the MACD policy compares against the day
/// before the latest one; otherwise it runs without a previous state.
pub async fn analyze_ticker(
    source: &dyn PriceSource,
    symbol: &str,
    strategy: Strategy,
    previous_from_series: bool,
) -> Result<AnalysisResult, ScanError> {
    let series = source.daily_history(symbol).await?;
    if series.is_empty() {
        return Err(ScanError::fetch(symbol, "no price data returned"));
    }
    debug!(symbol, points = series.len(), "Fetched price history");

    let snapshot = IndicatorSnapshot::from_series(&series)?;
    let previous = if previous_from_series { snapshot.previous } else { None };
    let signal = signals::classify(strategy, &snapshot, previous);

    Ok(AnalysisResult {
        symbol: symbol.to_string(),
        strategy,
        snapshot,
        signal,
    })
}
