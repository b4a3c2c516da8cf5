// Technical indicators module
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod snapshot;

pub use ema::Ema;
pub use macd::{Macd, MacdSeries};
pub use rsi::Rsi;
pub use sma::Sma;
pub use snapshot::IndicatorSnapshot;

use serde_json::Value;

use crate::error::ScanError;

// Common trait for all indicators.
// Every calculator returns exactly one value per input close.
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    fn calculate(&self, closes: &[f64]) -> Vec<f64>;
}

pub(crate) fn validate_period(indicator: &str, period: usize) -> Result<(), ScanError> {
    if period == 0 {
        return Err(ScanError::IndicatorError(format!(
            "{} period must be greater than 0",
            indicator
        )));
    }
    Ok(())
}
