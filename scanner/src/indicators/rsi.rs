// Relative Strength Index (RSI) indicator implementation
use super::{validate_period, IndicatorCalculator};
use crate::error::ScanError;
use serde_json::Value;

pub struct Rsi {
    name: String,
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Result<Self, ScanError> {
        validate_period("RSI", period)?;
        Ok(Self {
            name: format!("RSI({})", period),
            period,
        })
    }
}

impl IndicatorCalculator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period, "min_periods": 1 })
    }

    /// Average gain and loss are plain trailing means of the last `period`
    /// daily changes (fewer while the history is short).
    ///
    /// The first day has no change and yields NaN. A window without losses
    /// divides by zero on purpose: RS becomes +inf and RSI lands on 100.
    fn calculate(&self, closes: &[f64]) -> Vec<f64> {
        let mut gains = vec![0.0; closes.len()];
        let mut losses = vec![0.0; closes.len()];
        for i in 1..closes.len() {
            let change = closes[i] - closes[i - 1];
            gains[i] = change.max(0.0);
            losses[i] = (-change).max(0.0);
        }

        let mut results = Vec::with_capacity(closes.len());
        for i in 0..closes.len() {
            // changes exist from index 1 onwards
            let start = (i + 1).saturating_sub(self.period).max(1);
            if start > i {
                results.push(f64::NAN);
                continue;
            }
            let count = (i + 1 - start) as f64;
            // window sums are recomputed so an all-gain window keeps an exact zero loss
            let avg_gain = gains[start..=i].iter().sum::<f64>() / count;
            let avg_loss = losses[start..=i].iter().sum::<f64>() / count;
            let rs = avg_gain / avg_loss;
            results.push(100.0 - 100.0 / (1.0 + rs));
        }
        results
    }
}
