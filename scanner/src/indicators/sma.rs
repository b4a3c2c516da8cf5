// Simple Moving Average (SMA) indicator implementation
use super::{validate_period, IndicatorCalculator};
use crate::error::ScanError;
use serde_json::Value;

pub struct Sma {
    name: String,
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self, ScanError> {
        validate_period("SMA", period)?;
        Ok(Self {
            name: format!("SMA({})", period),
            period,
        })
    }
}

impl IndicatorCalculator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period, "min_periods": 1 })
    }

    /// Trailing mean over `period` closes. While fewer than `period` closes
    /// exist, the mean covers everything seen so far.
    fn calculate(&self, closes: &[f64]) -> Vec<f64> {
        let mut results = Vec::with_capacity(closes.len());
        let mut sum = 0.0;

        for (i, close) in closes.iter().enumerate() {
            sum += close;
            if i >= self.period {
                sum -= closes[i - self.period];
            }
            let count = (i + 1).min(self.period);
            results.push(sum / count as f64);
        }
        results
    }
}
