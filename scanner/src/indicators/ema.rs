// Exponential Moving Average (EMA) indicator implementation
use super::{validate_period, IndicatorCalculator};
use crate::error::ScanError;
use serde_json::Value;

pub struct Ema {
    name: String,
    span: usize,
}

impl Ema {
    pub fn new(span: usize) -> Result<Self, ScanError> {
        validate_period("EMA", span)?;
        Ok(Self {
            name: format!("EMA({})", span),
            span,
        })
    }

    pub fn alpha(&self) -> f64 {
        2.0 / (self.span as f64 + 1.0)
    }
}

impl IndicatorCalculator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "span": self.span, "adjust": false })
    }

    /// Recursive EMA seeded with the first observation.
    fn calculate(&self, closes: &[f64]) -> Vec<f64> {
        let alpha = self.alpha();
        let mut results = Vec::with_capacity(closes.len());
        let mut previous_ema: Option<f64> = None;

        for &close in closes {
            let ema = match previous_ema {
                None => close,
                Some(prev) => alpha * close + (1.0 - alpha) * prev,
            };
            results.push(ema);
            previous_ema = Some(ema);
        }
        results
    }
}
