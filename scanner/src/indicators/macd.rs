// Moving Average Convergence/Divergence (MACD) indicator implementation
use super::{Ema, IndicatorCalculator};
use crate::error::ScanError;
use serde_json::Value;
use shared::MacdState;

/// MACD line, signal line and histogram, one value per input close.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdSeries {
    pub fn state_at(&self, index: usize) -> Option<MacdState> {
        Some(MacdState {
            macd: *self.macd.get(index)?,
            signal: *self.signal.get(index)?,
        })
    }
}

pub struct Macd {
    name: String,
    fast: Ema,
    slow: Ema,
    signal: Ema,
    spans: (usize, usize, usize),
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self, ScanError> {
        if fast >= slow {
            return Err(ScanError::IndicatorError(format!(
                "MACD fast span ({}) must be shorter than slow span ({})",
                fast, slow
            )));
        }
        Ok(Self {
            name: format!("MACD({},{},{})", fast, slow, signal),
            fast: Ema::new(fast)?,
            slow: Ema::new(slow)?,
            signal: Ema::new(signal)?,
            spans: (fast, slow, signal),
        })
    }

    /// Standard 12/26/9 configuration.
    pub fn standard() -> Result<Self, ScanError> {
        Self::new(12, 26, 9)
    }

    pub fn compute(&self, closes: &[f64]) -> MacdSeries {
        let fast = self.fast.calculate(closes);
        let slow = self.slow.calculate(closes);
        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = self.signal.calculate(&macd);
        let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();
        MacdSeries {
            macd,
            signal,
            histogram,
        }
    }
}

impl IndicatorCalculator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        let (fast, slow, signal) = self.spans;
        serde_json::json!({ "fast": fast, "slow": slow, "signal": signal })
    }

    fn calculate(&self, closes: &[f64]) -> Vec<f64> {
        self.compute(closes).macd
    }
}
