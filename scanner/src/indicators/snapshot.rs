use serde::Serialize;
use shared::{MacdState, PriceSeries};
use tracing::debug;

use super::{IndicatorCalculator, Macd, Rsi, Sma};
use crate::error::ScanError;

pub const SMA_SHORT_PERIOD: usize = 20;
pub const SMA_LONG_PERIOD: usize = 50;
pub const RSI_PERIOD: usize = 14;

/// Latest-day indicator values for one price series.
///
/// Every indicator is computed over the full history because the EMA-based
/// ones are recursive; only the final row is kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub close: f64,
    pub sma20: f64,
    pub sma50: f64,
    pub rsi: f64,
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    /// MACD state of the day before the latest one, when the series has one.
    #[serde(skip)]
    pub previous: Option<MacdState>,
}

impl IndicatorSnapshot {
    pub fn from_series(series: &PriceSeries) -> Result<Self, ScanError> {
        if series.is_empty() {
            return Err(ScanError::fetch(series.symbol(), "price series is empty"));
        }
        let closes = series.closes();
        if let Some(bad) = closes.iter().find(|c| !c.is_finite()) {
            return Err(ScanError::IndicatorError(format!(
                "non-finite close {} in series for '{}'",
                bad,
                series.symbol()
            )));
        }

        let last = closes.len() - 1;
        let sma_short = Sma::new(SMA_SHORT_PERIOD)?;
        let sma_long = Sma::new(SMA_LONG_PERIOD)?;
        let rsi_calc = Rsi::new(RSI_PERIOD)?;
        let macd_calc = Macd::standard()?;
        let calculators: [&dyn IndicatorCalculator; 4] = [&sma_short, &sma_long, &rsi_calc, &macd_calc];
        for calculator in calculators {
            debug!(
                symbol = %series.symbol(),
                indicator = calculator.name(),
                parameters = %calculator.parameters(),
                points = closes.len(),
                "Computing indicator"
            );
        }

        let sma20 = sma_short.calculate(&closes);
        let sma50 = sma_long.calculate(&closes);
        let rsi = rsi_calc.calculate(&closes);
        let macd = macd_calc.compute(&closes);

        let current = macd
            .state_at(last)
            .ok_or_else(|| ScanError::IndicatorError("MACD series shorter than input".to_string()))?;

        Ok(Self {
            close: closes[last],
            sma20: sma20[last],
            sma50: sma50[last],
            rsi: rsi[last],
            macd: current.macd,
            signal: current.signal,
            histogram: macd.histogram[last],
            previous: last.checked_sub(1).and_then(|i| macd.state_at(i)),
        })
    }

    pub fn macd_state(&self) -> MacdState {
        MacdState {
            macd: self.macd,
            signal: self.signal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use shared::PricePoint;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: start + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000.0,
            })
            .collect();
        PriceSeries::new("TEST", points).unwrap()
    }

    #[test]
    fn test_snapshot_uses_last_row() {
        let closes: Vec<f64> = (1..=80).map(|i| i as f64).collect();
        let snapshot = IndicatorSnapshot::from_series(&series(&closes)).unwrap();
        assert_eq!(snapshot.close, 80.0);
        // mean of 61..=80 and 31..=80
        assert!((snapshot.sma20 - 70.5).abs() < 1e-9);
        assert!((snapshot.sma50 - 55.5).abs() < 1e-9);
        assert_eq!(snapshot.rsi, 100.0);
        assert!(snapshot.macd > 0.0);
        assert!((snapshot.histogram - (snapshot.macd - snapshot.signal)).abs() < 1e-12);
        assert!(snapshot.previous.is_some());
    }

    #[test]
    fn test_single_point_snapshot() {
        let snapshot = IndicatorSnapshot::from_series(&series(&[12.0])).unwrap();
        assert_eq!(snapshot.close, 12.0);
        assert_eq!(snapshot.sma20, 12.0);
        assert_eq!(snapshot.sma50, 12.0);
        assert!(snapshot.rsi.is_nan());
        assert_eq!(snapshot.macd, 0.0);
        assert!(snapshot.previous.is_none());
    }

    #[test]
    fn test_empty_series_is_an_error() {
        let result = IndicatorSnapshot::from_series(&PriceSeries::empty("NONE"));
        assert!(result.is_err());
    }

    #[test]
    fn test_non_finite_close_is_an_error() {
        let result = IndicatorSnapshot::from_series(&series(&[1.0, f64::NAN, 2.0]));
        assert!(matches!(result, Err(ScanError::IndicatorError(_))));
    }
}
