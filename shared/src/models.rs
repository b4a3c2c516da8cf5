use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One trading day of a daily price history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("dates not strictly increasing for '{symbol}': {previous} followed by {next}")]
    OutOfOrder {
        symbol: String,
        previous: NaiveDate,
        next: NaiveDate,
    },
}

/// Daily price history of a single symbol, oldest first.
///
/// Dates are strictly increasing. Missing trading days are simply absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        let symbol = symbol.into();
        if let Some(pair) = points.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(SeriesError::OutOfOrder {
                symbol,
                previous: pair[0].date,
                next: pair[1].date,
            });
        }
        Ok(Self { symbol, points })
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            points: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }
}

/// Discrete recommendation derived from the latest indicator values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSignal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for TradeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TradeSignal::Buy => "BUY",
            TradeSignal::Sell => "SELL",
            TradeSignal::Hold => "HOLD",
        };
        f.write_str(label)
    }
}

/// Which indicator set and classification policy a scan uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// RSI(14) against SMA(20), no memory.
    #[default]
    RsiSma,
    /// MACD/signal crossover filtered by SMA(50).
    Macd,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "rsi_sma" | "rsi" => Ok(Strategy::RsiSma),
            "macd" => Ok(Strategy::Macd),
            other => Err(format!("unknown strategy '{}'", other)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::RsiSma => f.write_str("rsi_sma"),
            Strategy::Macd => f.write_str("macd"),
        }
    }
}

/// MACD line and signal line for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdState {
    pub macd: f64,
    pub signal: f64,
}
