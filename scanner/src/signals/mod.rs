// Trade signal classification policies
use shared::{MacdState, Strategy, TradeSignal};

use crate::indicators::IndicatorSnapshot;

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;

/// Single-day RSI/SMA policy. A NaN RSI satisfies neither threshold.
pub fn classify_rsi_sma(rsi: f64, close: f64, sma20: f64) -> TradeSignal {
    if rsi < RSI_OVERSOLD && close > sma20 {
        TradeSignal::Buy
    } else if rsi > RSI_OVERBOUGHT && close < sma20 {
        TradeSignal::Sell
    } else {
        TradeSignal::Hold
    }
}

/// MACD/signal crossover policy with an SMA50 trend filter on buys.
///
/// Without a previous state the check reduces to comparing the current MACD
/// with the current signal line.
pub fn classify_macd_crossover(
    current: MacdState,
    previous: Option<MacdState>,
    close: f64,
    sma50: f64,
) -> TradeSignal {
    let crossover = match previous {
        Some(prev) if prev.macd <= prev.signal && current.macd > current.signal => TradeSignal::Buy,
        Some(prev) if prev.macd >= prev.signal && current.macd < current.signal => TradeSignal::Sell,
        Some(_) => TradeSignal::Hold,
        None if current.macd > current.signal => TradeSignal::Buy,
        None if current.macd < current.signal => TradeSignal::Sell,
        None => TradeSignal::Hold,
    };

    // only buy in an established uptrend
    if crossover == TradeSignal::Buy && close <= sma50 {
        return TradeSignal::Hold;
    }
    crossover
}

/// Classify a snapshot under the given strategy.
pub fn classify(strategy: Strategy, snapshot: &IndicatorSnapshot, previous: Option<MacdState>) -> TradeSignal {
    match strategy {
        Strategy::RsiSma => classify_rsi_sma(snapshot.rsi, snapshot.close, snapshot.sma20),
        Strategy::Macd => classify_macd_crossover(snapshot.macd_state(), previous, snapshot.close, snapshot.sma50),
    }
}
