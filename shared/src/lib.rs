pub mod models;

pub use models::{MacdState, PricePoint, PriceSeries, SeriesError, Strategy, TradeSignal};
