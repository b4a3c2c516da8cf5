// Flat-file and remote data access
pub mod csv_prices;
pub mod price_source;
pub mod results;
pub mod ticker_list;

pub use csv_prices::CsvPriceSource;
pub use price_source::{PriceSource, YahooChartSource};

use crate::config::{PriceSourceKind, PriceSourceSettings};
use crate::error::ScanError;

/// Build the price source selected in the settings.
pub fn price_source(settings: &PriceSourceSettings) -> Result<Box<dyn PriceSource>, ScanError> {
    Ok(match settings.kind {
        PriceSourceKind::Yahoo => Box::new(YahooChartSource::new(settings)?),
        PriceSourceKind::CsvDir => Box::new(CsvPriceSource::new(&settings.csv_dir)),
    })
}
