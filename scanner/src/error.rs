use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("HTTP error: {source}")]
    HttpError {
        #[from]
        source: reqwest::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("Price data error for '{symbol}': {message}")]
    FetchError { symbol: String, message: String },

    #[error("Invalid price series: {0}")]
    SeriesError(#[from] shared::SeriesError),

    #[error("Indicator calculation error: {0}")]
    IndicatorError(String),

    #[error("Credential '{0}' is not available")]
    MissingCredential(String),

    #[error("Credential store error: {0}")]
    CredentialError(String),

    #[error("Email delivery error: {0}")]
    EmailError(String),
}

impl ScanError {
    pub fn fetch(symbol: &str, message: impl Into<String>) -> Self {
        ScanError::FetchError {
            symbol: symbol.to_string(),
            message: message.into(),
        }
    }
}

impl From<lettre::error::Error> for ScanError {
    fn from(err: lettre::error::Error) -> Self {
        ScanError::EmailError(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for ScanError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        ScanError::EmailError(err.to_string())
    }
}

impl From<lettre::address::AddressError> for ScanError {
    fn from(err: lettre::address::AddressError) -> Self {
        ScanError::ConfigError(format!("invalid email address: {}", err))
    }
}
