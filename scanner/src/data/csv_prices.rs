// Local CSV price history, one file per symbol
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use shared::{PricePoint, PriceSeries};
use std::path::{Path, PathBuf};

use super::price_source::PriceSource;
use crate::error::ScanError;

// CSV Header: Date,Open,High,Low,Close,Volume
// Example Row: 2024-01-02,185.64,188.44,183.89,185.64,82488700
pub struct CsvPriceSource {
    dir: PathBuf,
}

impl CsvPriceSource {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol))
    }
}

#[async_trait]
impl PriceSource for CsvPriceSource {
    async fn daily_history(&self, symbol: &str) -> Result<PriceSeries, ScanError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(ScanError::fetch(symbol, format!("no price file at '{}'", path.display())));
        }
        let content = tokio::fs::read(&path).await?;
        let points = parse_price_rows(&content)
            .map_err(|e| ScanError::CsvDataFormatError(format!("{}: {}", path.display(), e)))?;
        Ok(PriceSeries::new(symbol, points)?)
    }
}

pub fn parse_price_rows(content: &[u8]) -> Result<Vec<PricePoint>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content);

    let headers = rdr.headers()?.clone();
    let mut points = Vec::new();

    for (idx, result) in rdr.records().enumerate() {
        let line = idx + 2;
        let record = result.map_err(|e| anyhow!("Error reading CSV record at line {}: {}", line, e))?;

        let date_str = get_field(&record, &headers, "Date").ok_or_else(|| anyhow!("Missing 'Date' field at line {}", line))?;
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|e| anyhow!("Error parsing 'Date' at line {}: {}", line, e))?;

        let close = parse_number(&record, &headers, "Close", line)?;
        // a row without a close carries no usable price
        let Some(close) = close else {
            continue;
        };

        points.push(PricePoint {
            date,
            open: parse_number(&record, &headers, "Open", line)?.unwrap_or(close),
            high: parse_number(&record, &headers, "High", line)?.unwrap_or(close),
            low: parse_number(&record, &headers, "Low", line)?.unwrap_or(close),
            close,
            volume: parse_number(&record, &headers, "Volume", line)?.unwrap_or(0.0),
        });
    }
    Ok(points)
}

fn parse_number(record: &StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<Option<f64>> {
    match get_field(record, headers, name) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<f64>()
            .map(Some)
            .map_err(|e| anyhow!("Error parsing '{}' at line {}: {}", name, line, e)),
    }
}

// Header lookup is case-insensitive so exports from different tools load alike.
fn get_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
        .and_then(|pos| record.get(pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_valid_rows() {
        let content = "\
Date,Open,High,Low,Close,Adj Close,Volume
2024-01-02,187.15,188.44,183.89,185.64,184.93,82488700
2024-01-03,184.22,185.88,183.43,184.25,183.55,58414500";
        let points = parse_price_rows(content.as_bytes()).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(points[0].open, 187.15);
        assert_eq!(points[1].close, 184.25);
        assert_eq!(points[1].volume, 58414500.0);
    }

    #[test]
    fn test_parse_skips_rows_without_close() {
        let content = "date,close\n2024-01-02,10.5\n2024-01-03,\n2024-01-04,11.0";
        let points = parse_price_rows(content.as_bytes()).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].open, 10.5);
        assert_eq!(points[1].volume, 0.0);
    }

    #[test]
    fn test_parse_invalid_number() {
        let content = "Date,Open,High,Low,Close,Volume\n2024-01-02,abc,1,1,1,1";
        let err = parse_price_rows(content.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Error parsing 'Open' at line 2"));
    }

    #[test]
    fn test_parse_missing_date_column() {
        let content = "Open,Close\n1,2";
        let err = parse_price_rows(content.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Missing 'Date' field"));
    }

    #[tokio::test]
    async fn test_source_reads_symbol_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("ERIC-B.ST.csv"), "Date,Close\n2024-01-02,60.1\n2024-01-03,61.2\n").unwrap();
        let source = CsvPriceSource::new(dir.path());

        let series = source.daily_history("ERIC-B.ST").await.unwrap();
        assert_eq!(series.symbol(), "ERIC-B.ST");
        assert_eq!(series.closes(), vec![60.1, 61.2]);

        let missing = source.daily_history("NOPE").await;
        assert!(matches!(missing, Err(ScanError::FetchError { .. })));
    }

    #[tokio::test]
    async fn test_source_rejects_unordered_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("X.csv"), "Date,Close\n2024-01-03,1\n2024-01-02,2\n").unwrap();
        let result = CsvPriceSource::new(dir.path()).daily_history("X").await;
        assert!(matches!(result, Err(ScanError::SeriesError(_))));
    }
}
