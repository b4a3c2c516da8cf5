// Daily price history sources
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use shared::{PricePoint, PriceSeries};
use std::time::Duration;
use tracing::debug;

use crate::config::PriceSourceSettings;
use crate::error::ScanError;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Something that can produce the daily price history of a symbol.
///
/// An unknown symbol may come back either as an error or as an empty series.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn daily_history(&self, symbol: &str) -> Result<PriceSeries, ScanError>;
}

/// Yahoo Finance chart API client.
pub struct YahooChartSource {
    client: Client,
    base_url: String,
    range: String,
    interval: String,
    auto_adjust: bool,
}

impl YahooChartSource {
    pub fn new(settings: &PriceSourceSettings) -> Result<Self, ScanError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            range: settings.range.clone(),
            interval: settings.interval.clone(),
            auto_adjust: settings.auto_adjust,
        })
    }
}

#[async_trait]
impl PriceSource for YahooChartSource {
    async fn daily_history(&self, symbol: &str) -> Result<PriceSeries, ScanError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        debug!(symbol, %url, range = %self.range, interval = %self.interval, "Requesting chart data");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("range", self.range.as_str()),
                ("interval", self.interval.as_str()),
                ("events", "div,split"),
                ("includeAdjustedClose", "true"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(PriceSeries::empty(symbol));
        }
        if !status.is_success() {
            return Err(ScanError::fetch(symbol, format!("chart request returned HTTP {}", status)));
        }

        let body: ChartResponse = response.json().await?;
        parse_chart(symbol, body, self.auto_adjust)
    }
}

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    #[serde(default, rename = "gmtoffset")]
    gmt_offset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

fn value_at(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

/// Turn a chart API payload into a price series.
///
/// Rows without a close are skipped, timestamps become exchange-local dates
/// and a repeated date keeps its last row.
pub fn parse_chart(symbol: &str, body: ChartResponse, auto_adjust: bool) -> Result<PriceSeries, ScanError> {
    if let Some(err) = body.chart.error {
        return Err(ScanError::fetch(symbol, format!("{}: {}", err.code, err.description)));
    }
    let result = match body.chart.result.and_then(|r| r.into_iter().next()) {
        Some(result) => result,
        None => return Ok(PriceSeries::empty(symbol)),
    };
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .unwrap_or_default();

    let mut points: Vec<PricePoint> = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let Some(close) = value_at(&quote.close, i) else {
            continue;
        };
        let date = DateTime::from_timestamp(ts + result.meta.gmt_offset, 0)
            .ok_or_else(|| ScanError::fetch(symbol, format!("invalid timestamp {}", ts)))?
            .date_naive();

        let mut point = PricePoint {
            date,
            open: value_at(&quote.open, i).unwrap_or(close),
            high: value_at(&quote.high, i).unwrap_or(close),
            low: value_at(&quote.low, i).unwrap_or(close),
            close,
            volume: value_at(&quote.volume, i).unwrap_or(0.0),
        };

        if auto_adjust {
            if let Some(adjusted) = value_at(&adjclose, i).filter(|_| close != 0.0) {
                let factor = adjusted / close;
                point.open *= factor;
                point.high *= factor;
                point.low *= factor;
                point.close = adjusted;
            }
        }
        points.push(point);
    }

    points.sort_by_key(|p| p.date);
    let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
    for point in points {
        match deduped.last_mut() {
            Some(last) if last.date == point.date => *last = point,
            _ => deduped.push(point),
        }
    }

    Ok(PriceSeries::new(symbol, deduped)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn parse(json: &str, auto_adjust: bool) -> Result<PriceSeries, ScanError> {
        let body: ChartResponse = serde_json::from_str(json).unwrap();
        parse_chart("VOLV-B.ST", body, auto_adjust)
    }

    const SAMPLE: &str = r#"{
        "chart": {
            "result": [{
                "meta": { "symbol": "VOLV-B.ST", "gmtoffset": 3600 },
                "timestamp": [1704182400, 1704268800, 1704355200, 1704355260],
                "indicators": {
                    "quote": [{
                        "open":   [100.0, null, 102.0, 103.0],
                        "high":   [101.0, null, 104.0, 105.0],
                        "low":    [ 99.0, null, 101.0, 102.0],
                        "close":  [100.5, null, 103.0, 104.0],
                        "volume": [1000,  null, 1200,  1300]
                    }],
                    "adjclose": [{ "adjclose": [50.25, null, 51.5, 52.0] }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_skips_null_rows_and_dedups_dates() {
        let series = parse(SAMPLE, false).unwrap();
        assert_eq!(series.len(), 2);
        let points = series.points();
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(points[0].close, 100.5);
        assert_eq!(points[0].volume, 1000.0);
        // the later row for 2024-01-04 wins
        assert_eq!(points[1].date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        assert_eq!(points[1].close, 104.0);
    }

    #[test]
    fn test_parse_auto_adjust_scales_ohlc() {
        let series = parse(SAMPLE, true).unwrap();
        let first = series.points()[0];
        assert_eq!(first.close, 50.25);
        assert!((first.open - 50.0).abs() < 1e-9);
        assert!((first.high - 50.5).abs() < 1e-9);
        assert!((first.low - 49.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_chart_error() {
        let json = r#"{ "chart": { "result": null, "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" } } }"#;
        let err = parse(json, true).unwrap_err();
        assert!(err.to_string().contains("symbol may be delisted"));
    }

    #[test]
    fn test_parse_without_timestamps_is_empty() {
        let json = r#"{ "chart": { "result": [{ "meta": {}, "indicators": { "quote": [{}] } }], "error": null } }"#;
        let series = parse(json, true).unwrap();
        assert!(series.is_empty());
    }
}
