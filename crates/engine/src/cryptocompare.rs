use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use common::{Candle, Error, MarketData, Result, Series, Timeframe};

const BASE_URL: &str = "https://min-api.cryptocompare.com";

/// REST client for the CryptoCompare public API. Supplies candles and the
/// live spot price for one base/quote pair.
pub struct CryptoCompareClient {
    base: String,
    quote: String,
    api_key: Option<String>,
    http: Client,
}

impl CryptoCompareClient {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .use_rustls_tls()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            base: base.into(),
            quote: quote.into(),
            api_key: None,
            http,
        })
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<String> {
        let url = format!("{BASE_URL}{path}");
        debug!(url = %url, ?params, "CryptoCompare request");

        let mut req = self.http.get(&url).query(params);
        if let Some(key) = &self.api_key {
            req = req.header("authorization", format!("Apikey {key}"));
        }

        let resp = req.send().await.map_err(|e| Error::Http(e.to_string()))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::MarketData(format!("HTTP {status}: {body}")));
        }
        Ok(body)
    }
}

/// Endpoint, aggregate and effective limit for a timeframe.
///
/// 4h bars come from the hourly endpoint aggregated by four, with the
/// requested limit scaled by four as well.
pub fn histo_request(timeframe: Timeframe, limit: usize) -> (&'static str, u32, usize) {
    match timeframe {
        Timeframe::OneHour => ("/data/v2/histohour", 1, limit),
        Timeframe::FourHours => ("/data/v2/histohour", 4, limit * 4),
        Timeframe::OneDay => ("/data/v2/histoday", 1, limit),
    }
}

/// Parse a `histo*` body into a series. Zero-volume candles are dropped.
pub fn parse_histo(body: &str) -> Result<Series> {
    let resp: HistoResponse = serde_json::from_str(body)?;
    if resp.response != "Success" {
        return Err(Error::MarketData(resp.message));
    }

    // Error bodies carry an arbitrary `Data` shape, so only decode it on success.
    let rows = match resp.data {
        Some(data) => serde_json::from_value::<HistoData>(data)?.data,
        None => return Err(Error::MarketData("response has no Data.Data array".into())),
    };

    let mut candles = Vec::with_capacity(rows.len());
    for row in rows {
        let timestamp = Utc
            .timestamp_opt(row.time, 0)
            .single()
            .ok_or_else(|| Error::MarketData(format!("invalid candle time {}", row.time)))?;
        candles.push(Candle {
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume_from: row.volumefrom,
            volume_to: row.volumeto,
            timestamp,
        });
    }

    Ok(Series::new(candles))
}

/// Parse a `/data/price` body and pick out `quote`.
pub fn parse_price(body: &str, quote: &str) -> Result<f64> {
    let prices: HashMap<String, serde_json::Value> = serde_json::from_str(body)?;
    prices
        .get(quote)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| Error::MarketData(format!("no {quote} price in response: {body}")))
}

#[async_trait]
impl MarketData for CryptoCompareClient {
    async fn candles(&self, timeframe: Timeframe, limit: usize) -> Result<Series> {
        let (path, aggregate, limit) = histo_request(timeframe, limit);
        let body = self
            .get(
                path,
                &[
                    ("fsym", self.base.clone()),
                    ("tsym", self.quote.clone()),
                    ("limit", limit.to_string()),
                    ("aggregate", aggregate.to_string()),
                ],
            )
            .await?;

        let series = parse_histo(&body)?;
        debug!(
            pair = %format!("{}/{}", self.base, self.quote),
            timeframe = %timeframe,
            candles = series.len(),
            "Fetched candles"
        );
        Ok(series)
    }

    async fn spot_price(&self) -> Result<f64> {
        let body = self
            .get(
                "/data/price",
                &[("fsym", self.base.clone()), ("tsyms", self.quote.clone())],
            )
            .await?;
        let price = parse_price(&body, &self.quote)?;
        debug!(base = %self.base, price, "Fetched spot price");
        Ok(price)
    }
}

// ─── Response types ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct HistoResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Message", default)]
    message: String,
    #[serde(rename = "Data", default)]
    data: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct HistoData {
    #[serde(rename = "Data", default)]
    data: Vec<HistoRow>,
}

#[derive(Deserialize)]
struct HistoRow {
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volumefrom: f64,
    volumeto: f64,
}
