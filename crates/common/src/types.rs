use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV bar as delivered by the market data provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Traded volume in the base asset.
    pub volume_from: f64,
    /// Traded volume in the quote asset.
    pub volume_to: f64,
    pub timestamp: DateTime<Utc>,
}

/// Time-ordered candles for a single symbol/timeframe pair.
///
/// Construction drops zero-volume bars, sorts by timestamp and collapses
/// duplicate timestamps (last one wins), so every `Series` holds strictly
/// increasing timestamps and `volume_from > 0` on each candle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    candles: Vec<Candle>,
}

impl Series {
    pub fn new(candles: impl IntoIterator<Item = Candle>) -> Self {
        let mut candles: Vec<Candle> = candles
            .into_iter()
            .filter(|c| c.volume_from > 0.0)
            .collect();
        candles.sort_by_key(|c| c.timestamp);

        // Stable sort keeps arrival order among equal timestamps; keep the last.
        let mut deduped: Vec<Candle> = Vec::with_capacity(candles.len());
        for candle in candles {
            match deduped.last_mut() {
                Some(prev) if prev.timestamp == candle.timestamp => *prev = candle,
                _ => deduped.push(candle),
            }
        }

        Self { candles: deduped }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// Closing prices, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }
}

/// Last-bar indicator values computed from one [`Series`].
///
/// Any field may be NaN when the series was too short for that indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_histogram: f64,
    pub ema50: f64,
    /// Last close strictly above `ema50`. False when `ema50` is NaN.
    pub above_ema: bool,
    pub bollinger_upper: f64,
    pub bollinger_middle: f64,
    pub bollinger_lower: f64,
    /// Last close of the series, not the live spot price.
    pub current_price: f64,
}

/// Direction of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// A hypothetical trade emitted by the classifier. Never executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub side: Side,
    pub entry_price: f64,
    pub take_profit_1: f64,
    pub take_profit_2: f64,
    pub stop_loss: f64,
    /// Percentage in `[75, 90)` by default.
    pub confidence: f64,
    pub indicators: IndicatorSnapshot,
    pub created_at: DateTime<Utc>,
    /// Informational only; nothing re-checks it.
    pub expires_at: DateTime<Utc>,
}

impl Signal {
    pub fn validity(&self) -> chrono::Duration {
        self.expires_at - self.created_at
    }
}

/// Candle interval requested from the market data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Timeframe {
    #[default]
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timeframe::OneHour => write!(f, "1h"),
            Timeframe::FourHours => write!(f, "4h"),
            Timeframe::OneDay => write!(f, "1d"),
        }
    }
}

impl std::str::FromStr for Timeframe {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1h" => Ok(Timeframe::OneHour),
            "4h" => Ok(Timeframe::FourHours),
            "1d" => Ok(Timeframe::OneDay),
            other => Err(crate::Error::Config(format!(
                "timeframe must be one of 1h, 4h, 1d, got: '{other}'"
            ))),
        }
    }
}
