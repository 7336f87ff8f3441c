use async_trait::async_trait;

use crate::{Result, Series, Signal, Timeframe};

/// Source of candles and live prices for the configured pair.
///
/// `CryptoCompareClient` in `crates/engine` implements this against the
/// public REST API. A failed call means the cycle is skipped; the core is
/// never invoked with partial data.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// The most recent `limit` candles at `timeframe`, oldest first.
    async fn candles(&self, timeframe: Timeframe, limit: usize) -> Result<Series>;

    /// Current spot price, independent of the candle series.
    async fn spot_price(&self) -> Result<f64>;
}

/// Delivery channel for rendered signals and operator announcements.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Render and deliver a signal. `Ok` means the channel accepted it.
    async fn deliver(&self, signal: &Signal) -> Result<()>;

    /// Deliver a free-form message (startup, shutdown).
    async fn announce(&self, text: &str) -> Result<()>;
}
