use serde::{Deserialize, Serialize};
use tracing::debug;

use common::{IndicatorSnapshot, InsufficientDataError, Series};

use crate::indicators::{ema, BollingerIndicator, MacdIndicator, RsiIndicator};

/// Fewest candles that still allow one price difference.
pub const MIN_CANDLES: usize = 2;

/// Periods used by [`IndicatorEngine`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub ema_trend: usize,
    pub bollinger_period: usize,
    pub bollinger_multiplier: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            ema_trend: 50,
            bollinger_period: 20,
            bollinger_multiplier: 2.0,
        }
    }
}

/// Turns a candle series into an [`IndicatorSnapshot`] of last-bar values.
///
/// Stateless: the same series always yields a bit-identical snapshot.
/// Indicators whose warm-up exceeds the series length come out as NaN.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    rsi: RsiIndicator,
    macd: MacdIndicator,
    ema_trend: usize,
    bollinger: BollingerIndicator,
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(&IndicatorParams::default())
    }
}

impl IndicatorEngine {
    pub fn new(params: &IndicatorParams) -> Self {
        assert!(params.ema_trend >= 1, "EMA span must be >= 1");
        Self {
            rsi: RsiIndicator::new(params.rsi_period),
            macd: MacdIndicator::new(params.macd_fast, params.macd_slow, params.macd_signal),
            ema_trend: params.ema_trend,
            bollinger: BollingerIndicator::new(
                params.bollinger_period,
                params.bollinger_multiplier,
            ),
        }
    }

    pub fn compute(&self, series: &Series) -> Result<IndicatorSnapshot, InsufficientDataError> {
        if series.len() < MIN_CANDLES {
            return Err(InsufficientDataError {
                len: series.len(),
                required: MIN_CANDLES,
            });
        }

        let closes = series.closes();
        let current_price = closes[closes.len() - 1];

        let rsi = self.rsi.compute(&closes);
        let macd = self.macd.compute(&closes);
        let bands = self.bollinger.compute(&closes);

        let ema50 = if closes.len() < self.ema_trend {
            f64::NAN
        } else {
            ema(&closes, self.ema_trend)
                .last()
                .copied()
                .unwrap_or(f64::NAN)
        };

        let snapshot = IndicatorSnapshot {
            rsi,
            macd: macd.macd,
            macd_signal: macd.signal,
            macd_histogram: macd.histogram,
            ema50,
            above_ema: current_price > ema50,
            bollinger_upper: bands.upper,
            bollinger_middle: bands.middle,
            bollinger_lower: bands.lower,
            current_price,
        };

        debug!(
            candles = closes.len(),
            rsi = snapshot.rsi,
            histogram = snapshot.macd_histogram,
            ema50 = snapshot.ema50,
            "Indicators computed"
        );

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::series_from_closes;

    #[test]
    fn empty_series_is_insufficient() {
        let engine = IndicatorEngine::default();
        let err = engine.compute(&Series::default()).unwrap_err();
        assert_eq!(err, InsufficientDataError { len: 0, required: 2 });
    }

    #[test]
    fn single_candle_is_insufficient() {
        let engine = IndicatorEngine::default();
        let err = engine.compute(&series_from_closes(&[0.5])).unwrap_err();
        assert_eq!(err.len, 1);
    }

    #[test]
    fn two_candles_compute_with_nan_indicators() {
        let engine = IndicatorEngine::default();
        let snapshot = engine.compute(&series_from_closes(&[0.5, 0.51])).unwrap();
        assert_eq!(snapshot.current_price, 0.51);
        assert!(snapshot.rsi.is_nan());
        assert!(snapshot.macd.is_nan());
        assert!(snapshot.ema50.is_nan());
        assert!(!snapshot.above_ema);
        assert!(snapshot.bollinger_middle.is_nan());
    }

    #[test]
    fn warm_ups_are_staggered() {
        let engine = IndicatorEngine::default();
        let closes: Vec<f64> = (0..30).map(|i| 0.5 + (i % 3) as f64 * 0.01).collect();
        let snapshot = engine.compute(&series_from_closes(&closes)).unwrap();
        // 30 candles: RSI, MACD and Bollinger are ready, EMA50 is not
        assert!(!snapshot.rsi.is_nan());
        assert!(!snapshot.macd_histogram.is_nan());
        assert!(!snapshot.bollinger_upper.is_nan());
        assert!(snapshot.ema50.is_nan());
    }

    #[test]
    fn ema50_defined_from_fifty_candles() {
        let engine = IndicatorEngine::default();
        let closes: Vec<f64> = (0..50).map(|i| 0.5 + i as f64 * 0.001).collect();
        let snapshot = engine.compute(&series_from_closes(&closes)).unwrap();
        assert!(!snapshot.ema50.is_nan());
        assert!(snapshot.above_ema);
    }

    #[test]
    fn uptrend_snapshot() {
        let engine = IndicatorEngine::default();
        let closes: Vec<f64> = (0..100).map(|i| 0.5 + i as f64 * 0.001).collect();
        let snapshot = engine.compute(&series_from_closes(&closes)).unwrap();
        assert_eq!(snapshot.rsi, 100.0);
        assert!(snapshot.above_ema);
        assert!(snapshot.bollinger_lower < snapshot.bollinger_middle);
        assert!(snapshot.bollinger_middle < snapshot.bollinger_upper);
    }

    #[test]
    fn flat_market_has_nan_rsi() {
        let engine = IndicatorEngine::default();
        let snapshot = engine.compute(&series_from_closes(&[0.55; 60])).unwrap();
        assert!(snapshot.rsi.is_nan());
        assert!((snapshot.ema50 - 0.55).abs() < 1e-12);
    }
}
