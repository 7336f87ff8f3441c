use chrono::{Duration, TimeZone, Utc};
use common::{Candle, Series};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use strategy::indicators::{ema, BollingerIndicator, RsiIndicator};
use strategy::{IndicatorEngine, SignalClassifier, SignalRules};

fn series_from_closes(closes: &[f64]) -> Series {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Series::new(closes.iter().enumerate().map(|(i, &close)| Candle {
        open: close,
        high: close,
        low: close,
        close,
        volume_from: 1.0,
        volume_to: close,
        timestamp: start + Duration::hours(i as i64),
    }))
}

proptest! {
    /// RSI stays within [0, 100] (or NaN on a flat window) for any positive prices.
    #[test]
    fn rsi_bounded(closes in prop::collection::vec(0.0001f64..10_000.0f64, 15..200)) {
        for value in RsiIndicator::new(14).series(&closes) {
            prop_assert!(value.is_nan() || (0.0..=100.0).contains(&value));
        }
    }

    /// EMA of positive prices never leaves the range of its inputs.
    #[test]
    fn ema_within_input_range(
        closes in prop::collection::vec(0.01f64..100.0f64, 1..150),
        span in 1usize..60,
    ) {
        let lo = closes.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = closes.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        for value in ema(&closes, span) {
            prop_assert!(value >= lo - 1e-9 && value <= hi + 1e-9);
        }
    }

    /// Lower band <= middle <= upper wherever the bands are defined.
    #[test]
    fn bollinger_ordered(closes in prop::collection::vec(0.01f64..100.0f64, 20..120)) {
        for bands in BollingerIndicator::new(20, 2.0).series(&closes) {
            if !bands.middle.is_nan() {
                prop_assert!(bands.lower <= bands.middle + 1e-12);
                prop_assert!(bands.middle <= bands.upper + 1e-12);
            }
        }
    }

    /// The engine accepts every series with at least two candles and the
    /// classifier never panics on the result.
    #[test]
    fn engine_and_classifier_never_panic(
        closes in prop::collection::vec(0.0001f64..1_000.0f64, 2..150),
        live_price in 0.0001f64..1_000.0f64,
        seed in any::<u64>(),
    ) {
        let snapshot = IndicatorEngine::default()
            .compute(&series_from_closes(&closes))
            .unwrap();
        let mut classifier =
            SignalClassifier::new(SignalRules::default(), StdRng::seed_from_u64(seed));
        if let Some(signal) = classifier.classify(snapshot, live_price) {
            prop_assert!((75.0..90.0).contains(&signal.confidence));
            prop_assert_eq!(signal.entry_price, live_price);
        }
    }
}
