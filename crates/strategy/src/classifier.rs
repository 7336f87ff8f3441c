use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use common::{IndicatorSnapshot, Side, Signal};

/// Thresholds and trade geometry used by [`SignalClassifier`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SignalRules {
    /// BUY requires RSI strictly below this.
    pub buy_rsi_below: f64,
    /// SELL requires RSI strictly above this.
    pub sell_rsi_above: f64,
    /// Histogram must sit strictly inside `(-band, 0)` for BUY, `(0, band)` for SELL.
    pub histogram_band: f64,
    pub take_profit_1_pct: f64,
    pub take_profit_2_pct: f64,
    pub stop_loss_pct: f64,
    pub confidence_min: f64,
    pub confidence_max: f64,
    pub validity_hours: i64,
}

impl Default for SignalRules {
    fn default() -> Self {
        Self {
            buy_rsi_below: 35.0,
            sell_rsi_above: 70.0,
            histogram_band: 0.001,
            take_profit_1_pct: 0.008,
            take_profit_2_pct: 0.015,
            stop_loss_pct: 0.008,
            confidence_min: 75.0,
            confidence_max: 90.0,
            validity_hours: 6,
        }
    }
}

impl SignalRules {
    /// Direction implied by `snapshot`, BUY checked first.
    ///
    /// Every comparison is strict, so a NaN RSI or histogram never matches.
    pub fn decide(&self, snapshot: &IndicatorSnapshot) -> Option<Side> {
        let rsi = snapshot.rsi;
        let hist = snapshot.macd_histogram;

        if rsi < self.buy_rsi_below && -self.histogram_band < hist && hist < 0.0 {
            Some(Side::Buy)
        } else if rsi > self.sell_rsi_above && 0.0 < hist && hist < self.histogram_band {
            Some(Side::Sell)
        } else {
            None
        }
    }
}

/// Rule-based BUY/SELL/none decision over an [`IndicatorSnapshot`].
///
/// The confidence draw comes from the injected `rng`; seed it for
/// reproducible output.
pub struct SignalClassifier<R = StdRng> {
    rules: SignalRules,
    rng: R,
}

impl SignalClassifier<StdRng> {
    /// Seeded from `seed` when given, from OS entropy otherwise.
    pub fn from_seed(rules: SignalRules, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(rules, rng)
    }
}

impl<R: Rng> SignalClassifier<R> {
    pub fn new(rules: SignalRules, rng: R) -> Self {
        Self { rules, rng }
    }

    /// Classify against the wall clock.
    pub fn classify(&mut self, snapshot: IndicatorSnapshot, live_price: f64) -> Option<Signal> {
        self.classify_at(snapshot, live_price, Utc::now())
    }

    pub fn classify_at(
        &mut self,
        snapshot: IndicatorSnapshot,
        live_price: f64,
        now: DateTime<Utc>,
    ) -> Option<Signal> {
        let side = self.rules.decide(&snapshot)?;
        let r = &self.rules;

        let (take_profit_1, take_profit_2, stop_loss) = match side {
            Side::Buy => (
                live_price * (1.0 + r.take_profit_1_pct),
                live_price * (1.0 + r.take_profit_2_pct),
                live_price * (1.0 - r.stop_loss_pct),
            ),
            Side::Sell => (
                live_price * (1.0 - r.take_profit_1_pct),
                live_price * (1.0 - r.take_profit_2_pct),
                live_price * (1.0 + r.stop_loss_pct),
            ),
        };
        let confidence = self.rng.gen_range(r.confidence_min..r.confidence_max);
        let expires_at = now + Duration::hours(r.validity_hours);

        info!(
            side = %side,
            entry = live_price,
            rsi = snapshot.rsi,
            histogram = snapshot.macd_histogram,
            confidence,
            "Signal conditions met"
        );

        Some(Signal {
            side,
            entry_price: live_price,
            take_profit_1,
            take_profit_2,
            stop_loss,
            confidence,
            indicators: snapshot,
            created_at: now,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::snapshot;
    use chrono::TimeZone;

    const EPS: f64 = 1e-12;

    fn classifier() -> SignalClassifier {
        SignalClassifier::from_seed(SignalRules::default(), Some(7))
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn buy_scenario_levels() {
        let signal = classifier()
            .classify_at(snapshot(30.0, -0.0005), 0.55, at())
            .expect("BUY expected");

        assert_eq!(signal.side, Side::Buy);
        assert_eq!(signal.entry_price, 0.55);
        assert!((signal.take_profit_1 - 0.5544).abs() < EPS);
        assert!((signal.take_profit_2 - 0.55825).abs() < EPS);
        assert!((signal.stop_loss - 0.5456).abs() < EPS);
    }

    #[test]
    fn sell_scenario_levels() {
        let signal = classifier()
            .classify_at(snapshot(75.0, 0.0005), 0.60, at())
            .expect("SELL expected");

        assert_eq!(signal.side, Side::Sell);
        assert_eq!(signal.entry_price, 0.60);
        assert!((signal.take_profit_1 - 0.5952).abs() < EPS);
        assert!((signal.take_profit_2 - 0.591).abs() < EPS);
        assert!((signal.stop_loss - 0.6048).abs() < EPS);
    }

    #[test]
    fn neutral_snapshot_gives_nothing() {
        let mut c = classifier();
        assert!(c.classify_at(snapshot(50.0, 0.0), 0.55, at()).is_none());
        assert!(c.classify_at(snapshot(50.0, 0.0), 1234.5, at()).is_none());
    }

    #[test]
    fn rsi_thresholds_are_strict() {
        let mut c = classifier();
        assert!(c.classify_at(snapshot(35.0, -0.0005), 0.55, at()).is_none());
        assert!(c.classify_at(snapshot(70.0, 0.0005), 0.55, at()).is_none());
    }

    #[test]
    fn histogram_band_is_open_on_both_ends() {
        let mut c = classifier();
        assert!(c.classify_at(snapshot(30.0, 0.0), 0.55, at()).is_none());
        assert!(c.classify_at(snapshot(30.0, -0.001), 0.55, at()).is_none());
        assert!(c.classify_at(snapshot(30.0, -0.002), 0.55, at()).is_none());
        assert!(c.classify_at(snapshot(75.0, 0.0), 0.55, at()).is_none());
        assert!(c.classify_at(snapshot(75.0, 0.001), 0.55, at()).is_none());
    }

    #[test]
    fn oversold_with_positive_histogram_is_not_a_sell() {
        let mut c = classifier();
        assert!(c.classify_at(snapshot(20.0, 0.0005), 0.55, at()).is_none());
        assert!(c.classify_at(snapshot(80.0, -0.0005), 0.55, at()).is_none());
    }

    #[test]
    fn nan_operands_suppress_signals() {
        let mut c = classifier();
        assert!(c.classify_at(snapshot(f64::NAN, -0.0005), 0.55, at()).is_none());
        assert!(c.classify_at(snapshot(30.0, f64::NAN), 0.55, at()).is_none());
        assert!(c.classify_at(snapshot(f64::NAN, 0.0005), 0.55, at()).is_none());
    }

    #[test]
    fn buy_wins_when_both_rule_sets_match() {
        // Overlapping RSI thresholds and a histogram that fits either band
        // can only happen with custom rules; BUY is checked first.
        let rules = SignalRules {
            buy_rsi_below: 80.0,
            sell_rsi_above: 20.0,
            histogram_band: 1.0,
            ..SignalRules::default()
        };
        let snap = snapshot(50.0, -0.5);
        assert_eq!(rules.decide(&snap), Some(Side::Buy));
    }

    #[test]
    fn confidence_in_range_and_reproducible() {
        let mut a = classifier();
        let mut b = classifier();
        for _ in 0..200 {
            let sa = a.classify_at(snapshot(30.0, -0.0005), 0.55, at()).unwrap();
            let sb = b.classify_at(snapshot(30.0, -0.0005), 0.55, at()).unwrap();
            assert!((75.0..90.0).contains(&sa.confidence));
            assert_eq!(sa.confidence, sb.confidence);
        }
    }

    #[test]
    fn signal_expires_six_hours_after_creation() {
        let signal = classifier()
            .classify_at(snapshot(30.0, -0.0005), 0.55, at())
            .unwrap();
        assert_eq!(signal.created_at, at());
        assert_eq!(signal.expires_at, Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap());
        assert_eq!(signal.validity(), Duration::hours(6));
    }

    #[test]
    fn snapshot_is_carried_into_signal() {
        let snap = snapshot(30.0, -0.0005);
        let signal = classifier().classify_at(snap, 0.55, at()).unwrap();
        assert_eq!(signal.indicators.rsi, 30.0);
        assert_eq!(signal.indicators.macd_histogram, -0.0005);
    }
}
