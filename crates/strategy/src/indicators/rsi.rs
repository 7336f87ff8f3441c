/// RSI (Relative Strength Index) indicator.
///
/// Average gain and average loss are plain rolling means over the trailing
/// `period` price changes, not Wilder's smoothing. Signal thresholds are
/// calibrated against this variant, so it must not be swapped for the
/// textbook one.
///
/// `avg_loss == 0` gives RSI 100; a flat window (`avg_gain == avg_loss == 0`)
/// gives NaN through the 0/0 division.
#[derive(Debug, Clone)]
pub struct RsiIndicator {
    pub period: usize,
}

impl RsiIndicator {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self { period }
    }

    /// Closes required before the first defined value.
    pub fn warm_up(&self) -> usize {
        self.period + 1
    }

    /// RSI for every bar of `closes` (oldest first). NaN until
    /// `period + 1` closes are available.
    pub fn series(&self, closes: &[f64]) -> Vec<f64> {
        let n = closes.len();
        let mut result = vec![f64::NAN; n];
        if n < self.warm_up() {
            return result;
        }

        // changes[i] is the move into bar i + 1
        let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
        let period = self.period as f64;

        for (offset, window) in changes.windows(self.period).enumerate() {
            let avg_gain = window.iter().map(|&c| c.max(0.0)).sum::<f64>() / period;
            let avg_loss = window.iter().map(|&c| (-c).max(0.0)).sum::<f64>() / period;
            let rs = avg_gain / avg_loss;
            result[offset + self.period] = 100.0 - 100.0 / (1.0 + rs);
        }

        result
    }

    /// RSI of the last bar.
    pub fn compute(&self, closes: &[f64]) -> f64 {
        self.series(closes).last().copied().unwrap_or(f64::NAN)
    }
}
