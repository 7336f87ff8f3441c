use super::ema::ema;

/// MACD (Moving Average Convergence/Divergence) indicator.
///
/// MACD line = EMA(fast) − EMA(slow), signal = EMA(macd_line, signal_period),
/// histogram = MACD line − signal. All EMAs are seeded with their first input.
#[derive(Debug, Clone)]
pub struct MacdIndicator {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

/// MACD triple for a single bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdValue {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl MacdValue {
    pub const NAN: MacdValue = MacdValue {
        macd: f64::NAN,
        signal: f64::NAN,
        histogram: f64::NAN,
    };
}

impl MacdIndicator {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(
            fast < slow,
            "MACD fast period must be less than slow period"
        );
        Self { fast, slow, signal }
    }

    /// Closes required before values are reported.
    pub fn warm_up(&self) -> usize {
        self.slow
    }

    /// MACD triple for every bar of `closes` (oldest first).
    /// Bars before the slow EMA has `slow` inputs are NaN.
    pub fn series(&self, closes: &[f64]) -> Vec<MacdValue> {
        let fast = ema(closes, self.fast);
        let slow = ema(closes, self.slow);
        let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        // The signal line runs over the unmasked MACD line so warm-up NaNs
        // don't poison the recursion.
        let signal = ema(&line, self.signal);

        line.iter()
            .zip(&signal)
            .enumerate()
            .map(|(i, (&macd, &signal))| {
                if i + 1 < self.warm_up() {
                    MacdValue::NAN
                } else {
                    MacdValue {
                        macd,
                        signal,
                        histogram: macd - signal,
                    }
                }
            })
            .collect()
    }

    /// MACD triple of the last bar; all NaN when there isn't enough data.
    pub fn compute(&self, closes: &[f64]) -> MacdValue {
        self.series(closes).last().copied().unwrap_or(MacdValue::NAN)
    }
}
