/// Bollinger Bands: SMA(close, period) ± multiplier × stddev(close, period).
///
/// Uses population stddev (divide by N).
#[derive(Debug, Clone)]
pub struct BollingerIndicator {
    pub period: usize,
    pub multiplier: f64,
}

/// Upper, middle and lower band for a single bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl Bands {
    pub const NAN: Bands = Bands {
        upper: f64::NAN,
        middle: f64::NAN,
        lower: f64::NAN,
    };
}

impl BollingerIndicator {
    pub fn new(period: usize, multiplier: f64) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        Self { period, multiplier }
    }

    pub fn warm_up(&self) -> usize {
        self.period
    }

    /// Bands for every bar of `closes`; NaN until a full window exists.
    pub fn series(&self, closes: &[f64]) -> Vec<Bands> {
        let mut result = vec![Bands::NAN; closes.len()];
        if closes.len() < self.warm_up() {
            return result;
        }
        let n = self.period as f64;

        for (offset, window) in closes.windows(self.period).enumerate() {
            let mean = window.iter().sum::<f64>() / n;
            let variance = window
                .iter()
                .map(|&c| {
                    let diff = c - mean;
                    diff * diff
                })
                .sum::<f64>()
                / n;
            let width = self.multiplier * variance.sqrt();

            result[offset + self.period - 1] = Bands {
                upper: mean + width,
                middle: mean,
                lower: mean - width,
            };
        }

        result
    }

    /// Bands of the last bar.
    pub fn compute(&self, closes: &[f64]) -> Bands {
        self.series(closes).last().copied().unwrap_or(Bands::NAN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_nan_before_full_window() {
        let bb = BollingerIndicator::new(20, 2.0);
        let closes: Vec<f64> = (0..19).map(|i| i as f64).collect();
        let bands = bb.compute(&closes);
        assert!(bands.middle.is_nan());
        assert!(bands.upper.is_nan());
    }

    #[test]
    fn first_band_lands_on_warm_up_bar() {
        let bb = BollingerIndicator::new(20, 2.0);
        let closes: Vec<f64> = (0..bb.warm_up()).map(|i| 0.5 + i as f64 * 0.001).collect();
        let series = bb.series(&closes);
        assert_eq!(series.len(), 20);
        assert!(series[18].middle.is_nan());
        assert!(!series[19].middle.is_nan());
    }

    #[test]
    fn constant_prices_collapse_the_bands() {
        let bb = BollingerIndicator::new(20, 2.0);
        let bands = bb.compute(&[0.5; 25]);
        assert!((bands.middle - 0.5).abs() < 1e-12);
        assert!((bands.upper - bands.lower).abs() < 1e-12);
    }

    #[test]
    fn population_stddev_known_values() {
        // Window 2, 4, 4, 4, 5, 5, 7, 9: mean 5, population stddev 2
        let bb = BollingerIndicator::new(8, 2.0);
        let bands = bb.compute(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((bands.middle - 5.0).abs() < 1e-12);
        assert!((bands.upper - 9.0).abs() < 1e-12);
        assert!((bands.lower - 1.0).abs() < 1e-12);
    }

    #[test]
    fn bands_follow_trailing_window_only() {
        let bb = BollingerIndicator::new(3, 2.0);
        let series = bb.series(&[100.0, 1.0, 1.0, 1.0]);
        assert!(series[1].middle.is_nan());
        assert!((series[3].middle - 1.0).abs() < 1e-12);
        assert!((series[3].upper - 1.0).abs() < 1e-12);
    }
}
