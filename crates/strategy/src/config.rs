use serde::{Deserialize, Serialize};

use common::{Error, Result};

use crate::classifier::SignalRules;
use crate::engine::IndicatorParams;

/// Longest signal validity window accepted from a tuning file (30 days).
pub const MAX_VALIDITY_HOURS: i64 = 30 * 24;

/// Optional tuning file (TOML). Every key falls back to its default.
///
/// Example `config/tuning.toml`:
/// ```toml
/// [indicators]
/// rsi_period = 14
/// ema_trend = 50
///
/// [rules]
/// buy_rsi_below = 35.0
/// sell_rsi_above = 70.0
/// histogram_band = 0.001
/// validity_hours = 6
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TuningFile {
    pub indicators: IndicatorParams,
    pub rules: SignalRules,
}

impl TuningFile {
    /// Load from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("Failed to parse tuning config at '{path}': {e}")))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let file: TuningFile =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> Result<()> {
        let p = &self.indicators;
        if p.macd_fast >= p.macd_slow {
            return Err(Error::Config(format!(
                "macd_fast ({}) must be less than macd_slow ({})",
                p.macd_fast, p.macd_slow
            )));
        }
        if [p.rsi_period, p.macd_fast, p.macd_signal, p.ema_trend, p.bollinger_period]
            .contains(&0)
        {
            return Err(Error::Config("indicator periods must be >= 1".into()));
        }

        let r = &self.rules;
        if !r.confidence_min.is_finite() || !r.confidence_max.is_finite() {
            return Err(Error::Config("confidence bounds must be finite".into()));
        }
        if !(r.confidence_min < r.confidence_max) {
            return Err(Error::Config(format!(
                "confidence_min ({}) must be below confidence_max ({})",
                r.confidence_min, r.confidence_max
            )));
        }
        if !(r.histogram_band > 0.0 && r.histogram_band.is_finite()) {
            return Err(Error::Config("histogram_band must be positive".into()));
        }
        for (name, pct) in [
            ("take_profit_1_pct", r.take_profit_1_pct),
            ("take_profit_2_pct", r.take_profit_2_pct),
            ("stop_loss_pct", r.stop_loss_pct),
        ] {
            if !(pct.is_finite() && pct >= 0.0) {
                return Err(Error::Config(format!(
                    "{name} must be a non-negative number, got {pct}"
                )));
            }
        }
        if !(1..=MAX_VALIDITY_HOURS).contains(&r.validity_hours) {
            return Err(Error::Config(format!(
                "validity_hours must be within 1..={MAX_VALIDITY_HOURS}, got {}",
                r.validity_hours
            )));
        }
        Ok(())
    }
}
