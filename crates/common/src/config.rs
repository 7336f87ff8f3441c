use std::time::Duration;

use crate::{Error, Result, Timeframe};

/// All configuration loaded from environment variables at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub telegram_token: String,
    pub telegram_chat_id: i64,

    // Market
    pub base: String,
    pub quote: String,
    pub timeframe: Timeframe,
    pub candle_limit: usize,
    pub cryptocompare_api_key: Option<String>,

    // Scheduling
    pub poll_interval: Duration,
    pub cooldown: Duration,

    /// Fixed seed for the confidence draw. `None` seeds from entropy.
    pub confidence_seed: Option<u64>,

    /// Optional TOML file overriding indicator periods and signal rules.
    pub tuning_config_path: Option<String>,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore error if .env not present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let telegram_chat_id = required(&lookup, "TELEGRAM_CHAT_ID")?
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::Config("TELEGRAM_CHAT_ID must be a numeric chat id".into()))?;

        let timeframe = match lookup("SIGNAL_TIMEFRAME") {
            Some(raw) => raw.parse()?,
            None => Timeframe::OneHour,
        };

        let candle_limit: usize = parsed(&lookup, "CANDLE_LIMIT")?.unwrap_or(100);
        if candle_limit < 2 {
            return Err(Error::Config(format!(
                "CANDLE_LIMIT must be at least 2, got {candle_limit}"
            )));
        }

        let poll_secs: u64 = parsed(&lookup, "POLL_INTERVAL_SECS")?.unwrap_or(60);
        if poll_secs == 0 {
            return Err(Error::Config("POLL_INTERVAL_SECS must be positive".into()));
        }

        Ok(Config {
            telegram_token: required(&lookup, "TELEGRAM_TOKEN")?,
            telegram_chat_id,
            base: lookup("SIGNAL_BASE").unwrap_or_else(|| "XRP".to_string()),
            quote: lookup("SIGNAL_QUOTE").unwrap_or_else(|| "USDT".to_string()),
            timeframe,
            candle_limit,
            cryptocompare_api_key: lookup("CRYPTOCOMPARE_API_KEY").filter(|k| !k.is_empty()),
            poll_interval: Duration::from_secs(poll_secs),
            cooldown: Duration::from_secs(parsed(&lookup, "COOLDOWN_SECS")?.unwrap_or(2 * 60 * 60)),
            confidence_seed: parsed(&lookup, "CONFIDENCE_SEED")?,
            tuning_config_path: lookup("TUNING_CONFIG_PATH").filter(|p| !p.is_empty()),
        })
    }

    /// Trading pair as shown to users, e.g. `XRPUSDT`.
    pub fn pair(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.is_empty()).ok_or_else(|| {
        Error::Config(format!(
            "Required environment variable '{key}' is not set. Check your .env file."
        ))
    })
}

fn parsed<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::Config(format!("{key} has an invalid value: '{raw}'"))),
    }
}
