use thiserror::Error;

/// Raised when a candle series cannot yield even a first price difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("insufficient data: need at least {required} candles, got {len}")]
pub struct InsufficientDataError {
    pub len: usize,
    pub required: usize,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    InsufficientData(#[from] InsufficientDataError),

    #[error("Market data error: {0}")]
    MarketData(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
