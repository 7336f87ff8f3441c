pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;

pub use bollinger::{Bands, BollingerIndicator};
pub use ema::ema;
pub use macd::{MacdIndicator, MacdValue};
pub use rsi::RsiIndicator;
