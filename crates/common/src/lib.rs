pub mod config;
pub mod error;
pub mod exchange;
pub mod types;

pub use config::Config;
pub use error::{Error, InsufficientDataError, Result};
pub use exchange::{MarketData, Notifier};
pub use types::*;
