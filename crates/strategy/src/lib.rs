pub mod classifier;
pub mod config;
pub mod engine;
pub mod indicators;

pub use classifier::{SignalClassifier, SignalRules};
pub use config::TuningFile;
pub use engine::{IndicatorEngine, IndicatorParams};
