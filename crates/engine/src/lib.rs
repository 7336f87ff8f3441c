pub mod cryptocompare;
pub mod scheduler;

pub use cryptocompare::CryptoCompareClient;
pub use scheduler::{CooldownState, CycleOutcome, ScheduleSettings, Scheduler};
