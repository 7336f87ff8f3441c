pub mod format;
pub mod notifier;

pub use format::{render_signal, SHUTDOWN_MESSAGE, STARTUP_MESSAGE};
pub use notifier::TelegramNotifier;
