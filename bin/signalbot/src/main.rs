use std::sync::Arc;

use anyhow::Context;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use common::{Config, Notifier};
use engine::{CooldownState, CryptoCompareClient, ScheduleSettings, Scheduler};
use strategy::{IndicatorEngine, SignalClassifier, TuningFile};
use telegram_notify::{TelegramNotifier, SHUTDOWN_MESSAGE, STARTUP_MESSAGE};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env().context("loading configuration")?;
    let tuning = match &cfg.tuning_config_path {
        Some(path) => TuningFile::load(path).with_context(|| format!("loading {path}"))?,
        None => TuningFile::default(),
    };
    info!(pair = %cfg.pair(), timeframe = %cfg.timeframe, "Signal bot starting");

    // ── Collaborators ─────────────────────────────────────────────────────────
    let market = Arc::new(
        CryptoCompareClient::new(&cfg.base, &cfg.quote)?
            .with_api_key(cfg.cryptocompare_api_key.clone()),
    );
    let notifier: Arc<dyn Notifier> = Arc::new(TelegramNotifier::new(
        cfg.telegram_token.clone(),
        cfg.telegram_chat_id,
        cfg.pair(),
    ));

    // ── Core ──────────────────────────────────────────────────────────────────
    let engine = IndicatorEngine::new(&tuning.indicators);
    if cfg.confidence_seed.is_some() {
        info!(seed = ?cfg.confidence_seed, "Confidence draw seeded");
    }
    let classifier = SignalClassifier::from_seed(tuning.rules, cfg.confidence_seed);

    let settings = ScheduleSettings {
        timeframe: cfg.timeframe,
        candle_limit: cfg.candle_limit,
        poll_interval: cfg.poll_interval,
        cooldown: chrono::Duration::from_std(cfg.cooldown).context("COOLDOWN_SECS out of range")?,
    };
    let scheduler = Scheduler::new(market, notifier.clone(), engine, classifier, settings);

    // ── Run ───────────────────────────────────────────────────────────────────
    if let Err(e) = notifier.announce(STARTUP_MESSAGE).await {
        warn!(error = %e, "Startup message not delivered");
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(scheduler.run(CooldownState::default(), shutdown_rx));

    info!("Scheduler started. Waiting for shutdown signal.");
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received.");

    let _ = shutdown_tx.send(true);
    let state = handle.await?;
    info!(last_signal_at = ?state.last_signal_at, "Scheduler stopped");

    if let Err(e) = notifier.announce(SHUTDOWN_MESSAGE).await {
        warn!(error = %e, "Shutdown message not delivered");
    }
    Ok(())
}
