use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use common::{Error, MarketData, Notifier, Result, Signal, Timeframe};
use strategy::{IndicatorEngine, SignalClassifier};

/// In-memory cooldown bookkeeping. Lost on restart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CooldownState {
    pub last_signal_at: Option<DateTime<Utc>>,
    pub cooldown_until: Option<DateTime<Utc>>,
}

impl CooldownState {
    pub fn is_cooling(&self, now: DateTime<Utc>) -> bool {
        matches!(self.cooldown_until, Some(until) if now < until)
    }

    /// State after a signal was delivered at `now`.
    pub fn after_delivery(self, now: DateTime<Utc>, cooldown: Duration) -> Self {
        Self {
            last_signal_at: Some(now),
            cooldown_until: Some(now + cooldown),
        }
    }
}

/// What a single poll did.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Pipeline not run; a previous signal is still cooling down.
    CoolingDown { until: DateTime<Utc> },
    /// A collaborator failed or the series was too short.
    Skipped(Error),
    NoSignal,
    Delivered(Signal),
    /// Classified but not delivered; cooldown untouched so the next poll retries.
    DeliveryFailed { signal: Signal, error: Error },
}

#[derive(Debug, Clone)]
pub struct ScheduleSettings {
    pub timeframe: Timeframe,
    pub candle_limit: usize,
    pub poll_interval: std::time::Duration,
    pub cooldown: Duration,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            timeframe: Timeframe::OneHour,
            candle_limit: 100,
            poll_interval: std::time::Duration::from_secs(60),
            cooldown: Duration::hours(2),
        }
    }
}

/// Drives fetch → compute → classify → notify on a fixed poll interval.
pub struct Scheduler<R = StdRng> {
    market: Arc<dyn MarketData>,
    notifier: Arc<dyn Notifier>,
    engine: IndicatorEngine,
    classifier: SignalClassifier<R>,
    settings: ScheduleSettings,
}

impl<R: Rng + Send> Scheduler<R> {
    pub fn new(
        market: Arc<dyn MarketData>,
        notifier: Arc<dyn Notifier>,
        engine: IndicatorEngine,
        classifier: SignalClassifier<R>,
        settings: ScheduleSettings,
    ) -> Self {
        Self {
            market,
            notifier,
            engine,
            classifier,
            settings,
        }
    }

    /// One pass of the pipeline, without cooldown or delivery.
    pub async fn evaluate(&mut self, now: DateTime<Utc>) -> Result<Option<Signal>> {
        let series = self
            .market
            .candles(self.settings.timeframe, self.settings.candle_limit)
            .await?;
        let snapshot = self.engine.compute(&series)?;
        let live_price = self.market.spot_price().await?;

        Ok(self.classifier.classify_at(snapshot, live_price, now))
    }

    /// Run one poll against `state` and return the updated state.
    pub async fn tick(
        &mut self,
        state: CooldownState,
        now: DateTime<Utc>,
    ) -> (CooldownState, CycleOutcome) {
        if state.is_cooling(now) {
            if let Some(until) = state.cooldown_until {
                debug!(until = %until, "Cooldown active, skipping evaluation");
                return (state, CycleOutcome::CoolingDown { until });
            }
        }

        let signal = match self.evaluate(now).await {
            Ok(Some(signal)) => signal,
            Ok(None) => {
                debug!("No signal this cycle");
                return (state, CycleOutcome::NoSignal);
            }
            Err(e) => {
                warn!(error = %e, "Evaluation cycle skipped");
                return (state, CycleOutcome::Skipped(e));
            }
        };

        match self.notifier.deliver(&signal).await {
            Ok(()) => {
                let next = state.after_delivery(now, self.settings.cooldown);
                info!(
                    side = %signal.side,
                    price = signal.entry_price,
                    cooldown_until = ?next.cooldown_until,
                    "Signal delivered"
                );
                (next, CycleOutcome::Delivered(signal))
            }
            Err(error) => {
                warn!(side = %signal.side, error = %error, "Signal delivery failed");
                (state, CycleOutcome::DeliveryFailed { signal, error })
            }
        }
    }

    /// Poll until `shutdown` flips to `true`. Returns the final cooldown state.
    /// Call from `tokio::spawn`.
    pub async fn run(
        mut self,
        mut state: CooldownState,
        mut shutdown: watch::Receiver<bool>,
    ) -> CooldownState {
        info!(
            timeframe = %self.settings.timeframe,
            poll_secs = self.settings.poll_interval.as_secs_f64(),
            "Scheduler running"
        );

        let mut ticker = tokio::time::interval(self.settings.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let (next, _) = self.tick(state, Utc::now()).await;
                    state = next;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Scheduler stopping");
                        return state;
                    }
                }
            }
        }
    }
}
