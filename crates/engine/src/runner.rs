use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use feedpilot_action_primitives::{execute_observe, PageDriver, PageObservation};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::evaluator::{Evaluator, TickOutcome};
use crate::metrics::{self, EngineMetricsSnapshot};

/// Externally delivered toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct ControlMessage {
    pub enabled: bool,
}

/// Sender half kept by whoever relays toggles to a running engine.
pub type ControlSender = mpsc::Sender<ControlMessage>;

/// Drives an [`Evaluator`] from a fixed-rate clock against a live page.
pub struct EngineRunner {
    evaluator: Evaluator,
    driver: Arc<dyn PageDriver>,
    poll_interval: Duration,
    control_rx: mpsc::Receiver<ControlMessage>,
    shutdown: CancellationToken,
    last_input_seq: u64,
}

impl EngineRunner {
    pub fn new(
        evaluator: Evaluator,
        driver: Arc<dyn PageDriver>,
        shutdown: CancellationToken,
    ) -> (Self, ControlSender) {
        let (control_tx, control_rx) = mpsc::channel(16);
        let poll_interval = evaluator.profile().poll_interval();
        let runner = Self {
            evaluator,
            driver,
            poll_interval,
            control_rx,
            shutdown,
            last_input_seq: 0,
        };
        (runner, control_tx)
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Tick until the shutdown token is cancelled.
    pub async fn run(mut self) -> EngineMetricsSnapshot {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(
            platform = %self.evaluator.platform(),
            poll_ms = self.poll_interval.as_millis() as u64,
            enabled = self.evaluator.is_enabled(),
            "engine started"
        );

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                Some(message) = self.control_rx.recv() => {
                    self.evaluator.set_enabled(message.enabled);
                }
                _ = ticker.tick() => {
                    self.step().await;
                }
            }
        }

        let summary = metrics::snapshot();
        info!(
            ticks = summary.ticks,
            fallback = summary.fallback_advances,
            completion = summary.completion_advances,
            failures = summary.actuation_failures,
            "engine stopped"
        );
        summary
    }

    /// One observe → deliver interaction → evaluate cycle.
    pub async fn step(&mut self) -> Option<TickOutcome> {
        let observation =
            match execute_observe(self.driver.as_ref(), &self.evaluator.profile().media_selector)
                .await
            {
                Ok(observation) => observation,
                Err(err) => {
                    metrics::record_observe_failure();
                    warn!(platform = %self.evaluator.platform(), "page observation failed: {err}");
                    return None;
                }
            };

        let now = Instant::now();
        self.deliver_interaction(&observation, now);
        let today = Local::now().date_naive();
        let outcome = self.evaluator.tick(now, today, &observation).await;
        if let TickOutcome::Advanced { trigger, .. } = &outcome {
            debug!(trigger = trigger.as_str(), "tick advanced");
        }
        Some(outcome)
    }

    /// Forward page input to the suppressor. The page-side counter only grows
    /// within one document; a lower value means the page reloaded, so the
    /// counter is resynced and only an input with a timestamp is delivered.
    fn deliver_interaction(&mut self, observation: &PageObservation, now: Instant) {
        let seq = observation.input_seq;
        if seq == self.last_input_seq {
            return;
        }
        let reloaded = seq < self.last_input_seq;
        self.last_input_seq = seq;
        let since = observation
            .since_interaction_ms
            .filter(|ms| ms.is_finite() && *ms >= 0.0)
            .map(|ms| Duration::from_micros((ms * 1000.0) as u64));
        let since = match since {
            Some(since) => since,
            None if reloaded => {
                debug!(input_seq = seq, "page input counter reset");
                return;
            }
            None => Duration::ZERO,
        };
        let at = now.checked_sub(since).unwrap_or(now);
        self.evaluator.notify_interaction_at(at);
    }
}
