use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use feedpilot_action_primitives::{ActionReport, Actuator, PageObservation};
use feedpilot_core_types::Platform;
use feedpilot_policy_center::{EngineTunables, PlatformProfile};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::metrics;
use crate::sinks::{CounterSink, NotificationSink};
use crate::state::EngineState;

/// Which rule decided to advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Content stayed on screen longer than the platform's stuck timeout.
    Fallback,
    /// Active media is about to finish.
    Completion,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Fallback => "fallback",
            Trigger::Completion => "completion",
        }
    }

    /// Toast text shown after an advancement.
    pub fn notification(&self) -> &'static str {
        match self {
            Trigger::Fallback => "⏭️ Next content",
            Trigger::Completion => "▶️ Next video",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Trigger::Fallback => "content timeout (no video or stuck)",
            Trigger::Completion => "next video",
        }
    }
}

/// Result of one tick. Every variant other than `Advanced` means "did nothing".
#[derive(Clone, Debug)]
pub enum TickOutcome {
    Disabled,
    Suppressed,
    Idle,
    Advanced {
        trigger: Trigger,
        /// `None` when the actuation itself failed; the trigger is still spent.
        report: Option<ActionReport>,
    },
}

impl TickOutcome {
    pub fn advanced(&self) -> Option<Trigger> {
        match self {
            TickOutcome::Advanced { trigger, .. } => Some(*trigger),
            _ => None,
        }
    }
}

/// Per-tick decision function plus the state it owns.
pub struct Evaluator {
    platform: Platform,
    profile: PlatformProfile,
    state: EngineState,
    actuator: Arc<dyn Actuator>,
    counter: Arc<dyn CounterSink>,
    notifier: Arc<dyn NotificationSink>,
}

impl Evaluator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        platform: Platform,
        profile: PlatformProfile,
        tunables: &EngineTunables,
        enabled: bool,
        actuator: Arc<dyn Actuator>,
        counter: Arc<dyn CounterSink>,
        notifier: Arc<dyn NotificationSink>,
        now: Instant,
    ) -> Self {
        Self {
            platform,
            profile,
            state: EngineState::new(enabled, tunables, now),
            actuator,
            counter,
            notifier,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn profile(&self) -> &PlatformProfile {
        &self.profile
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EngineState {
        &mut self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    /// Applied from the next tick on.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.state.enabled != enabled {
            info!(platform = %self.platform, enabled, "engine toggled");
        }
        self.state.enabled = enabled;
    }

    pub fn notify_interaction(&mut self, now: Instant) {
        self.state.suppressor.notify_interaction(now);
    }

    pub fn notify_interaction_at(&mut self, at: Instant) {
        self.state.suppressor.notify_interaction_at(at);
    }

    pub fn is_suppressed(&self, now: Instant) -> bool {
        self.state.suppressor.is_suppressed(now)
    }

    /// Evaluate one poll of the page at `now`.
    pub async fn tick(
        &mut self,
        now: Instant,
        today: NaiveDate,
        observation: &PageObservation,
    ) -> TickOutcome {
        metrics::record_tick();
        self.state.suppressor.advance_to(now);

        if !self.state.enabled {
            metrics::record_skipped_disabled();
            return TickOutcome::Disabled;
        }
        if self.state.suppressor.is_suppressed(now) {
            metrics::record_skipped_suppressed();
            return TickOutcome::Suppressed;
        }

        let signal = observation.content_signal(self.profile.identity_source);
        if let Some(change) = self.state.tracker.observe(&signal, now) {
            debug!(
                platform = %self.platform,
                previous = %change.previous,
                content_id = %change.current,
                "content identity changed"
            );
        }

        if self.fallback_due(now) {
            return self.advance(Trigger::Fallback, now, today).await;
        }

        let Some(media) = observation.media.as_ref() else {
            return TickOutcome::Idle;
        };

        self.state.tracker.observe_media(&media.src);

        let about_to_end = media
            .remaining_secs()
            .is_some_and(|remaining| remaining < self.profile.trigger_threshold_secs);
        if media.is_playing()
            && about_to_end
            && !self.state.tracker.has_triggered()
            && self.state.gate.is_open(now)
        {
            return self.advance(Trigger::Completion, now, today).await;
        }

        TickOutcome::Idle
    }

    fn fallback_due(&self, now: Instant) -> bool {
        let Some(stuck_timeout) = self.profile.stuck_timeout() else {
            return false;
        };
        self.state.tracker.elapsed(now) > stuck_timeout
            && !self.state.tracker.has_triggered()
            && self.state.gate.is_open(now)
    }

    async fn advance(&mut self, trigger: Trigger, now: Instant, today: NaiveDate) -> TickOutcome {
        self.state.tracker.mark_triggered();
        self.state.gate.record(now);

        let report = match self.actuator.actuate(&self.profile).await {
            Ok(report) => report,
            Err(err) => {
                metrics::record_actuation_failure();
                warn!(
                    platform = %self.platform,
                    trigger = trigger.as_str(),
                    content_id = %self.state.tracker.current_identity(),
                    retryable = err.is_retryable(),
                    "actuation failed: {err}"
                );
                return TickOutcome::Advanced {
                    trigger,
                    report: None,
                };
            }
        };

        metrics::record_advance(trigger);
        self.counter.increment_count(self.platform, today).await;
        self.notifier.notify(trigger.notification()).await;

        info!(
            platform = %self.platform,
            trigger = trigger.as_str(),
            content_id = %self.state.tracker.current_identity(),
            latency_ms = report.latency_ms,
            "[{}] Auto advance: {}",
            self.platform.as_str().to_uppercase(),
            trigger.describe()
        );

        TickOutcome::Advanced {
            trigger,
            report: Some(report),
        }
    }
}
