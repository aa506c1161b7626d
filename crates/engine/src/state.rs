use std::time::Instant;

use feedpilot_action_primitives::ActuationGate;
use feedpilot_policy_center::EngineTunables;

use crate::suppressor::InteractionSuppressor;
use crate::tracker::ContentTracker;

/// All mutable engine state for one page view.
///
/// Owned by a single evaluator and only touched from its tick and from
/// interaction delivery, never concurrently.
#[derive(Clone, Debug)]
pub struct EngineState {
    pub enabled: bool,
    pub suppressor: InteractionSuppressor,
    pub tracker: ContentTracker,
    pub gate: ActuationGate,
}

impl EngineState {
    pub fn new(enabled: bool, tunables: &EngineTunables, now: Instant) -> Self {
        Self {
            enabled,
            suppressor: InteractionSuppressor::new(tunables.suppression_window()),
            tracker: ContentTracker::new(now),
            gate: ActuationGate::new(tunables.debounce()),
        }
    }

    pub fn last_actuation_at(&self) -> Option<Instant> {
        self.gate.last_actuation_at()
    }
}
