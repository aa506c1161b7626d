use std::time::{Duration, Instant};

/// Global minimum spacing between two actuations.
///
/// The gate is open before the first actuation and afterwards only once
/// strictly more than `min_spacing` has elapsed since the last one.
#[derive(Clone, Debug)]
pub struct ActuationGate {
    min_spacing: Duration,
    last_actuation_at: Option<Instant>,
}

impl ActuationGate {
    pub fn new(min_spacing: Duration) -> Self {
        Self {
            min_spacing,
            last_actuation_at: None,
        }
    }

    pub fn min_spacing(&self) -> Duration {
        self.min_spacing
    }

    pub fn last_actuation_at(&self) -> Option<Instant> {
        self.last_actuation_at
    }

    pub fn is_open(&self, now: Instant) -> bool {
        match self.last_actuation_at {
            Some(last) => now.saturating_duration_since(last) > self.min_spacing,
            None => true,
        }
    }

    pub fn record(&mut self, now: Instant) {
        self.last_actuation_at = Some(now);
    }
}
