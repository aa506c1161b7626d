use std::time::{Duration, Instant};

/// Single-shot timeout expressed as a deadline.
///
/// Arming while a deadline is pending replaces it; the previous deadline can
/// never fire afterwards.
#[derive(Clone, Debug, Default)]
pub struct ScheduledTimeout {
    deadline: Option<Instant>,
}

impl ScheduledTimeout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm to fire `after` from `at`, cancelling any pending deadline.
    pub fn rearm(&mut self, at: Instant, after: Duration) {
        self.deadline = Some(at + after);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// True while armed and `now` is before the deadline.
    pub fn is_pending_at(&self, now: Instant) -> bool {
        matches!(self.deadline, Some(deadline) if now < deadline)
    }

    /// Consume the deadline if it has been reached. Returns whether it fired.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
