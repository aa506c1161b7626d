use std::time::{Duration, Instant};

use crate::timer::ScheduledTimeout;

/// Holds the engine off while the user is scrolling, touching or clicking.
///
/// Every interaction re-arms a single clear-timeout; suppression lasts from
/// the interaction until `window` has passed without another one.
#[derive(Clone, Debug)]
pub struct InteractionSuppressor {
    window: Duration,
    user_interacting: bool,
    clear_timeout: ScheduledTimeout,
}

impl InteractionSuppressor {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            user_interacting: false,
            clear_timeout: ScheduledTimeout::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record an interaction happening at `now`.
    pub fn notify_interaction(&mut self, now: Instant) {
        self.notify_interaction_at(now);
    }

    /// Record an interaction that happened at `at`, which may lie in the past
    /// when the input was reported late.
    pub fn notify_interaction_at(&mut self, at: Instant) {
        self.user_interacting = true;
        self.clear_timeout.rearm(at, self.window);
    }

    /// Run the clear-timeout if it is due.
    pub fn advance_to(&mut self, now: Instant) {
        if self.clear_timeout.fire_if_due(now) {
            self.user_interacting = false;
        }
    }

    pub fn is_suppressed(&self, now: Instant) -> bool {
        self.user_interacting && self.clear_timeout.is_pending_at(now)
    }

    /// Flag as last cleared or set; does not look at the clock.
    pub fn user_interacting(&self) -> bool {
        self.user_interacting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn quiet_suppressor_is_not_suppressed() {
        let suppressor = InteractionSuppressor::new(ms(1000));
        assert!(!suppressor.is_suppressed(Instant::now()));
        assert!(!suppressor.user_interacting());
    }

    #[test]
    fn window_clears_after_timeout() {
        let t0 = Instant::now();
        let mut suppressor = InteractionSuppressor::new(ms(1000));
        suppressor.notify_interaction(t0);
        assert!(suppressor.is_suppressed(t0));
        assert!(suppressor.is_suppressed(t0 + ms(999)));
        assert!(!suppressor.is_suppressed(t0 + ms(1000)));

        suppressor.advance_to(t0 + ms(1001));
        assert!(!suppressor.user_interacting());
    }

    #[test]
    fn late_report_is_anchored_at_input_time() {
        let t0 = Instant::now();
        let mut suppressor = InteractionSuppressor::new(ms(1000));
        suppressor.notify_interaction_at(t0);
        assert!(suppressor.is_suppressed(t0 + ms(900)));
        assert!(!suppressor.is_suppressed(t0 + ms(1100)));
    }
}
