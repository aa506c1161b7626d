use std::time::{Duration, Instant};

/// Emitted when the on-screen content identity changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityChange {
    pub previous: String,
    pub current: String,
}

/// Content identity state machine.
///
/// Tracks what is on screen and since when, plus the one-shot flag that
/// allows a single advancement per identity.
#[derive(Clone, Debug)]
pub struct ContentTracker {
    current_content_identity: String,
    content_started_at: Instant,
    last_known_media_identity: String,
    has_triggered: bool,
}

impl ContentTracker {
    /// Start with the empty identity, shown since `now`.
    pub fn new(now: Instant) -> Self {
        Self {
            current_content_identity: String::new(),
            content_started_at: now,
            last_known_media_identity: String::new(),
            has_triggered: false,
        }
    }

    /// Feed one raw identity signal. An empty signal is an identity like any other.
    pub fn observe(&mut self, signal: &str, now: Instant) -> Option<IdentityChange> {
        if signal == self.current_content_identity {
            return None;
        }
        let previous = std::mem::replace(&mut self.current_content_identity, signal.to_string());
        self.content_started_at = now;
        self.has_triggered = false;
        Some(IdentityChange {
            previous,
            current: signal.to_string(),
        })
    }

    /// Feed the active media element's source. A new source clears the
    /// one-shot flag even when the content identity did not move.
    pub fn observe_media(&mut self, media_identity: &str) -> bool {
        if media_identity == self.last_known_media_identity {
            return false;
        }
        self.last_known_media_identity = media_identity.to_string();
        self.has_triggered = false;
        true
    }

    pub fn current_identity(&self) -> &str {
        &self.current_content_identity
    }

    pub fn last_known_media_identity(&self) -> &str {
        &self.last_known_media_identity
    }

    pub fn content_started_at(&self) -> Instant {
        self.content_started_at
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.content_started_at)
    }

    pub fn has_triggered(&self) -> bool {
        self.has_triggered
    }

    pub fn mark_triggered(&mut self) {
        self.has_triggered = true;
    }
}
