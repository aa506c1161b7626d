//! Core data types for action primitives

use chrono::{DateTime, Utc};
use feedpilot_policy_center::{AdvanceKey, IdentitySource};
use serde::{Deserialize, Serialize};

/// What the actuator actually did to the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdvanceOutcome {
    /// Synthetic keydown dispatched on the document
    KeyDispatched { key: AdvanceKey },

    /// A platform "next" control was found and clicked
    ControlClicked { selector: String },

    /// No control was present; the viewport was scrolled by one screen
    ViewportScrolled,
}

/// Report for one actuation.
///
/// Reports describe what was attempted, never whether the feed moved: the
/// page gives no confirmation and the next identity check is the only signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionReport {
    /// Unique identifier for this actuation
    pub action_id: String,

    /// When the actuation started
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,

    /// Total latency in milliseconds
    pub latency_ms: u64,

    pub outcome: AdvanceOutcome,
}

impl ActionReport {
    pub fn new(started_at: DateTime<Utc>, latency_ms: u64, outcome: AdvanceOutcome) -> Self {
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            started_at,
            latency_ms,
            outcome,
        }
    }
}

/// Live state of the active media element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaState {
    /// Resolved source address (`currentSrc`, else `src`)
    #[serde(default)]
    pub src: String,

    /// Total duration in seconds; `None` while unknown (NaN/Infinity in the page)
    pub duration: Option<f64>,

    #[serde(default)]
    pub current_time: Option<f64>,

    pub paused: bool,
}

impl MediaState {
    /// Seconds left to play, only when the duration is known and positive.
    pub fn remaining_secs(&self) -> Option<f64> {
        let duration = self.duration.filter(|d| d.is_finite() && *d > 0.0)?;
        let current = self.current_time.filter(|t| t.is_finite()).unwrap_or(0.0);
        Some(duration - current)
    }

    pub fn is_playing(&self) -> bool {
        !self.paused
    }
}

/// One poll of the page, taken at the start of an engine tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageObservation {
    /// Current page address
    #[serde(default)]
    pub href: String,

    /// Active media element, if the media selector matched
    #[serde(default)]
    pub media: Option<MediaState>,

    /// Number of trusted raw input events seen since the listeners were installed
    #[serde(default)]
    pub input_seq: u64,

    /// Milliseconds since the most recent trusted raw input event
    #[serde(default)]
    pub since_interaction_ms: Option<f64>,
}

impl PageObservation {
    /// Raw content-identity signal for this observation.
    ///
    /// An empty string is a legitimate identity (no media located yet).
    pub fn content_signal(&self, source: IdentitySource) -> String {
        match (&self.media, source) {
            (Some(media), _) => media.src.clone(),
            (None, IdentitySource::MediaOrPageAddress) => self.href.clone(),
            (None, IdentitySource::Media) => String::new(),
        }
    }
}
