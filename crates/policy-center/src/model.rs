use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use feedpilot_core_types::Platform;
use serde::{Deserialize, Serialize};

use crate::errors::PolicyError;
use crate::registry::builtin_profile;

/// How the actuator moves the feed forward.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceMethod {
    /// Dispatch a synthetic keyboard event carrying [`PlatformProfile::advance_key`].
    SimulatedKey,
    /// Click the first matching "next" control, else scroll one viewport.
    PlatformSpecific,
}

impl FromStr for AdvanceMethod {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simulated_key" | "arrow" | "key" => Ok(AdvanceMethod::SimulatedKey),
            "platform_specific" | "scroll" => Ok(AdvanceMethod::PlatformSpecific),
            other => Err(PolicyError::InvalidValue(format!(
                "unknown advance method '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum AdvanceKey {
    ArrowDown,
    ArrowRight,
    ArrowUp,
    ArrowLeft,
}

impl AdvanceKey {
    /// DOM `key`/`code` value.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvanceKey::ArrowDown => "ArrowDown",
            AdvanceKey::ArrowRight => "ArrowRight",
            AdvanceKey::ArrowUp => "ArrowUp",
            AdvanceKey::ArrowLeft => "ArrowLeft",
        }
    }

    /// Legacy `keyCode`/`which` value some feeds still listen for.
    pub fn key_code(&self) -> u32 {
        match self {
            AdvanceKey::ArrowLeft => 37,
            AdvanceKey::ArrowUp => 38,
            AdvanceKey::ArrowRight => 39,
            AdvanceKey::ArrowDown => 40,
        }
    }
}

impl fmt::Display for AdvanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdvanceKey {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ArrowDown" => Ok(AdvanceKey::ArrowDown),
            "ArrowRight" => Ok(AdvanceKey::ArrowRight),
            "ArrowUp" => Ok(AdvanceKey::ArrowUp),
            "ArrowLeft" => Ok(AdvanceKey::ArrowLeft),
            other => Err(PolicyError::InvalidValue(format!(
                "unknown advance key '{other}'"
            ))),
        }
    }
}

/// Where the content-identity signal comes from when no media element is on screen.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySource {
    /// Media source address, or the empty string without media.
    Media,
    /// Media source address, or the page address without media.
    MediaOrPageAddress,
}

impl FromStr for IdentitySource {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "media" => Ok(IdentitySource::Media),
            "media_or_page_address" => Ok(IdentitySource::MediaOrPageAddress),
            other => Err(PolicyError::InvalidValue(format!(
                "unknown identity source '{other}'"
            ))),
        }
    }
}

/// Per-platform configuration record. Immutable once the engine starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatformProfile {
    pub media_selector: String,
    pub advance_method: AdvanceMethod,
    pub advance_key: AdvanceKey,
    /// Seconds of playback remaining below which the media counts as finished.
    pub trigger_threshold_secs: f64,
    pub poll_interval_ms: u64,
    /// `None` disables the stuck-content fallback for this platform.
    pub stuck_timeout_ms: Option<u64>,
    pub identity_source: IdentitySource,
    /// Ordered "next" affordances tried by [`AdvanceMethod::PlatformSpecific`].
    #[serde(default)]
    pub next_controls: Vec<String>,
}

impl PlatformProfile {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn stuck_timeout(&self) -> Option<Duration> {
        self.stuck_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineTunables {
    /// Minimum spacing between two actuations, whichever trigger fired.
    pub debounce_ms: u64,
    /// Trailing window after raw user input during which no trigger fires.
    pub suppression_window_ms: u64,
    pub toast_duration_ms: u64,
}

impl EngineTunables {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn suppression_window(&self) -> Duration {
        Duration::from_millis(self.suppression_window_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

impl Default for EngineTunables {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            suppression_window_ms: 1_000,
            toast_duration_ms: 2_000,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct PolicySnapshot {
    pub rev: u64,
    pub engine: EngineTunables,
    pub profiles: BTreeMap<Platform, PlatformProfile>,
    pub provenance: HashMap<String, PolicyProvenance>,
}

impl PolicySnapshot {
    /// Effective profile for `platform`; the built-in registry entry when the
    /// snapshot carries none.
    pub fn profile(&self, platform: Platform) -> PlatformProfile {
        self.profiles
            .get(&platform)
            .cloned()
            .unwrap_or_else(|| builtin_profile(platform))
    }

    pub fn set_provenance(&mut self, path: &str, source: PolicySource) {
        self.provenance.insert(
            path.to_string(),
            PolicyProvenance {
                path: path.to_string(),
                source,
            },
        );
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PolicyProvenance {
    pub path: String,
    pub source: PolicySource,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PolicySource {
    Builtin,
    File,
    Env,
    Cli,
}

/// Read-only slice of a snapshot handed to one engine instance.
#[derive(Clone, Debug)]
pub struct PolicyView {
    pub rev: u64,
    pub platform: Platform,
    pub profile: PlatformProfile,
    pub engine: EngineTunables,
}

impl PolicyView {
    pub fn for_platform(snapshot: &PolicySnapshot, platform: Platform) -> Self {
        Self {
            rev: snapshot.rev,
            platform,
            profile: snapshot.profile(platform),
            engine: snapshot.engine.clone(),
        }
    }
}
