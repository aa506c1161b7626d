//! Layered policy loading.
//!
//! Built-in registry → typed YAML policy files → `FEEDPILOT_POLICY__*`
//! variables → `FEEDPILOT_POLICY_CLI_OVERRIDES`. Files are merged field by
//! field; the two override layers address single fields by dotted path.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use feedpilot_core_types::Platform;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::api::apply_override_to_snapshot;
use crate::defaults::default_snapshot;
use crate::errors::PolicyError;
use crate::model::{AdvanceKey, AdvanceMethod, IdentitySource, PolicySnapshot, PolicySource};
use crate::registry::builtin_profile;

const ENV_PREFIX: &str = "FEEDPILOT_POLICY__";
const ENV_CLI_OVERRIDES: &str = "FEEDPILOT_POLICY_CLI_OVERRIDES";

const ENGINE_FIELDS: [&str; 3] = ["debounce_ms", "suppression_window_ms", "toast_duration_ms"];
const PROFILE_FIELDS: [&str; 8] = [
    "media_selector",
    "advance_method",
    "advance_key",
    "trigger_threshold_secs",
    "poll_interval_ms",
    "stuck_timeout_ms",
    "identity_source",
    "next_controls",
];

#[derive(Debug, Default)]
pub struct LoadOptions {
    pub paths: Vec<PathBuf>,
    pub include_env: bool,
    pub include_cli_env: bool,
}

impl LoadOptions {
    pub fn with_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            include_env: true,
            include_cli_env: true,
        }
    }
}

pub fn load_snapshot(path: Option<&Path>) -> Result<PolicySnapshot, PolicyError> {
    load_snapshot_with_options(&LoadOptions::with_paths(path.map(Path::to_path_buf)))
}

pub fn load_snapshot_with_options(options: &LoadOptions) -> Result<PolicySnapshot, PolicyError> {
    let mut snapshot = default_snapshot();
    record_builtin_provenance(&mut snapshot);

    for path in options.paths.iter().filter(|path| path.exists()) {
        let changed = PolicyFile::read(path)?.merge_into(&mut snapshot)?;
        debug!(path = %path.display(), changed, "applied policy file");
        snapshot.rev = snapshot.rev.saturating_add(1);
    }

    if options.include_env {
        apply_dotted(&mut snapshot, env_overrides(), PolicySource::Env)?;
    }
    if options.include_cli_env {
        let raw = env::var(ENV_CLI_OVERRIDES).unwrap_or_default();
        apply_dotted(&mut snapshot, cli_overrides(&raw), PolicySource::Cli)?;
    }

    Ok(snapshot)
}

/// Policy file contents. Absent fields keep the value from the layer below.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PolicyFile {
    engine: EngineOverrides,
    profiles: BTreeMap<Platform, ProfileOverrides>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct EngineOverrides {
    debounce_ms: Option<u64>,
    suppression_window_ms: Option<u64>,
    toast_duration_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ProfileOverrides {
    media_selector: Option<String>,
    advance_method: Option<AdvanceMethod>,
    advance_key: Option<AdvanceKey>,
    trigger_threshold_secs: Option<f64>,
    poll_interval_ms: Option<u64>,
    /// Outer `None`: key absent. `Some(None)`: explicit `null`, fallback off.
    #[serde(deserialize_with = "present")]
    stuck_timeout_ms: Option<Option<u64>>,
    identity_source: Option<IdentitySource>,
    next_controls: Option<Vec<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl PolicyFile {
    fn read(path: &Path) -> Result<Self, PolicyError> {
        let content = fs::read_to_string(path)
            .map_err(|err| PolicyError::Io(format!("{}: {err}", path.display())))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content)
            .map_err(|err| PolicyError::Invalid(format!("{}: {err}", path.display())))
    }

    /// Merge every present field and return how many values changed.
    fn merge_into(self, snapshot: &mut PolicySnapshot) -> Result<usize, PolicyError> {
        let mut changed = Vec::new();

        let engine = &mut snapshot.engine;
        let overrides = self.engine;
        take(&mut engine.debounce_ms, overrides.debounce_ms, "engine.debounce_ms", &mut changed);
        take(
            &mut engine.suppression_window_ms,
            overrides.suppression_window_ms,
            "engine.suppression_window_ms",
            &mut changed,
        );
        take(
            &mut engine.toast_duration_ms,
            overrides.toast_duration_ms,
            "engine.toast_duration_ms",
            &mut changed,
        );

        for (platform, overrides) in self.profiles {
            overrides.validate(platform)?;
            let profile = snapshot
                .profiles
                .entry(platform)
                .or_insert_with(|| builtin_profile(platform));
            let path = |field: &str| format!("profiles.{platform}.{field}");
            take(
                &mut profile.media_selector,
                overrides.media_selector,
                &path("media_selector"),
                &mut changed,
            );
            take(
                &mut profile.advance_method,
                overrides.advance_method,
                &path("advance_method"),
                &mut changed,
            );
            take(
                &mut profile.advance_key,
                overrides.advance_key,
                &path("advance_key"),
                &mut changed,
            );
            take(
                &mut profile.trigger_threshold_secs,
                overrides.trigger_threshold_secs,
                &path("trigger_threshold_secs"),
                &mut changed,
            );
            take(
                &mut profile.poll_interval_ms,
                overrides.poll_interval_ms,
                &path("poll_interval_ms"),
                &mut changed,
            );
            take(
                &mut profile.stuck_timeout_ms,
                overrides.stuck_timeout_ms,
                &path("stuck_timeout_ms"),
                &mut changed,
            );
            take(
                &mut profile.identity_source,
                overrides.identity_source,
                &path("identity_source"),
                &mut changed,
            );
            take(
                &mut profile.next_controls,
                overrides.next_controls,
                &path("next_controls"),
                &mut changed,
            );
        }

        for path in &changed {
            snapshot.set_provenance(path, PolicySource::File);
        }
        Ok(changed.len())
    }
}

impl ProfileOverrides {
    fn validate(&self, platform: Platform) -> Result<(), PolicyError> {
        if self.poll_interval_ms == Some(0) {
            return Err(PolicyError::InvalidValue(format!(
                "profiles.{platform}.poll_interval_ms must be positive"
            )));
        }
        if let Some(secs) = self.trigger_threshold_secs {
            if !secs.is_finite() || secs < 0.0 {
                return Err(PolicyError::InvalidValue(format!(
                    "profiles.{platform}.trigger_threshold_secs must be non-negative, got {secs}"
                )));
            }
        }
        Ok(())
    }
}

fn take<T: PartialEq>(target: &mut T, candidate: Option<T>, path: &str, changed: &mut Vec<String>) {
    match candidate {
        Some(value) if *target != value => {
            *target = value;
            changed.push(path.to_string());
        }
        _ => {}
    }
}

fn apply_dotted(
    snapshot: &mut PolicySnapshot,
    overrides: Vec<(String, Value)>,
    source: PolicySource,
) -> Result<(), PolicyError> {
    if overrides.is_empty() {
        return Ok(());
    }
    for (path, value) in &overrides {
        apply_override_to_snapshot(snapshot, path, value, source)?;
    }
    debug!(?source, count = overrides.len(), "applied policy overrides");
    snapshot.rev = snapshot.rev.saturating_add(1);
    Ok(())
}

/// `FEEDPILOT_POLICY__PROFILES__TIKTOK__POLL_INTERVAL_MS=200`
/// → `profiles.tiktok.poll_interval_ms = 200`.
fn env_overrides() -> Vec<(String, Value)> {
    let mut overrides: Vec<_> = env::vars()
        .filter_map(|(key, raw)| {
            let path = key
                .strip_prefix(ENV_PREFIX)?
                .split("__")
                .filter(|segment| !segment.is_empty())
                .map(str::to_ascii_lowercase)
                .collect::<Vec<_>>()
                .join(".");
            (!path.is_empty()).then(|| (path, parse_override_value(&raw)))
        })
        .collect();
    overrides.sort_by(|a, b| a.0.cmp(&b.0));
    overrides
}

/// `path=value` pairs separated by commas.
fn cli_overrides(raw: &str) -> Vec<(String, Value)> {
    raw.split(',')
        .filter_map(|token| {
            let (path, value) = token.split_once('=').unwrap_or((token, ""));
            let path = path.trim();
            (!path.is_empty()).then(|| (path.to_string(), parse_override_value(value.trim())))
        })
        .collect()
}

/// JSON when it parses, a bare string otherwise; empty means `null`.
fn parse_override_value(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn record_builtin_provenance(snapshot: &mut PolicySnapshot) {
    for field in ENGINE_FIELDS {
        snapshot.set_provenance(&format!("engine.{field}"), PolicySource::Builtin);
    }
    let platforms: Vec<Platform> = snapshot.profiles.keys().copied().collect();
    for platform in platforms {
        for field in PROFILE_FIELDS {
            snapshot.set_provenance(&format!("profiles.{platform}.{field}"), PolicySource::Builtin);
        }
    }
}
