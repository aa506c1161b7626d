use std::str::FromStr;

use feedpilot_core_types::Platform;
use serde_json::Value;

use crate::errors::PolicyError;
use crate::model::{
    AdvanceKey, AdvanceMethod, IdentitySource, PlatformProfile, PolicySnapshot, PolicySource,
};
use crate::registry::builtin_profile;

/// Apply one dotted-path override to `snapshot`, recording provenance when the
/// value actually changed.
pub fn apply_override_to_snapshot(
    snapshot: &mut PolicySnapshot,
    path: &str,
    value: &Value,
    source: PolicySource,
) -> Result<(), PolicyError> {
    let changed = match path {
        "engine.debounce_ms" => merge(&mut snapshot.engine.debounce_ms, to_u64(value)?),
        "engine.suppression_window_ms" => merge(
            &mut snapshot.engine.suppression_window_ms,
            to_u64(value)?,
        ),
        "engine.toast_duration_ms" => {
            merge(&mut snapshot.engine.toast_duration_ms, to_u64(value)?)
        }
        other => match other.strip_prefix("profiles.") {
            Some(rest) => apply_profile_override(snapshot, rest, value, path)?,
            None => return Err(PolicyError::UnsupportedPath(path.to_string())),
        },
    };
    if changed {
        snapshot.set_provenance(path, source);
    }
    Ok(())
}

fn apply_profile_override(
    snapshot: &mut PolicySnapshot,
    rest: &str,
    value: &Value,
    full_path: &str,
) -> Result<bool, PolicyError> {
    let Some((platform_name, field)) = rest.split_once('.') else {
        return Err(PolicyError::UnsupportedPath(full_path.to_string()));
    };
    let platform = Platform::from_str(platform_name)
        .map_err(|_| PolicyError::UnsupportedPath(full_path.to_string()))?;
    let profile: &mut PlatformProfile = snapshot
        .profiles
        .entry(platform)
        .or_insert_with(|| builtin_profile(platform));

    let changed = match field {
        "media_selector" => merge(&mut profile.media_selector, to_string(value)?),
        "advance_method" => merge(
            &mut profile.advance_method,
            AdvanceMethod::from_str(&to_string(value)?)?,
        ),
        "advance_key" => merge(
            &mut profile.advance_key,
            AdvanceKey::from_str(&to_string(value)?)?,
        ),
        "trigger_threshold_secs" => {
            merge(&mut profile.trigger_threshold_secs, to_seconds(value)?)
        }
        "poll_interval_ms" => merge(&mut profile.poll_interval_ms, to_positive_u64(value)?),
        "stuck_timeout_ms" => {
            let candidate = if value.is_null() {
                None
            } else {
                Some(to_u64(value)?)
            };
            merge(&mut profile.stuck_timeout_ms, candidate)
        }
        "identity_source" => merge(
            &mut profile.identity_source,
            IdentitySource::from_str(&to_string(value)?)?,
        ),
        "next_controls" => merge(&mut profile.next_controls, to_string_list(value)?),
        _ => return Err(PolicyError::UnsupportedPath(full_path.to_string())),
    };
    Ok(changed)
}

fn merge<T: PartialEq>(target: &mut T, candidate: T) -> bool {
    if *target == candidate {
        return false;
    }
    *target = candidate;
    true
}

fn to_u64(value: &Value) -> Result<u64, PolicyError> {
    value
        .as_u64()
        .ok_or_else(|| PolicyError::InvalidValue(format!("expected integer, got {value}")))
}

fn to_positive_u64(value: &Value) -> Result<u64, PolicyError> {
    match to_u64(value)? {
        0 => Err(PolicyError::InvalidValue(
            "poll interval must be positive".to_string(),
        )),
        v => Ok(v),
    }
}

fn to_seconds(value: &Value) -> Result<f64, PolicyError> {
    value
        .as_f64()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| {
            PolicyError::InvalidValue(format!("expected non-negative seconds, got {value}"))
        })
}

fn to_string(value: &Value) -> Result<String, PolicyError> {
    value
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| PolicyError::InvalidValue(format!("expected string, got {value}")))
}

fn to_string_list(value: &Value) -> Result<Vec<String>, PolicyError> {
    match value {
        Value::Array(items) => items.iter().map(to_string).collect(),
        Value::String(single) => Ok(single
            .split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()),
        other => Err(PolicyError::InvalidValue(format!(
            "expected selector list, got {other}"
        ))),
    }
}
