//! Built-in platform profiles.
//!
//! The registry is a pure function: every identifier maps to a profile and an
//! unrecognised platform falls back to the default (YouTube-style) profile.

use feedpilot_core_types::Platform;

use crate::model::{AdvanceKey, AdvanceMethod, IdentitySource, PlatformProfile};

const VIDEO_SELECTOR: &str = "video";
const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

const TIKTOK_NEXT_CONTROLS: [&str; 3] = [
    r#"[data-e2e="arrow-right"]"#,
    r#"[aria-label*="next"]"#,
    r#"button[aria-label*="Next"]"#,
];

pub fn builtin_profile(platform: Platform) -> PlatformProfile {
    match platform {
        Platform::YouTube | Platform::Unknown => default_profile(),
        Platform::Instagram => PlatformProfile {
            advance_key: AdvanceKey::ArrowRight,
            trigger_threshold_secs: 0.2,
            stuck_timeout_ms: Some(5_000),
            identity_source: IdentitySource::MediaOrPageAddress,
            ..default_profile()
        },
        Platform::TikTok => PlatformProfile {
            advance_method: AdvanceMethod::PlatformSpecific,
            next_controls: TIKTOK_NEXT_CONTROLS
                .iter()
                .map(|selector| selector.to_string())
                .collect(),
            ..default_profile()
        },
        Platform::Facebook => PlatformProfile {
            trigger_threshold_secs: 0.2,
            stuck_timeout_ms: Some(8_000),
            ..default_profile()
        },
        Platform::Reddit => PlatformProfile {
            trigger_threshold_secs: 0.2,
            ..default_profile()
        },
    }
}

fn default_profile() -> PlatformProfile {
    PlatformProfile {
        media_selector: VIDEO_SELECTOR.to_string(),
        advance_method: AdvanceMethod::SimulatedKey,
        advance_key: AdvanceKey::ArrowDown,
        trigger_threshold_secs: 0.1,
        poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        stuck_timeout_ms: None,
        identity_source: IdentitySource::Media,
        next_controls: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_platform_uses_default_profile() {
        assert_eq!(
            builtin_profile(Platform::Unknown),
            builtin_profile(Platform::YouTube)
        );
    }

    #[test]
    fn only_instagram_and_facebook_have_stuck_fallback() {
        for platform in Platform::ALL {
            let expected = match platform {
                Platform::Instagram => Some(5_000),
                Platform::Facebook => Some(8_000),
                _ => None,
            };
            assert_eq!(builtin_profile(platform).stuck_timeout_ms, expected);
        }
    }

    #[test]
    fn tiktok_clicks_next_controls() {
        let profile = builtin_profile(Platform::TikTok);
        assert_eq!(profile.advance_method, AdvanceMethod::PlatformSpecific);
        assert_eq!(profile.next_controls.len(), 3);
        assert_eq!(profile.next_controls[0], r#"[data-e2e="arrow-right"]"#);
    }

    #[test]
    fn instagram_advances_sideways() {
        let profile = builtin_profile(Platform::Instagram);
        assert_eq!(profile.advance_key, AdvanceKey::ArrowRight);
        assert_eq!(profile.identity_source, IdentitySource::MediaOrPageAddress);
    }
}
