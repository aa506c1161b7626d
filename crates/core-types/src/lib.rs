use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Shared error type for the feedpilot crates.
#[derive(Debug, Error, Clone)]
pub enum FeedError {
    #[error("{message}")]
    Message { message: String },
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),
}

impl FeedError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

/// Media-feed site the engine is attached to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    YouTube,
    Instagram,
    TikTok,
    Facebook,
    Reddit,
    Unknown,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::YouTube,
        Platform::Instagram,
        Platform::TikTok,
        Platform::Facebook,
        Platform::Reddit,
        Platform::Unknown,
    ];

    const HOSTS: [(&'static str, Platform); 5] = [
        ("youtube.com", Platform::YouTube),
        ("instagram.com", Platform::Instagram),
        ("tiktok.com", Platform::TikTok),
        ("facebook.com", Platform::Facebook),
        ("reddit.com", Platform::Reddit),
    ];

    /// Identify the platform from a page address. Unparsable addresses and
    /// unrecognised hosts both map to [`Platform::Unknown`].
    pub fn detect(page_address: &str) -> Self {
        let Ok(parsed) = Url::parse(page_address) else {
            return Platform::Unknown;
        };
        let Some(host) = parsed.host_str() else {
            return Platform::Unknown;
        };
        Self::HOSTS
            .iter()
            .find(|(needle, _)| host.contains(needle))
            .map(|(_, platform)| *platform)
            .unwrap_or(Platform::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::YouTube => "youtube",
            Platform::Instagram => "instagram",
            Platform::TikTok => "tiktok",
            Platform::Facebook => "facebook",
            Platform::Reddit => "reddit",
            Platform::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Platform::ALL
            .iter()
            .copied()
            .find(|platform| platform.as_str() == needle)
            .ok_or(FeedError::UnknownPlatform(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_matches_known_hosts() {
        assert_eq!(
            Platform::detect("https://www.youtube.com/shorts/abc"),
            Platform::YouTube
        );
        assert_eq!(
            Platform::detect("https://www.instagram.com/reels/xyz/"),
            Platform::Instagram
        );
        assert_eq!(
            Platform::detect("https://m.tiktok.com/foryou"),
            Platform::TikTok
        );
        assert_eq!(
            Platform::detect("https://web.facebook.com/reel/1"),
            Platform::Facebook
        );
        assert_eq!(
            Platform::detect("https://old.reddit.com/r/videos"),
            Platform::Reddit
        );
    }

    #[test]
    fn detect_falls_back_to_unknown() {
        assert_eq!(Platform::detect("https://example.org/"), Platform::Unknown);
        assert_eq!(Platform::detect("not a url"), Platform::Unknown);
        assert_eq!(Platform::detect("about:blank"), Platform::Unknown);
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), platform);
        }
        assert!("myspace".parse::<Platform>().is_err());
    }
}
