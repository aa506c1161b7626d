use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Browser launch settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CdpConfig {
    /// Chrome/Chromium binary; empty means auto-detect.
    #[serde(default)]
    pub executable: PathBuf,
    #[serde(default)]
    pub headless: bool,
    /// Profile directory so logins survive restarts.
    #[serde(default = "default_user_data_dir")]
    pub user_data_dir: PathBuf,
    #[serde(default)]
    pub no_sandbox: bool,
    #[serde(default = "default_deadline_ms")]
    pub default_deadline_ms: u64,
    #[serde(default = "default_launch_timeout_ms")]
    pub launch_timeout_ms: u64,
}

fn default_user_data_dir() -> PathBuf {
    PathBuf::from(".feedpilot-profile")
}

fn default_deadline_ms() -> u64 {
    10_000
}

fn default_launch_timeout_ms() -> u64 {
    20_000
}

impl Default for CdpConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::new(),
            headless: false,
            user_data_dir: default_user_data_dir(),
            no_sandbox: false,
            default_deadline_ms: default_deadline_ms(),
            launch_timeout_ms: default_launch_timeout_ms(),
        }
    }
}

impl CdpConfig {
    /// Defaults overlaid with `FEEDPILOT_CHROME` and `FEEDPILOT_DISABLE_SANDBOX`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(path) = std::env::var("FEEDPILOT_CHROME") {
            if !path.trim().is_empty() {
                cfg.executable = PathBuf::from(path.trim());
            }
        }
        cfg.no_sandbox = std::env::var("FEEDPILOT_DISABLE_SANDBOX")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        cfg
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.default_deadline_ms)
    }

    pub fn launch_timeout(&self) -> Duration {
        Duration::from_millis(self.launch_timeout_ms)
    }
}
