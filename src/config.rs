use std::path::PathBuf;

use cdp_adapter::CdpConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration file contents.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Store file holding the enabled flag and daily counters.
    pub store_path: Option<PathBuf>,
    /// Policy YAML files layered over the built-in profiles, in order.
    pub policy_paths: Vec<PathBuf>,
    pub browser: CdpConfig,
}

impl Config {
    /// Configured store path, else `<data_local_dir>/feedpilot/store.json`.
    pub fn resolved_store_path(&self) -> PathBuf {
        if let Some(path) = &self.store_path {
            return path.clone();
        }
        match dirs::data_local_dir() {
            Some(mut dir) => {
                dir.push("feedpilot");
                dir.push("store.json");
                dir
            }
            None => PathBuf::from(".feedpilot/store.json"),
        }
    }
}
