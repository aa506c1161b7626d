use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use feedpilot_cli::Config;
use feedpilot_policy_center::{load_snapshot_with_options, LoadOptions, PolicySnapshot};
use feedpilot_state_center::LocalStore;
use tokio::sync::OnceCell;
use tracing::warn;

pub struct CliContext {
    config: Arc<Config>,
    config_path: PathBuf,
    store: OnceCell<LocalStore>,
}

impl CliContext {
    pub fn new(config: Config, config_path: PathBuf) -> Self {
        Self {
            config: Arc::new(config),
            config_path,
            store: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &Config {
        self.config.as_ref()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub async fn store(&self) -> Result<LocalStore> {
        self.store
            .get_or_try_init(|| async {
                let path = self.config.resolved_store_path();
                LocalStore::open_file(&path)
                    .with_context(|| format!("failed to open store {}", path.display()))
            })
            .await
            .map(Clone::clone)
    }

    /// Store for a running engine. An unreadable store file degrades to a
    /// process-local store so persistence never keeps the engine from starting.
    pub async fn engine_store(&self) -> LocalStore {
        match self.store().await {
            Ok(store) => store,
            Err(err) => {
                warn!("store unavailable, counters will not persist: {err:#}");
                LocalStore::in_memory()
            }
        }
    }

    /// Built-in profiles layered with the configured policy files and env overrides.
    pub fn policy(&self) -> Result<PolicySnapshot> {
        let options = LoadOptions::with_paths(self.config.policy_paths.iter().cloned());
        load_snapshot_with_options(&options).context("failed to load policy")
    }
}
