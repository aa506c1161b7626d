//! Local key-value storage shared by the engine and the CLI.
//!
//! Layout:
//! - `enabled` → bool; absent means enabled
//! - `analytics_YYYY-MM-DD` → `{ "<platform>": n, ..., "total": n }`

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use feedpilot_core_types::{FeedError, Platform};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{to_writer_pretty, Map, Value};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

pub const ENABLED_KEY: &str = "enabled";
const ANALYTICS_PREFIX: &str = "analytics_";
const TOTAL_FIELD: &str = "total";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("store file {path} is not a JSON object: {message}")]
    Corrupt { path: PathBuf, message: String },
}

impl From<StoreError> for FeedError {
    fn from(value: StoreError) -> Self {
        FeedError::new(value.to_string())
    }
}

/// Storage key holding the counters for `date`.
pub fn analytics_key(date: NaiveDate) -> String {
    format!("{ANALYTICS_PREFIX}{}", date.format("%Y-%m-%d"))
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Process-local store; contents are lost on exit.
#[derive(Default)]
pub struct InMemoryStore {
    entries: DashMap<String, Value>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store persisted as one pretty-printed JSON object.
///
/// The whole object is rewritten on every `set`; there is a single writer
/// per process.
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<Map<String, Value>>,
}

impl JsonFileStore {
    /// Open `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Arc<Self>, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => Map::new(),
            Ok(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => map,
                Ok(other) => {
                    return Err(StoreError::Corrupt {
                        path,
                        message: format!("found {}", type_name(&other)),
                    })
                }
                Err(err) => {
                    return Err(StoreError::Corrupt {
                        path,
                        message: err.to_string(),
                    })
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Map::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Arc::new(Self {
            path,
            entries: Mutex::new(entries),
        }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the whole object to a sibling temp file, then rename it over the store.
    fn write_snapshot(&self, entries: &Map<String, Value>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(io_err)?;
                parent.to_path_buf()
            }
            None => PathBuf::from("."),
        };
        let mut staged = NamedTempFile::new_in(&dir).map_err(io_err)?;
        {
            let mut writer = BufWriter::new(staged.as_file_mut());
            to_writer_pretty(&mut writer, entries).map_err(|err| io_err(err.into()))?;
            writer.write_all(b"\n").map_err(io_err)?;
            writer.flush().map_err(io_err)?;
        }
        staged.as_file().sync_all().map_err(io_err)?;
        staged.persist(&self.path).map_err(|err| io_err(err.error))?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value);
        self.write_snapshot(&entries)?;
        debug!(key, path = %self.path.display(), "store written");
        Ok(())
    }
}

/// Counters for one calendar day.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DailyAnalytics {
    pub date: String,
    pub total: u64,
    pub per_platform: BTreeMap<String, u64>,
}

/// Typed access to the settings and counters.
#[derive(Clone)]
pub struct LocalStore {
    backend: Arc<dyn KeyValueStore>,
}

impl LocalStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(InMemoryStore::new())
    }

    pub fn open_file(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store: Arc<dyn KeyValueStore> = JsonFileStore::open(path)?;
        Ok(Self::new(store))
    }

    /// Anything other than an explicit `false` counts as enabled.
    pub async fn get_enabled(&self) -> Result<bool, StoreError> {
        let value = self.backend.get(ENABLED_KEY).await?;
        Ok(!matches!(value, Some(Value::Bool(false))))
    }

    pub async fn set_enabled(&self, enabled: bool) -> Result<(), StoreError> {
        self.backend.set(ENABLED_KEY, Value::Bool(enabled)).await
    }

    /// Read-modify-write of the day's counters. Not atomic across processes.
    pub async fn increment_count(&self, platform: Platform, date: NaiveDate) -> Result<(), StoreError> {
        let key = analytics_key(date);
        let mut analytics = match self.backend.get(&key).await? {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        bump(&mut analytics, platform.as_str());
        bump(&mut analytics, TOTAL_FIELD);
        self.backend.set(&key, Value::Object(analytics)).await
    }

    pub async fn daily_analytics(&self, date: NaiveDate) -> Result<DailyAnalytics, StoreError> {
        let mut result = DailyAnalytics {
            date: date.format("%Y-%m-%d").to_string(),
            ..DailyAnalytics::default()
        };
        if let Some(Value::Object(map)) = self.backend.get(&analytics_key(date)).await? {
            for (field, value) in map {
                let count = value.as_u64().unwrap_or(0);
                if field == TOTAL_FIELD {
                    result.total = count;
                } else {
                    result.per_platform.insert(field, count);
                }
            }
        }
        Ok(result)
    }
}

fn bump(map: &mut Map<String, Value>, field: &str) {
    let current = map.get(field).and_then(Value::as_u64).unwrap_or(0);
    map.insert(field.to_string(), Value::from(current + 1));
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[tokio::test]
    async fn enabled_defaults_to_true() {
        let store = LocalStore::in_memory();
        assert!(store.get_enabled().await.unwrap());
        store.set_enabled(false).await.unwrap();
        assert!(!store.get_enabled().await.unwrap());
        store.set_enabled(true).await.unwrap();
        assert!(store.get_enabled().await.unwrap());
    }

    #[tokio::test]
    async fn counters_keyed_by_day_and_platform() {
        let store = LocalStore::in_memory();
        store.increment_count(Platform::YouTube, day()).await.unwrap();
        store.increment_count(Platform::YouTube, day()).await.unwrap();
        store.increment_count(Platform::Reddit, day()).await.unwrap();
        let next_day = day().succ_opt().unwrap();
        store.increment_count(Platform::TikTok, next_day).await.unwrap();

        let analytics = store.daily_analytics(day()).await.unwrap();
        assert_eq!(analytics.date, "2024-03-09");
        assert_eq!(analytics.total, 3);
        assert_eq!(analytics.per_platform.get("youtube"), Some(&2));
        assert_eq!(analytics.per_platform.get("reddit"), Some(&1));
        assert!(analytics.per_platform.get("tiktok").is_none());
    }

    #[tokio::test]
    async fn empty_day_has_zero_total() {
        let store = LocalStore::in_memory();
        let analytics = store.daily_analytics(day()).await.unwrap();
        assert_eq!(analytics.total, 0);
        assert!(analytics.per_platform.is_empty());
    }

    #[tokio::test]
    async fn file_store_persists_across_reopen() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("store.json");

        let store = LocalStore::open_file(&path).unwrap();
        store.set_enabled(false).await.unwrap();
        store.increment_count(Platform::Instagram, day()).await.unwrap();

        let raw = std::fs::read_to_string(&path).expect("read store");
        assert!(raw.contains("\"analytics_2024-03-09\""));
        assert!(raw.contains("\"enabled\": false"));

        let reopened = LocalStore::open_file(&path).unwrap();
        assert!(!reopened.get_enabled().await.unwrap());
        assert_eq!(reopened.daily_analytics(day()).await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn rewrite_replaces_truncated_file_without_leftovers() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{}").expect("seed");

        let store = LocalStore::open_file(&path).unwrap();
        store.set_enabled(false).await.unwrap();
        store.increment_count(Platform::YouTube, day()).await.unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .expect("list")
            .map(|entry| entry.expect("entry").file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("store.json")]);
        let raw = std::fs::read_to_string(&path).expect("read store");
        let parsed: Value = serde_json::from_str(&raw).expect("complete json");
        assert_eq!(parsed["enabled"], Value::Bool(false));
    }

    #[test]
    fn truncated_file_is_corrupt() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{\"enabled\": tru").expect("write");
        let err = JsonFileStore::open(&path).err().expect("corrupt");
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn non_object_file_is_corrupt() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("store.json");
        std::fs::write(&path, "[1, 2]").expect("write");
        let err = JsonFileStore::open(&path).err().expect("corrupt");
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }
}
