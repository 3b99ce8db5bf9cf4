//! Persisted client settings: API base URL and the optional SerpAPI key.
//!
//! Backed by a small key/value store. The file store keeps a flat JSON
//! object on disk and rewrites it on every `set`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::fs;
use tokio::sync::RwLock;

use crate::config::DEFAULT_API_BASE;
use crate::error::SettingsError;

/// Settings keys.
pub mod settings_keys {
    pub const API_BASE: &str = "apiBase";
    pub const SERP_KEY: &str = "serpKey";
}

/// Simple get/set persistence.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_setting(&self, key: &str) -> Result<Option<String>, SettingsError>;

    async fn set_setting(&self, key: &str, value: &str) -> Result<(), SettingsError>;
}

/// In-memory store, for tests and throwaway sessions.
#[derive(Default)]
pub struct MemorySettingsStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get_setting(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set_setting(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON-file store.
pub struct FileSettingsStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl FileSettingsStore {
    /// Open the store, reading existing values. A missing file is an empty store.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path).await {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| SettingsError::Corrupt {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), keys = values.len(), "Settings loaded");
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, values: &BTreeMap<String, String>) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn get_setting(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set_setting(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        let mut values = self.values.write().await;
        values.insert(key.to_string(), value.to_string());
        self.flush(&values).await
    }
}

/// The settings the wizard reads at start-up.
#[derive(Debug)]
pub struct Settings {
    pub api_base: String,
    /// Client-held SerpAPI key; `None` when unset or empty.
    pub serp_key: Option<SecretString>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            serp_key: None,
        }
    }
}

impl Settings {
    /// Read from the store, using defaults for absent or empty keys.
    pub async fn load(store: &dyn SettingsStore) -> Result<Self, SettingsError> {
        let api_base = store
            .get_setting(settings_keys::API_BASE)
            .await?
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let serp_key = store
            .get_setting(settings_keys::SERP_KEY)
            .await?
            .filter(|v| !v.trim().is_empty())
            .map(SecretString::from);
        Ok(Self { api_base, serp_key })
    }

    /// Apply a save from the user: an empty base URL keeps the current one,
    /// an empty key clears it.
    pub fn update(&mut self, api_base: Option<&str>, serp_key: Option<&str>) {
        if let Some(base) = api_base.map(str::trim).filter(|b| !b.is_empty()) {
            self.api_base = base.to_string();
        }
        if let Some(key) = serp_key {
            let key = key.trim();
            self.serp_key = (!key.is_empty()).then(|| SecretString::from(key.to_string()));
        }
    }

    /// Write both keys.
    pub async fn save(&self, store: &dyn SettingsStore) -> Result<(), SettingsError> {
        store
            .set_setting(settings_keys::API_BASE, &self.api_base)
            .await?;
        let key = self
            .serp_key
            .as_ref()
            .map(|k| k.expose_secret())
            .unwrap_or_default();
        store.set_setting(settings_keys::SERP_KEY, key).await?;
        tracing::info!(api_base = %self.api_base, has_key = self.serp_key.is_some(), "Settings saved");
        Ok(())
    }
}
