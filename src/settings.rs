use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{PoisonError, RwLock},
};

use crate::{log_warn, models::ContentType};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Preselected on the timer at startup.
    pub default_content_type: ContentType,
    pub tick_interval_ms: u64,
    pub heartbeat_every_ticks: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_content_type: ContentType::Reading,
            tick_interval_ms: 1000,
            heartbeat_every_ticks: 10,
        }
    }
}

/// Settings persisted as pretty JSON next to the database.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<AppSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log_warn!(
                    "Ignoring unreadable settings at {}: {err}",
                    path.display()
                );
                AppSettings::default()
            })
        } else {
            AppSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn get(&self) -> AppSettings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn update(&self, settings: AppSettings) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: AppSettings = serde_json::from_str(&contents)?;
        *self.data.write().unwrap_or_else(PoisonError::into_inner) = data;
        Ok(())
    }

    fn persist(&self, data: &AppSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.get(), AppSettings::default());
    }

    #[test]
    fn updates_are_written_and_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = SettingsStore::new(path.clone()).unwrap();

        let updated = AppSettings {
            default_content_type: ContentType::Review,
            ..AppSettings::default()
        };
        store.update(updated.clone()).unwrap();

        let reopened = SettingsStore::new(path).unwrap();
        assert_eq!(reopened.get(), updated);
        reopened.reload().unwrap();
        assert_eq!(reopened.get().default_content_type, ContentType::Review);
    }

    #[test]
    fn partial_and_corrupt_files_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        fs::write(&path, r#"{"tickIntervalMs": 250}"#).unwrap();
        let partial = SettingsStore::new(path.clone()).unwrap().get();
        assert_eq!(partial.tick_interval_ms, 250);
        assert_eq!(partial.heartbeat_every_ticks, 10);

        fs::write(&path, "not json").unwrap();
        assert_eq!(SettingsStore::new(path).unwrap().get(), AppSettings::default());
    }
}
