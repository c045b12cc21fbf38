use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Env var pointing at the settings file.
pub const SETTINGS_PATH_ENV: &str = "DETECTION_MONITOR_SETTINGS";
const DEFAULT_SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    pub database_path: PathBuf,
    /// Pause between replayed demo detections.
    pub replay_interval_ms: u64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("detections.sqlite3"),
            replay_interval_ms: 0,
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: MonitorSettings,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(
                    "Ignoring malformed settings in {}: {err}; using defaults",
                    path.display()
                );
                MonitorSettings::default()
            })
        } else {
            MonitorSettings::default()
        };

        Ok(Self { path, data })
    }

    /// Load from `$DETECTION_MONITOR_SETTINGS`, falling back to
    /// `settings.json` in the working directory.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var_os(SETTINGS_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> MonitorSettings {
        self.data.clone()
    }
}
