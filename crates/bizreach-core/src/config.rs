//! BizReach configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ReachError, Result};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReachConfig {
    /// Install the default communication methods into an empty store.
    #[serde(default = "bool_true")]
    pub seed_defaults: bool,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub reminder: ReminderConfig,
}

fn bool_true() -> bool { true }

impl Default for ReachConfig {
    fn default() -> Self {
        Self {
            seed_defaults: true,
            schedule: ScheduleConfig::default(),
            storage: StorageConfig::default(),
            reminder: ReminderConfig::default(),
        }
    }
}

impl ReachConfig {
    /// Load config from the default path (~/.bizreach/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ReachError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| ReachError::Config(format!("Failed to parse config: {e}")))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| ReachError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the BizReach home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".bizreach")
    }

    /// Snapshot location with `~` expanded.
    pub fn storage_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.storage.path).to_string())
    }
}

/// How "due today" is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DueTodayRule {
    /// Whole days elapsed since the last communication equal the periodicity.
    #[default]
    ElapsedDays,
    /// The UTC calendar date of `last + periodicity` is today's date.
    CalendarDate,
}

/// Cadence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_periodicity")]
    pub default_periodicity_days: u32,
    #[serde(default)]
    pub due_today_rule: DueTodayRule,
    /// How many past communications the dashboard shows per company.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

fn default_periodicity() -> u32 { 14 }
fn default_recent_limit() -> usize { 5 }

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            default_periodicity_days: default_periodicity(),
            due_today_rule: DueTodayRule::default(),
            recent_limit: default_recent_limit(),
        }
    }
}

/// Storage backend for snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Json,
    Sqlite,
}

/// Snapshot storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_storage_path")]
    pub path: String,
    #[serde(default = "bool_true")]
    pub auto_save: bool,
}

fn default_storage_path() -> String { "~/.bizreach/data.json".into() }

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
            auto_save: true,
        }
    }
}

/// Reminder loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,
    /// Notifications kept in the in-memory history ring buffer.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_check_interval() -> u64 { 3600 }
fn default_history_limit() -> usize { 100 }

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: default_check_interval(),
            history_limit: default_history_limit(),
        }
    }
}
