//! On-disk configuration.
//!
//! Paths default to the XDG base directories. A missing config file is not
//! an error; `load_or_default` falls back to the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{JournalError, Result};
use crate::fs::write_atomic;

const APP_DIR: &str = "journal";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalConfig {
    pub storage: StorageSection,
    #[serde(default)]
    pub export: ExportSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSection {
    pub data_dir: String,
    #[serde(default = "default_database_file")]
    pub database_file: String,
    #[serde(default = "default_preferences_file")]
    pub preferences_file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExportSection {
    /// Defaults to `<data_dir>/exports`
    pub output_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_database_file() -> String {
    "journal.db".to_string()
}

fn default_preferences_file() -> String {
    "preferences.toml".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl JournalConfig {
    /// Configuration rooted at `data_dir`, with every other value defaulted.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            storage: StorageSection {
                data_dir: data_dir.as_ref().to_string_lossy().to_string(),
                database_file: default_database_file(),
                preferences_file: default_preferences_file(),
            },
            export: ExportSection::default(),
            logging: LoggingSection::default(),
        }
    }

    /// Configuration rooted at the XDG data directory.
    pub fn default_paths() -> Result<Self> {
        Ok(Self::new(xdg_data_dir()?))
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.storage.data_dir)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.database_file)
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.preferences_file)
    }

    pub fn export_dir(&self) -> PathBuf {
        match &self.export.output_dir {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => self.data_dir().join("exports"),
        }
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn read_config(path: &Path) -> Result<JournalConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        JournalError::Config(format!("Failed to read config {}: {}", path.display(), e))
    })?;
    toml::from_str(&contents).map_err(|e| {
        JournalError::Config(format!("Failed to parse config {}: {}", path.display(), e))
    })
}

/// Read `path` if it exists, otherwise return the XDG defaults.
pub fn load_or_default(path: &Path) -> Result<JournalConfig> {
    if path.exists() {
        read_config(path)
    } else {
        JournalConfig::default_paths()
    }
}

pub fn write_config(path: &Path, config: &JournalConfig) -> Result<()> {
    let contents = toml::to_string_pretty(config)?;
    write_atomic(path, contents.as_bytes())
}

pub fn xdg_config_dir() -> Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join(APP_DIR));
        }
    }
    Ok(home_dir()?.join(".config").join(APP_DIR))
}

pub fn xdg_data_dir() -> Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join(APP_DIR));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join(APP_DIR))
}

fn home_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").map_err(|_| {
        JournalError::Config("HOME is not set; cannot resolve default paths".to_string())
    })?;
    Ok(PathBuf::from(home))
}
