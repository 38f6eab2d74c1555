//! User configuration and preferences

use crate::debounce::DEFAULT_SEARCH_DELAY;
use crate::error::{MedReportsError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UserConfig {
    /// Whether the welcome dialog has been shown
    pub welcome_shown: bool,
    /// Overrides the default `~/MedicalReports` location
    pub base_directory: Option<PathBuf>,
    /// Quiet period before a search is applied, in milliseconds
    pub search_delay_ms: u64,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            welcome_shown: false,
            base_directory: None,
            search_delay_ms: DEFAULT_SEARCH_DELAY.as_millis() as u64,
        }
    }
}

impl UserConfig {
    /// Get the config file path (~/.config/medreports/config.json)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("medreports").join("config.json"))
    }

    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }

    /// Load config from file, or create default if doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path().ok_or_else(|| {
            MedReportsError::Config("Could not determine config directory".to_string())
        })?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            MedReportsError::Config(format!("Failed to read config file: {}", e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            MedReportsError::Config(format!("Failed to parse config file: {}", e))
        })
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or_else(|| {
            MedReportsError::Config("Could not determine config directory".to_string())
        })?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                MedReportsError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            MedReportsError::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, contents).map_err(|e| {
            MedReportsError::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }
}
