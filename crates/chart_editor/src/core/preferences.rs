//! Editor preferences.
//!
//! Persistent settings that survive editor restarts, stored as TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::EventDelivery;

/// Errors loading or saving preferences
#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("Preferences I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed preferences file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Editor preferences and settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorPreferences {
    /// Undo depth, 0 for unbounded
    pub max_history: usize,

    /// `log` level filter: error, warn, info, debug or trace
    pub log_level: String,

    /// Bin width of the note density graph in milliseconds
    pub density_bin_ms: u32,

    /// `immediate` or `deferred` (delivered once per frame)
    pub event_delivery: EventDelivery,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            max_history: 100,
            log_level: "info".to_string(),
            density_bin_ms: 1000,
            event_delivery: EventDelivery::Immediate,
        }
    }
}

impl EditorPreferences {
    /// Load preferences from a file.
    pub fn load(path: &Path) -> Result<Self, PreferencesError> {
        let content = std::fs::read_to_string(path)?;
        let preferences = toml::from_str(&content)?;
        log::info!("Loaded preferences from {:?}", path);
        Ok(preferences)
    }

    /// Load preferences, falling back to defaults if the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, PreferencesError> {
        match Self::load(path) {
            Err(PreferencesError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No preferences at {:?}, using defaults", path);
                Ok(Self::default())
            }
            result => result,
        }
    }

    /// Save preferences to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        log::info!("Saved preferences to {:?}", path);
        Ok(())
    }

    /// Get the default preferences path.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("chart_editor");
            p.push("preferences.toml");
            p
        })
    }

    /// Parsed `log_level`, `Info` if unrecognised.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
