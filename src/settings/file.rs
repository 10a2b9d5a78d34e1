//! JSON file persistence for [`Settings`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{Result, SettingsError};
use crate::types::Settings;

/// Directory name under the platform config directory.
const APP_DIR_NAME: &str = "pomato";

/// Settings file name.
const SETTINGS_FILE_NAME: &str = "settings.json";

/// A settings file at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    /// Creates a handle for the settings file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a handle for the default location
    /// (`<config_dir>/pomato/settings.json`).
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::NoConfigDir` if the platform has no config directory.
    pub fn at_default_path() -> Result<Self> {
        Ok(Self::new(default_path()?))
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and validates the settings.
    ///
    /// A missing file yields the default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or holds
    /// out-of-range values.
    pub fn load(&self) -> Result<Settings> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "settings file not found, using defaults");
                return Ok(Settings::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let settings: Settings =
            serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
                path: self.path.clone(),
                source,
            })?;
        settings.validate().map_err(SettingsError::Invalid)?;

        debug!(path = %self.path.display(), "settings loaded");
        Ok(settings)
    }

    /// Validates and writes the settings, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or the file cannot be written.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        settings.validate().map_err(SettingsError::Invalid)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(settings).map_err(|source| {
            SettingsError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, json).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

/// Returns the default settings file path.
///
/// # Errors
///
/// Returns `SettingsError::NoConfigDir` if the platform has no config directory.
pub fn default_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
    Ok(config_dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
}
