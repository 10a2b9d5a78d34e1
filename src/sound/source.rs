//! Alarm sound selection.
//!
//! The alarm is either a user-supplied audio file or a beep synthesized at
//! playback time, so the binary never depends on a bundled asset.

use std::path::{Path, PathBuf};

/// Beep frequency in Hz.
pub const BEEP_FREQUENCY_HZ: f32 = 880.0;

/// Length of one beep (and of the pause after it) in milliseconds.
pub const BEEP_PULSE_MS: u64 = 300;

/// Number of beeps in a preview.
pub const PREVIEW_BEEPS: u32 = 3;

/// Represents the sound played when a countdown reaches zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AlarmSound {
    /// Synthesized repeating beep.
    #[default]
    Beep,
    /// An audio file decoded by rodio and looped.
    File {
        /// The full path to the sound file.
        path: PathBuf,
    },
}

impl AlarmSound {
    /// Creates a file-backed alarm sound.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// Selects the sound for an optional configured path.
    #[must_use]
    pub fn from_setting(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::file(path),
            None => Self::Beep,
        }
    }

    /// Returns a short human-readable name.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Beep => "beep".to_string(),
            Self::File { path } => path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }
}

/// Converts a 0-100 volume into rodio's linear gain.
#[must_use]
pub fn volume_to_gain(volume: u8) -> f32 {
    f32::from(volume.min(100)) / 100.0
}
