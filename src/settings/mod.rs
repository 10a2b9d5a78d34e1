//! Settings access for the timer engine.
//!
//! The engine only reads settings through [`SettingsStore`]. Persistence is
//! handled by [`SettingsFile`], which stores [`Settings`] as JSON under the
//! platform config directory.

mod error;
mod file;

pub use error::{Result, SettingsError};
pub use file::{default_path, SettingsFile};

use crate::types::{Settings, PRESET_COUNT};

/// Read-only settings source consumed by the engine.
///
/// All durations are minutes.
pub trait SettingsStore {
    /// The three regular timer presets.
    fn regular_presets(&self) -> [u32; PRESET_COUNT];

    /// Pomodoro work duration.
    fn pomodoro_work_minutes(&self) -> u32;

    /// Short break duration.
    fn pomodoro_break_minutes(&self) -> u32;

    /// Long break duration.
    fn pomodoro_long_break_minutes(&self) -> u32;

    /// Alarm volume (0-100).
    fn alarm_volume(&self) -> u8;
}

impl SettingsStore for Settings {
    fn regular_presets(&self) -> [u32; PRESET_COUNT] {
        self.timer_presets
    }

    fn pomodoro_work_minutes(&self) -> u32 {
        self.pomodoro_work_duration
    }

    fn pomodoro_break_minutes(&self) -> u32 {
        self.pomodoro_break_duration
    }

    fn pomodoro_long_break_minutes(&self) -> u32 {
        self.pomodoro_long_break_duration
    }

    fn alarm_volume(&self) -> u8 {
        self.alarm_volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_as_store() {
        let settings = Settings::default()
            .with_presets([1, 2, 3])
            .with_work_minutes(40)
            .with_alarm_volume(90);
        let store: &dyn SettingsStore = &settings;

        assert_eq!(store.regular_presets(), [1, 2, 3]);
        assert_eq!(store.pomodoro_work_minutes(), 40);
        assert_eq!(store.pomodoro_break_minutes(), 5);
        assert_eq!(store.pomodoro_long_break_minutes(), 15);
        assert_eq!(store.alarm_volume(), 90);
    }
}
