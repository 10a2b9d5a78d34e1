//! Core data types for the Pomato timer.
//!
//! This module defines the data structures used for:
//! - Session modes and the mutable timer state
//! - Immutable snapshots published to the presentation layer
//! - User settings with validation

use serde::{Deserialize, Serialize};

/// Number of work sessions in one Pomodoro cycle.
pub const SESSIONS_PER_CYCLE: u32 = 4;

/// Number of regular-timer preset slots.
pub const PRESET_COUNT: usize = 3;

/// Converts a configured duration in minutes to seconds.
#[must_use]
pub const fn minutes_to_seconds(minutes: u32) -> u32 {
    minutes.saturating_mul(60)
}

// ============================================================================
// SessionMode
// ============================================================================

/// The kind of segment the timer is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// No session has been started (or the last one was cancelled)
    #[default]
    Idle,
    /// Plain countdown from one of the presets
    Regular,
    /// Pomodoro work segment
    PomodoroWork,
    /// Short Pomodoro break
    PomodoroBreak,
    /// Long Pomodoro break (after the 4th work segment)
    PomodoroLongBreak,
    /// Manually extended work segment entered from a break
    PomodoroExtra,
}

impl SessionMode {
    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Idle => "idle",
            SessionMode::Regular => "regular",
            SessionMode::PomodoroWork => "pomodoro_work",
            SessionMode::PomodoroBreak => "pomodoro_break",
            SessionMode::PomodoroLongBreak => "pomodoro_long_break",
            SessionMode::PomodoroExtra => "pomodoro_extra",
        }
    }

    /// Returns true for every Pomodoro variant.
    pub fn is_pomodoro(&self) -> bool {
        matches!(
            self,
            SessionMode::PomodoroWork
                | SessionMode::PomodoroBreak
                | SessionMode::PomodoroLongBreak
                | SessionMode::PomodoroExtra
        )
    }

    /// Returns true for short and long breaks.
    pub fn is_break(&self) -> bool {
        matches!(
            self,
            SessionMode::PomodoroBreak | SessionMode::PomodoroLongBreak
        )
    }

    /// Returns true for work-flavoured Pomodoro segments.
    pub fn is_work(&self) -> bool {
        matches!(self, SessionMode::PomodoroWork | SessionMode::PomodoroExtra)
    }
}

impl std::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Settings
// ============================================================================

fn default_timer_presets() -> [u32; PRESET_COUNT] {
    [5, 10, 15]
}

fn default_work_duration() -> u32 {
    25
}

fn default_break_duration() -> u32 {
    5
}

fn default_long_break_duration() -> u32 {
    15
}

fn default_alarm_volume() -> u8 {
    25
}

/// User settings for the timer.
///
/// All durations are minutes. Every field has a serde default so that a
/// partially written settings file still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Regular timer presets in minutes (1-120 each)
    #[serde(default = "default_timer_presets")]
    pub timer_presets: [u32; PRESET_COUNT],
    /// Pomodoro work duration in minutes (1-120)
    #[serde(default = "default_work_duration")]
    pub pomodoro_work_duration: u32,
    /// Short break duration in minutes (1-60)
    #[serde(default = "default_break_duration")]
    pub pomodoro_break_duration: u32,
    /// Long break duration in minutes (1-60)
    #[serde(default = "default_long_break_duration")]
    pub pomodoro_long_break_duration: u32,
    /// Alarm volume (0-100)
    #[serde(default = "default_alarm_volume")]
    pub alarm_volume: u8,
    /// Optional audio file played as the alarm instead of the built-in beep
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alarm_sound: Option<std::path::PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timer_presets: default_timer_presets(),
            pomodoro_work_duration: default_work_duration(),
            pomodoro_break_duration: default_break_duration(),
            pomodoro_long_break_duration: default_long_break_duration(),
            alarm_volume: default_alarm_volume(),
            alarm_sound: None,
        }
    }
}

impl Settings {
    /// Returns the settings with the given regular presets.
    pub fn with_presets(mut self, presets: [u32; PRESET_COUNT]) -> Self {
        self.timer_presets = presets;
        self
    }

    /// Returns the settings with the given work duration.
    pub fn with_work_minutes(mut self, minutes: u32) -> Self {
        self.pomodoro_work_duration = minutes;
        self
    }

    /// Returns the settings with the given short break duration.
    pub fn with_break_minutes(mut self, minutes: u32) -> Self {
        self.pomodoro_break_duration = minutes;
        self
    }

    /// Returns the settings with the given long break duration.
    pub fn with_long_break_minutes(mut self, minutes: u32) -> Self {
        self.pomodoro_long_break_duration = minutes;
        self
    }

    /// Returns the settings with the given alarm volume.
    pub fn with_alarm_volume(mut self, volume: u8) -> Self {
        self.alarm_volume = volume;
        self
    }

    /// Validates the settings.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        for (index, preset) in self.timer_presets.iter().enumerate() {
            if *preset < 1 || *preset > 120 {
                return Err(format!(
                    "プリセット{}は1-120分の範囲で指定してください",
                    index + 1
                ));
            }
        }
        if self.pomodoro_work_duration < 1 || self.pomodoro_work_duration > 120 {
            return Err("作業時間は1-120分の範囲で指定してください".to_string());
        }
        if self.pomodoro_break_duration < 1 || self.pomodoro_break_duration > 60 {
            return Err("休憩時間は1-60分の範囲で指定してください".to_string());
        }
        if self.pomodoro_long_break_duration < 1 || self.pomodoro_long_break_duration > 60 {
            return Err("長い休憩時間は1-60分の範囲で指定してください".to_string());
        }
        if self.alarm_volume > 100 {
            return Err("アラーム音量は0-100の範囲で指定してください".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// PomodoroPlan
// ============================================================================

/// Segment lengths captured when a Pomodoro cycle starts, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroPlan {
    pub work_minutes: u32,
    pub break_minutes: u32,
    pub long_break_minutes: u32,
}

impl Default for PomodoroPlan {
    fn default() -> Self {
        Self {
            work_minutes: default_work_duration(),
            break_minutes: default_break_duration(),
            long_break_minutes: default_long_break_duration(),
        }
    }
}

impl PomodoroPlan {
    /// Work segment length in seconds.
    pub fn work_seconds(&self) -> u32 {
        minutes_to_seconds(self.work_minutes)
    }

    /// Break length in seconds for the given session ordinal.
    ///
    /// The 4th session is followed by the long break.
    pub fn break_seconds(&self, session: u32) -> u32 {
        if session == SESSIONS_PER_CYCLE {
            minutes_to_seconds(self.long_break_minutes)
        } else {
            minutes_to_seconds(self.break_minutes)
        }
    }

    /// Break mode for the given session ordinal.
    pub fn break_mode(&self, session: u32) -> SessionMode {
        if session == SESSIONS_PER_CYCLE {
            SessionMode::PomodoroLongBreak
        } else {
            SessionMode::PomodoroBreak
        }
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// The mutable timer state owned by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Seconds left in the current segment
    pub time_remaining: u32,
    /// Length of the current segment in seconds
    pub total_duration: u32,
    /// Current session mode
    pub mode: SessionMode,
    /// Whether the countdown is ticking
    pub is_running: bool,
    /// Work session ordinal within the cycle (1-4)
    pub pomodoro_session: u32,
    /// Index of the regular preset to reset to
    pub selected_preset_index: usize,
    /// Set when the cycle was manually extended; suppresses the next increment
    #[serde(default)]
    pub(crate) extra: bool,
    /// Durations captured at Pomodoro start
    #[serde(default)]
    pub(crate) plan: PomodoroPlan,
}

impl TimerState {
    /// Creates a new idle state holding the given segment length.
    pub fn new(initial_seconds: u32) -> Self {
        Self {
            time_remaining: initial_seconds,
            total_duration: initial_seconds,
            mode: SessionMode::Idle,
            is_running: false,
            pomodoro_session: 1,
            selected_preset_index: 0,
            extra: false,
            plan: PomodoroPlan::default(),
        }
    }

    /// Loads a fresh segment of the given length.
    pub fn load_segment(&mut self, mode: SessionMode, seconds: u32) {
        self.mode = mode;
        self.total_duration = seconds;
        self.time_remaining = seconds;
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns true if the countdown has reached 0.
    pub fn tick(&mut self) -> bool {
        if self.time_remaining > 0 {
            self.time_remaining -= 1;
        }
        self.time_remaining == 0
    }

    /// Returns true when the countdown finished and nobody reset it yet.
    pub fn is_finished(&self) -> bool {
        !self.is_running && self.time_remaining == 0
    }

    /// Returns true if the current cycle was manually extended.
    pub fn is_extra(&self) -> bool {
        self.extra
    }

    /// Returns the Pomodoro durations in effect.
    pub fn plan(&self) -> PomodoroPlan {
        self.plan
    }

    /// Leaves Pomodoro bookkeeping.
    pub(crate) fn reset_cycle(&mut self) {
        self.pomodoro_session = 1;
        self.extra = false;
    }

    /// Returns an immutable snapshot for observers.
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            time_remaining: self.time_remaining,
            total_duration: self.total_duration,
            mode: self.mode,
            is_running: self.is_running,
            pomodoro_session: self.pomodoro_session,
        }
    }
}

// ============================================================================
// TimerSnapshot
// ============================================================================

/// State published to the presentation layer after every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub time_remaining: u32,
    pub total_duration: u32,
    pub mode: SessionMode,
    pub is_running: bool,
    pub pomodoro_session: u32,
}

impl TimerSnapshot {
    /// Elapsed fraction of the segment, from 0.0 to 1.0.
    pub fn progress(&self) -> f64 {
        if self.total_duration == 0 {
            return 1.0;
        }
        1.0 - f64::from(self.time_remaining) / f64::from(self.total_duration)
    }

    /// Returns true while a Pomodoro segment is shown.
    pub fn is_pomodoro(&self) -> bool {
        self.mode.is_pomodoro()
    }

    /// Returns true when paused with no time left.
    pub fn is_finished(&self) -> bool {
        !self.is_running && self.time_remaining == 0
    }
}

// ============================================================================
// Tests
// ============================================================================
