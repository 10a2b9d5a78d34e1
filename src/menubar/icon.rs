//! Title and label generation for the menu bar display.
//!
//! This module handles:
//! - Formatting remaining time for display (e.g., "24:59")
//! - Generating the menu bar title (e.g., "🍅 24:59")
//! - Mode, session and progress labels for the floating display
//!
//! Everything here is a pure function of a [`TimerSnapshot`].

use crate::types::{SessionMode, TimerSnapshot, SESSIONS_PER_CYCLE};

// ============================================================================
// Constants
// ============================================================================

/// Emoji for work segments
const WORK_EMOJI: &str = "🍅";

/// Emoji for break segments
const BREAK_EMOJI: &str = "☕";

/// Prefix for a paused Pomodoro
const PAUSED_PREFIX: &str = "⏸";

/// Completed session marker
const SESSION_DONE: char = '●';

/// Pending session marker
const SESSION_PENDING: char = '○';

// ============================================================================
// Formatting helpers
// ============================================================================

/// Formats seconds as `M:SS`.
///
/// Minutes are not zero-padded and are not capped at 59.
///
/// # Examples
///
/// ```
/// use pomato::menubar::icon::format_duration;
///
/// assert_eq!(format_duration(300), "5:00");
/// assert_eq!(format_duration(3725), "62:05");
/// ```
pub fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Returns the emoji for a Pomodoro mode, if any.
pub fn mode_emoji(mode: SessionMode) -> Option<&'static str> {
    if mode.is_work() {
        Some(WORK_EMOJI)
    } else if mode.is_break() {
        Some(BREAK_EMOJI)
    } else {
        None
    }
}

/// Label of the Pomodoro button: what the running segment is, or "pomo".
pub fn mode_label(snapshot: &TimerSnapshot) -> &'static str {
    if snapshot.is_running && snapshot.mode.is_work() {
        "work"
    } else if snapshot.is_running && snapshot.mode.is_break() {
        "break"
    } else {
        "pomo"
    }
}

/// "Session n/4" while in a Pomodoro mode.
pub fn session_label(snapshot: &TimerSnapshot) -> Option<String> {
    snapshot.mode.is_pomodoro().then(|| {
        format!(
            "Session {}/{}",
            snapshot.pomodoro_session, SESSIONS_PER_CYCLE
        )
    })
}

/// One dot per session in the cycle, filled up to the current session.
pub fn session_dots(snapshot: &TimerSnapshot) -> String {
    (1..=SESSIONS_PER_CYCLE)
        .map(|n| {
            if n <= snapshot.pomodoro_session {
                SESSION_DONE
            } else {
                SESSION_PENDING
            }
        })
        .collect()
}

/// Progress as a whole percentage (0-100).
pub fn progress_percent(snapshot: &TimerSnapshot) -> u8 {
    (snapshot.progress() * 100.0).round().clamp(0.0, 100.0) as u8
}

// ============================================================================
// IconManager
// ============================================================================

/// Generates the menu bar title and tracks mode changes.
#[derive(Debug, Default)]
pub struct IconManager {
    /// Last mode passed to `mode_changed`
    last_mode: Option<SessionMode>,
}

impl IconManager {
    /// Creates a new IconManager.
    pub fn new() -> Self {
        Self { last_mode: None }
    }

    /// Generates the title text for the menu bar.
    ///
    /// Format:
    /// - Work / extra: "🍅 M:SS"
    /// - Short / long break: "☕ M:SS"
    /// - Idle / regular: "M:SS"
    ///
    /// A paused Pomodoro gets a "⏸ " prefix.
    pub fn generate_title(&self, snapshot: &TimerSnapshot) -> String {
        let time = format_duration(snapshot.time_remaining);
        let title = match mode_emoji(snapshot.mode) {
            Some(emoji) => format!("{} {}", emoji, time),
            None => time,
        };

        if snapshot.mode.is_pomodoro() && !snapshot.is_running {
            format!("{} {}", PAUSED_PREFIX, title)
        } else {
            title
        }
    }

    /// Checks if the mode has changed since the last call.
    pub fn mode_changed(&mut self, mode: SessionMode) -> bool {
        let changed = self.last_mode != Some(mode);
        if changed {
            self.last_mode = Some(mode);
        }
        changed
    }
}

// ============================================================================
// Tests
// ============================================================================
