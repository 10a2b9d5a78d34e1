//! Event handling for menu bar interactions.
//!
//! This module handles:
//! - Menu item identifiers and the actions they trigger
//! - Text commands typed in the interactive session
//! - Dispatching actions onto the [`TimerEngine`]
//! - The channel that carries snapshots to the display

use std::fmt;
use std::str::FromStr;

use crossbeam_channel::Sender;
use thiserror::Error;

use crate::engine::{EngineError, NotificationSink, TimerEngine};
use crate::types::{TimerSnapshot, PRESET_COUNT};

// ============================================================================
// MenuAction
// ============================================================================

/// Actions that can be triggered from the menu bar or the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Start a regular timer from a preset (0-based index)
    StartPreset(usize),
    /// Start a Pomodoro cycle
    StartPomodoro,
    /// Pause or resume
    Toggle,
    /// Reset a finished timer
    Stop,
    /// Cancel the timer
    Cancel,
    /// Restart the current segment
    Restart,
    /// Extend a paused Pomodoro and switch segment
    AddMinutes(u32),
    /// Skip the current break
    SkipBreak,
    /// Quit the application
    Quit,
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuAction::StartPreset(index) => write!(f, "{}", index + 1),
            MenuAction::StartPomodoro => write!(f, "pomodoro"),
            MenuAction::Toggle => write!(f, "toggle"),
            MenuAction::Stop => write!(f, "stop"),
            MenuAction::Cancel => write!(f, "cancel"),
            MenuAction::Restart => write!(f, "restart"),
            MenuAction::AddMinutes(minutes) => write!(f, "+{}", minutes),
            MenuAction::SkipBreak => write!(f, "skip"),
            MenuAction::Quit => write!(f, "quit"),
        }
    }
}

impl MenuAction {
    /// Returns the shortest keyboard command that parses to this action.
    pub fn key(&self) -> String {
        match self {
            MenuAction::StartPreset(index) => (index + 1).to_string(),
            MenuAction::StartPomodoro => "p".to_string(),
            MenuAction::Toggle => "t".to_string(),
            MenuAction::Stop => "s".to_string(),
            MenuAction::Cancel => "c".to_string(),
            MenuAction::Restart => "r".to_string(),
            MenuAction::AddMinutes(minutes) => format!("+{}", minutes),
            MenuAction::SkipBreak => "k".to_string(),
            MenuAction::Quit => "q".to_string(),
        }
    }

    /// Returns a human-readable description of this action.
    pub fn description(&self) -> String {
        match self {
            MenuAction::StartPreset(index) => format!("プリセット{}で開始", index + 1),
            MenuAction::StartPomodoro => "ポモドーロ開始".to_string(),
            MenuAction::Toggle => "一時停止 / 再開".to_string(),
            MenuAction::Stop => "停止".to_string(),
            MenuAction::Cancel => "キャンセル".to_string(),
            MenuAction::Restart => "最初から".to_string(),
            MenuAction::AddMinutes(minutes) => format!("{}分追加して切り替え", minutes),
            MenuAction::SkipBreak => "休憩をスキップ".to_string(),
            MenuAction::Quit => "終了".to_string(),
        }
    }
}

/// Error returned when a typed command is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("不明なコマンドです: {0}")]
pub struct ParseActionError(pub String);

impl FromStr for MenuAction {
    type Err = ParseActionError;

    /// Parses keyboard commands: `t`, `c`, `r`, `s`, `k`, `p`, `q`,
    /// `1`-`3` for presets and `+N` for extensions.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let action = match input.as_str() {
            "t" | "toggle" | "" => MenuAction::Toggle,
            "c" | "cancel" => MenuAction::Cancel,
            "r" | "restart" => MenuAction::Restart,
            "s" | "stop" => MenuAction::Stop,
            "k" | "skip" => MenuAction::SkipBreak,
            "p" | "pomo" | "pomodoro" => MenuAction::StartPomodoro,
            "q" | "quit" | "exit" => MenuAction::Quit,
            other => {
                if let Some(minutes) = other.strip_prefix('+') {
                    let minutes = minutes
                        .parse::<u32>()
                        .map_err(|_| ParseActionError(s.trim().to_string()))?;
                    MenuAction::AddMinutes(minutes)
                } else {
                    match other.parse::<usize>() {
                        Ok(n) if (1..=PRESET_COUNT).contains(&n) => MenuAction::StartPreset(n - 1),
                        _ => return Err(ParseActionError(s.trim().to_string())),
                    }
                }
            }
        };
        Ok(action)
    }
}

// ============================================================================
// MenuItemId
// ============================================================================

/// Identifiers for menu items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuItemId {
    /// Preset button (0-based index)
    Preset(usize),
    /// Pomodoro button
    Pomodoro,
    /// Start / pause button
    Toggle,
    /// Stop button of a finished timer
    Stop,
    /// Cancel button
    Cancel,
    /// Restart button
    Restart,
    /// Extension button
    AddMinutes(u32),
    /// Skip Break button
    SkipBreak,
    /// Quit menu item
    Quit,
    /// Title, status lines and anything else without an action
    Unknown,
}

impl MenuItemId {
    /// Converts a menu item ID to the corresponding action.
    pub fn to_action(&self) -> Option<MenuAction> {
        match *self {
            MenuItemId::Preset(index) => Some(MenuAction::StartPreset(index)),
            MenuItemId::Pomodoro => Some(MenuAction::StartPomodoro),
            MenuItemId::Toggle => Some(MenuAction::Toggle),
            MenuItemId::Stop => Some(MenuAction::Stop),
            MenuItemId::Cancel => Some(MenuAction::Cancel),
            MenuItemId::Restart => Some(MenuAction::Restart),
            MenuItemId::AddMinutes(minutes) => Some(MenuAction::AddMinutes(minutes)),
            MenuItemId::SkipBreak => Some(MenuAction::SkipBreak),
            MenuItemId::Quit => Some(MenuAction::Quit),
            MenuItemId::Unknown => None,
        }
    }
}

// ============================================================================
// EventHandler
// ============================================================================

/// What the caller should do after an action was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Keep running
    Continue,
    /// Leave the session
    Quit,
}

/// Turns actions into engine commands.
#[derive(Debug, Default)]
pub struct EventHandler;

impl EventHandler {
    /// Creates a new EventHandler.
    pub fn new() -> Self {
        Self
    }

    /// Runs the engine command for `action`.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the command is rejected; the timer state
    /// is unchanged in that case.
    pub fn dispatch(
        &self,
        action: MenuAction,
        engine: &mut TimerEngine,
    ) -> Result<Dispatch, EngineError> {
        let result = match action {
            MenuAction::StartPreset(index) => engine.start_regular(index),
            MenuAction::StartPomodoro => engine.start_pomodoro(),
            MenuAction::Toggle => {
                engine.toggle();
                Ok(())
            }
            MenuAction::Stop => engine.stop(),
            MenuAction::Cancel => {
                engine.cancel();
                Ok(())
            }
            MenuAction::Restart => engine.restart(),
            MenuAction::AddMinutes(minutes) => engine.add_time_and_switch_mode(minutes),
            MenuAction::SkipBreak => engine.skip_break(),
            MenuAction::Quit => return Ok(Dispatch::Quit),
        };

        self.log_action_result(&action, result.as_ref().err());
        result.map(|()| Dispatch::Continue)
    }

    /// Logs the result of an action execution.
    fn log_action_result(&self, action: &MenuAction, error: Option<&EngineError>) {
        match error {
            None => tracing::debug!(action = %action, "action executed"),
            Some(e) => tracing::debug!(action = %action, error = %e, "action rejected"),
        }
    }
}

// ============================================================================
// TrayUpdate / ChannelSink
// ============================================================================

/// Updates sent from the engine to the display.
#[derive(Debug, Clone, PartialEq)]
pub enum TrayUpdate {
    /// New timer state
    State(TimerSnapshot),
    /// Stop the display
    Shutdown,
}

/// [`NotificationSink`] that forwards snapshots over a crossbeam channel.
///
/// Sending never blocks; a disconnected receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<TrayUpdate>,
}

impl ChannelSink {
    pub fn new(tx: Sender<TrayUpdate>) -> Self {
        Self { tx }
    }
}

impl NotificationSink for ChannelSink {
    fn on_state_changed(&self, snapshot: &TimerSnapshot) {
        if self.tx.send(TrayUpdate::State(*snapshot)).is_err() {
            tracing::trace!("display channel closed");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
