//! Pomato Timer Library
//!
//! This library provides the core functionality of the Pomato timer:
//! - Timer engine with regular countdowns and Pomodoro cycles
//! - Tick sources, alarm playback and settings behind small traits
//! - Menu bar view model (title text, menu configuration, actions)
//! - CLI command parsing, interactive session and display utilities
//! - Type definitions for settings and state

pub mod cli;
pub mod engine;
pub mod menubar;
pub mod settings;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{PomodoroPlan, SessionMode, Settings, TimerSnapshot, TimerState};

// Re-export engine types
pub use engine::{
    Clock, EngineError, MockClock, NotificationSink, RecordingSink, Tick, TickHandle,
    TimerEngine, TokioClock,
};

// Re-export menubar types
pub use menubar::{
    ChannelSink, EventHandler, IconManager, MenuAction, MenuBar, MenuBuilder, MenuConfig,
    MenuItemConfig, MenuItemId, TrayUpdate,
};

// Re-export settings types
pub use settings::{SettingsError, SettingsFile, SettingsStore};

// Re-export sound types
pub use sound::{
    try_create_player, AlarmPlayer, AlarmSound, MockAlarmPlayer, RodioAlarmPlayer,
    SilentAlarmPlayer, SoundError,
};
