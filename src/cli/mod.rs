//! CLI module for the Pomato timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `session`: Interactive session that owns the timer engine
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod display;
pub mod session;

pub use commands::{
    Cli, Commands, PomodoroArgs, SetArgs, SettingsCommand, StartArgs, TestSoundArgs,
};
pub use display::Display;
