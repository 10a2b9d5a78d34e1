//! Command definitions for the Pomato CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::{Settings, PRESET_COUNT};

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomato - regular timers and Pomodoro cycles in the terminal
#[derive(Parser, Debug)]
#[command(
    name = "pomato",
    version,
    about = "ポモドーロ & シンプルタイマー",
    long_about = "3つのプリセットタイマーと、作業・休憩を4回繰り返すポモドーロサイクル。\n\
                  実行中はキー入力(t, c, r, s, k, +1, +5, 1-3, p, q)で操作します。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a regular countdown from a preset
    Start(StartArgs),

    /// Run a Pomodoro cycle
    Pomodoro(PomodoroArgs),

    /// Show or change the saved settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Settings subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommand {
    /// Print the current settings
    Show,

    /// Print the settings file path
    Path,

    /// Restore the default settings
    Reset,

    /// Change one or more settings
    Set(SetArgs),

    /// Play the alarm sound once to check the volume
    TestSound(TestSoundArgs),
}

// ============================================================================
// Start / Pomodoro Arguments
// ============================================================================

/// Arguments for the start command
#[derive(Args, Debug, Clone, Default)]
pub struct StartArgs {
    /// Preset to run (1-3)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u8).range(1..=3)
    )]
    pub preset: Option<u8>,

    /// Disable the alarm sound
    #[arg(long)]
    pub no_sound: bool,
}

impl StartArgs {
    /// Returns the 0-based preset index (first preset by default).
    pub fn preset_index(&self) -> usize {
        self.preset.map_or(0, |p| usize::from(p) - 1)
    }
}

/// Arguments for the pomodoro command
///
/// Overrides apply to this run only and are not saved.
#[derive(Args, Debug, Clone, Default)]
pub struct PomodoroArgs {
    /// Work duration in minutes (1-120)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=120)
    )]
    pub work: Option<u32>,

    /// Short break duration in minutes (1-60)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub break_time: Option<u32>,

    /// Long break duration in minutes (1-60)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub long_break: Option<u32>,

    /// Disable the alarm sound
    #[arg(long)]
    pub no_sound: bool,
}

impl PomodoroArgs {
    /// Applies the overrides on top of the saved settings.
    pub fn apply(&self, settings: Settings) -> Settings {
        let mut settings = settings;
        if let Some(work) = self.work {
            settings = settings.with_work_minutes(work);
        }
        if let Some(break_time) = self.break_time {
            settings = settings.with_break_minutes(break_time);
        }
        if let Some(long_break) = self.long_break {
            settings = settings.with_long_break_minutes(long_break);
        }
        settings
    }
}

// ============================================================================
// Settings Set Arguments
// ============================================================================

/// Arguments for `settings set`
#[derive(Args, Debug, Clone, Default)]
pub struct SetArgs {
    /// Preset durations in minutes, comma separated (e.g. 5,10,15)
    #[arg(long, value_delimiter = ',', value_parser = clap::value_parser!(u32).range(1..=120))]
    pub presets: Option<Vec<u32>>,

    /// Pomodoro work duration in minutes (1-120)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=120))]
    pub work: Option<u32>,

    /// Pomodoro short break in minutes (1-60)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=60))]
    pub break_time: Option<u32>,

    /// Pomodoro long break in minutes (1-60)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=60))]
    pub long_break: Option<u32>,

    /// Alarm volume (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub volume: Option<u8>,

    /// Alarm sound file (looped until stopped)
    #[arg(long, value_name = "PATH")]
    pub sound: Option<PathBuf>,

    /// Go back to the built-in beep
    #[arg(long, conflicts_with = "sound")]
    pub beep: bool,
}

/// Arguments for `settings test-sound`
#[derive(Args, Debug, Clone, Default)]
pub struct TestSoundArgs {
    /// Volume to try instead of the saved one (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub volume: Option<u8>,
}

impl TestSoundArgs {
    /// Returns the volume to play at.
    pub fn volume_or(&self, settings: &Settings) -> u8 {
        self.volume.unwrap_or(settings.alarm_volume)
    }
}

impl SetArgs {
    /// Returns true if no option was given.
    pub fn is_empty(&self) -> bool {
        self.presets.is_none()
            && self.work.is_none()
            && self.break_time.is_none()
            && self.long_break.is_none()
            && self.volume.is_none()
            && self.sound.is_none()
            && !self.beep
    }

    /// Applies the given options to `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error message if `--presets` does not have exactly three
    /// values.
    pub fn apply(&self, settings: Settings) -> Result<Settings, String> {
        let mut settings = settings;

        if let Some(presets) = &self.presets {
            let presets: [u32; PRESET_COUNT] = presets.as_slice().try_into().map_err(|_| {
                format!(
                    "プリセットは{}つ指定してください (例: 5,10,15)",
                    PRESET_COUNT
                )
            })?;
            settings = settings.with_presets(presets);
        }
        if let Some(work) = self.work {
            settings = settings.with_work_minutes(work);
        }
        if let Some(break_time) = self.break_time {
            settings = settings.with_break_minutes(break_time);
        }
        if let Some(long_break) = self.long_break {
            settings = settings.with_long_break_minutes(long_break);
        }
        if let Some(volume) = self.volume {
            settings = settings.with_alarm_volume(volume);
        }
        if let Some(sound) = &self.sound {
            settings.alarm_sound = Some(sound.clone());
        }
        if self.beep {
            settings.alarm_sound = None;
        }

        Ok(settings)
    }
}

// ============================================================================
// Tests
// ============================================================================
