//! Alarm playback for the Pomato timer.
//!
//! The engine talks to audio only through [`AlarmPlayer`]: `play` when a
//! countdown reaches zero, `stop` whenever a new segment starts. `preview`
//! plays the sound once so the volume can be checked from the settings.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   AlarmPlayer    │ ← Engine-facing interface
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │ RodioAlarmPlayer │────▶│ Audio file       │
//! │                  │     │ (looped)         │
//! │                  │     ├──────────────────┤
//! │                  │────▶│ Synthesized beep │
//! └──────────────────┘     │ (fallback)       │
//!                          └──────────────────┘
//! ```

mod error;
mod player;
mod source;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub use error::SoundError;
pub use player::{try_create_player, RodioAlarmPlayer};
pub use source::{volume_to_gain, AlarmSound};

/// Trait for alarm playback implementations.
pub trait AlarmPlayer {
    /// Starts the alarm at the given volume (0-100).
    ///
    /// This method must not block; the alarm plays in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, volume: u8) -> Result<(), SoundError>;

    /// Plays the alarm sound once, without looping.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn preview(&self, volume: u8) -> Result<(), SoundError>;

    /// Silences the alarm. Does nothing if it is not playing.
    fn stop(&self);

    /// Returns true while the alarm is audible.
    fn is_playing(&self) -> bool;
}

impl AlarmPlayer for RodioAlarmPlayer {
    fn play(&self, volume: u8) -> Result<(), SoundError> {
        RodioAlarmPlayer::play(self, volume)
    }

    fn preview(&self, volume: u8) -> Result<(), SoundError> {
        RodioAlarmPlayer::preview(self, volume)
    }

    fn stop(&self) {
        RodioAlarmPlayer::stop(self)
    }

    fn is_playing(&self) -> bool {
        RodioAlarmPlayer::is_playing(self)
    }
}

impl<T: AlarmPlayer + ?Sized> AlarmPlayer for Arc<T> {
    fn play(&self, volume: u8) -> Result<(), SoundError> {
        (**self).play(volume)
    }

    fn preview(&self, volume: u8) -> Result<(), SoundError> {
        (**self).preview(volume)
    }

    fn stop(&self) {
        (**self).stop()
    }

    fn is_playing(&self) -> bool {
        (**self).is_playing()
    }
}

/// Alarm player that never makes a sound, used when no audio device exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAlarmPlayer;

impl AlarmPlayer for SilentAlarmPlayer {
    fn play(&self, _volume: u8) -> Result<(), SoundError> {
        Ok(())
    }

    fn preview(&self, _volume: u8) -> Result<(), SoundError> {
        Ok(())
    }

    fn stop(&self) {}

    fn is_playing(&self) -> bool {
        false
    }
}

/// Mock alarm player for testing.
#[derive(Debug, Default)]
pub struct MockAlarmPlayer {
    play_calls: Mutex<Vec<u8>>,
    preview_calls: Mutex<Vec<u8>>,
    stop_calls: AtomicUsize,
    playing: AtomicBool,
    should_fail: AtomicBool,
}

impl MockAlarmPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Number of `play` calls that succeeded.
    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap().len()
    }

    /// Volumes passed to successful `play` calls.
    #[must_use]
    pub fn get_play_calls(&self) -> Vec<u8> {
        self.play_calls.lock().unwrap().clone()
    }

    /// Volumes passed to successful `preview` calls.
    #[must_use]
    pub fn get_preview_calls(&self) -> Vec<u8> {
        self.preview_calls.lock().unwrap().clone()
    }

    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    pub fn clear_calls(&self) {
        self.play_calls.lock().unwrap().clear();
        self.preview_calls.lock().unwrap().clear();
        self.stop_calls.store(0, Ordering::SeqCst);
    }
}

impl AlarmPlayer for MockAlarmPlayer {
    fn play(&self, volume: u8) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.play_calls.lock().unwrap().push(volume);
        self.playing.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Records the call; the preview counts as already finished.
    fn preview(&self, volume: u8) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.preview_calls.lock().unwrap().push(volume);
        Ok(())
    }

    fn stop(&self) {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.playing.store(false, Ordering::SeqCst);
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}
