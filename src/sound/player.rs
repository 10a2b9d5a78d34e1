//! Alarm player implementation using rodio.
//!
//! This module provides the `RodioAlarmPlayer` which uses the rodio v0.20
//! audio library. The alarm loops until `stop` is called; a preview plays
//! the same sound once.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use rodio::source::SineWave;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::{
    volume_to_gain, AlarmSound, BEEP_FREQUENCY_HZ, BEEP_PULSE_MS, PREVIEW_BEEPS,
};

/// An alarm player that uses rodio for audio playback.
///
/// Playback is non-blocking. Only one alarm plays at a time; starting a new
/// one replaces the previous sink.
pub struct RodioAlarmPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
    /// Sound to play on completion.
    sound: AlarmSound,
    /// Sink of the alarm currently playing.
    current: Mutex<Option<Sink>>,
}

impl RodioAlarmPlayer {
    /// Creates a new alarm player.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new(sound: AlarmSound) -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!(sound = %sound.name(), "Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
            sound,
            current: Mutex::new(None),
        })
    }

    /// Starts the looping alarm at the given volume (0-100).
    ///
    /// A file that cannot be opened or decoded falls back to the beep.
    ///
    /// # Errors
    ///
    /// Returns an error if no sink can be created on the output stream.
    pub fn play(&self, volume: u8) -> Result<(), SoundError> {
        self.start(volume, true)
    }

    /// Plays the alarm sound once at the given volume (0-100).
    ///
    /// `is_playing` stays true until the sound has ended.
    ///
    /// # Errors
    ///
    /// Returns an error if no sink can be created on the output stream.
    pub fn preview(&self, volume: u8) -> Result<(), SoundError> {
        self.start(volume, false)
    }

    fn start(&self, volume: u8, looped: bool) -> Result<(), SoundError> {
        self.stop();

        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| SoundError::StreamError(e.to_string()))?;
        sink.set_volume(volume_to_gain(volume));

        match &self.sound {
            AlarmSound::File { path } => {
                let opened = if looped {
                    open_looped(path).map(|decoder| sink.append(decoder))
                } else {
                    open_once(path).map(|decoder| sink.append(decoder))
                };
                match opened {
                    Ok(()) => debug!("Playing alarm file: {}", path.display()),
                    Err(e) => {
                        warn!("{}, falling back to beep ({})", e, e.suggestion());
                        append_beep(&sink, looped);
                    }
                }
            }
            AlarmSound::Beep => append_beep(&sink, looped),
        }

        let mut current = self
            .current
            .lock()
            .map_err(|e| SoundError::PlaybackError(e.to_string()))?;
        *current = Some(sink);

        debug!(volume, looped, "Alarm playback started");
        Ok(())
    }

    /// Stops the alarm if one is playing.
    pub fn stop(&self) {
        if let Ok(mut current) = self.current.lock() {
            if let Some(sink) = current.take() {
                sink.stop();
                debug!("Alarm playback stopped");
            }
        }
    }

    /// Returns true while an alarm is audible.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.current
            .lock()
            .map(|current| current.as_ref().is_some_and(|sink| !sink.empty()))
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for RodioAlarmPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioAlarmPlayer")
            .field("sound", &self.sound)
            .finish_non_exhaustive()
    }
}

/// Opens an audio file as an endlessly looping decoder.
fn open_looped(path: &Path) -> Result<rodio::decoder::LoopedDecoder<BufReader<File>>, SoundError> {
    let file = File::open(path)
        .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;
    Decoder::new_looped(BufReader::new(file)).map_err(|e| SoundError::DecodeError(e.to_string()))
}

/// Opens an audio file for a single pass.
fn open_once(path: &Path) -> Result<Decoder<BufReader<File>>, SoundError> {
    let file = File::open(path)
        .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;
    Decoder::new(BufReader::new(file)).map_err(|e| SoundError::DecodeError(e.to_string()))
}

/// Builds the synthesized beep: one pulse of silence, one pulse of tone, repeated.
fn beep() -> impl Source<Item = f32> + Send + 'static {
    let pulse = Duration::from_millis(BEEP_PULSE_MS);
    SineWave::new(BEEP_FREQUENCY_HZ)
        .take_duration(pulse)
        .amplify(0.5)
        .delay(pulse)
        .repeat_infinite()
}

fn append_beep(sink: &Sink, looped: bool) {
    if looped {
        sink.append(beep());
    } else {
        sink.append(beep_once());
    }
}

/// A few pulses of the beep, then silence.
fn beep_once() -> impl Source<Item = f32> + Send + 'static {
    let pulse = Duration::from_millis(BEEP_PULSE_MS);
    beep().take_duration(pulse * 2 * PREVIEW_BEEPS)
}

/// Creates an alarm player, returning None if audio is unavailable.
///
/// If audio initialization fails, a warning is logged and None is returned.
#[must_use]
pub fn try_create_player(sound: AlarmSound) -> Option<RodioAlarmPlayer> {
    match RodioAlarmPlayer::new(sound) {
        Ok(player) => Some(player),
        Err(e) => {
            warn!("Audio not available, alarm disabled: {} ({})", e, e.suggestion());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: These tests return early in environments without audio hardware
    // (e.g., CI containers).

    #[test]
    fn test_play_then_stop() {
        let player = match RodioAlarmPlayer::new(AlarmSound::Beep) {
            Ok(p) => p,
            Err(_) => return,
        };

        if player.play(10).is_ok() {
            assert!(player.is_playing());
            player.stop();
            assert!(!player.is_playing());
        }
    }

    #[test]
    fn test_missing_file_falls_back() {
        let player = match RodioAlarmPlayer::new(AlarmSound::file("/nonexistent/alarm.mp3")) {
            Ok(p) => p,
            Err(_) => return,
        };

        let _ = player.play(10);
        player.stop();
    }

    #[test]
    fn test_preview_then_stop() {
        let player = match RodioAlarmPlayer::new(AlarmSound::Beep) {
            Ok(p) => p,
            Err(_) => return,
        };

        if player.preview(10).is_ok() {
            assert!(player.is_playing());
            player.stop();
            assert!(!player.is_playing());
        }
    }

    #[test]
    fn test_open_missing_file() {
        let result = open_looped(Path::new("/nonexistent/alarm.mp3"));
        assert!(matches!(result, Err(SoundError::FileNotFound(_))));

        let result = open_once(Path::new("/nonexistent/alarm.mp3"));
        assert!(matches!(result, Err(SoundError::FileNotFound(_))));
    }

    #[test]
    fn test_open_undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alarm.mp3");
        std::fs::write(&path, b"not audio").unwrap();

        assert!(matches!(open_once(&path), Err(SoundError::DecodeError(_))));
    }

    #[test]
    fn test_debug_impl() {
        let player = match RodioAlarmPlayer::new(AlarmSound::Beep) {
            Ok(p) => p,
            Err(_) => return,
        };

        let debug_str = format!("{:?}", player);
        assert!(debug_str.contains("RodioAlarmPlayer"));
    }

    #[test]
    fn test_try_create_player_no_panic() {
        let _ = try_create_player(AlarmSound::Beep);
    }
}
