//! Timer engine for the Pomato timer.
//!
//! This module provides the session state machine:
//! - Regular countdowns from the three presets
//! - Pomodoro cycles (4 work segments, short breaks, long break after the 4th)
//! - Manual extensions and break skipping
//! - Alarm on completion and snapshot publishing after every change
//!
//! Segment completions never chain automatically: after a work or break
//! segment reaches zero the engine loads the next segment and waits paused
//! until the user starts it.

use tracing::{debug, info, trace, warn};

use super::clock::{Clock, Tick, TickHandle, TICK_INTERVAL};
use super::error::EngineError;
use super::NotificationSink;
use crate::settings::SettingsStore;
use crate::sound::AlarmPlayer;
use crate::types::{
    minutes_to_seconds, PomodoroPlan, SessionMode, TimerSnapshot, TimerState, PRESET_COUNT,
    SESSIONS_PER_CYCLE,
};

/// Result type for engine commands.
pub type Result<T> = std::result::Result<T, EngineError>;

// ============================================================================
// TimerEngine
// ============================================================================

/// Single authoritative owner of the timer state.
///
/// All commands are synchronous. The owner must serialize them with ticks
/// (see `cli::session`); the engine itself holds no locks.
pub struct TimerEngine {
    /// Current timer state
    state: TimerState,
    /// Configured durations and volume
    settings: Box<dyn SettingsStore>,
    /// Source of periodic ticks
    clock: Box<dyn Clock>,
    /// Alarm played on completion
    alarm: Box<dyn AlarmPlayer>,
    /// Receiver of state snapshots
    sink: Box<dyn NotificationSink>,
    /// Registration of the running countdown
    ticker: Option<Box<dyn TickHandle>>,
    /// Generation of the last registration
    generation: u64,
}

impl TimerEngine {
    /// Creates an idle engine holding the first preset's duration.
    pub fn new(
        settings: Box<dyn SettingsStore>,
        clock: Box<dyn Clock>,
        alarm: Box<dyn AlarmPlayer>,
        sink: Box<dyn NotificationSink>,
    ) -> Self {
        let initial = minutes_to_seconds(settings.regular_presets()[0]);
        Self {
            state: TimerState::new(initial),
            settings,
            clock,
            alarm,
            sink,
            ticker: None,
            generation: 0,
        }
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Starts a regular countdown from the preset at `preset_index`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the index is out of range or the preset
    /// is 0 minutes.
    pub fn start_regular(&mut self, preset_index: usize) -> Result<()> {
        let seconds = self.preset_seconds(preset_index)?;

        self.stop_countdown();
        self.state.reset_cycle();
        self.state.selected_preset_index = preset_index;
        self.state.load_segment(SessionMode::Regular, seconds);
        self.start_countdown();

        info!(preset = preset_index, seconds, "regular timer started");
        self.publish();
        Ok(())
    }

    /// Starts a Pomodoro cycle at work session 1.
    ///
    /// The work and break lengths are read from the settings once and kept
    /// for the whole cycle.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if any configured duration is 0 minutes.
    pub fn start_pomodoro(&mut self) -> Result<()> {
        let plan = PomodoroPlan {
            work_minutes: self.settings.pomodoro_work_minutes(),
            break_minutes: self.settings.pomodoro_break_minutes(),
            long_break_minutes: self.settings.pomodoro_long_break_minutes(),
        };
        if plan.work_minutes == 0 || plan.break_minutes == 0 || plan.long_break_minutes == 0 {
            return Err(EngineError::InvalidArgument(
                "ポモドーロの各時間は1分以上にしてください".to_string(),
            ));
        }

        self.stop_countdown();
        self.state.plan = plan;
        self.state.reset_cycle();
        self.state
            .load_segment(SessionMode::PomodoroWork, plan.work_seconds());
        self.start_countdown();

        info!(
            work = plan.work_minutes,
            short_break = plan.break_minutes,
            long_break = plan.long_break_minutes,
            "pomodoro started"
        );
        self.publish();
        Ok(())
    }

    /// Switches a paused Pomodoro to the other segment kind, extended by
    /// `minutes`, and starts it.
    ///
    /// From a break this enters `PomodoroExtra` (work length + `minutes`).
    /// From work it enters the break due for the current session
    /// (break length + `minutes`). The cycle is marked as extended, so the
    /// next break completion does not advance the session counter.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for 0 minutes and `InvalidTransition` unless
    /// paused in a Pomodoro mode.
    pub fn add_time_and_switch_mode(&mut self, minutes: u32) -> Result<()> {
        if minutes == 0 {
            return Err(EngineError::InvalidArgument(
                "追加する時間は1分以上にしてください".to_string(),
            ));
        }
        let mode = self.state.mode;
        if !mode.is_pomodoro() || self.state.is_running {
            return Err(EngineError::InvalidTransition {
                command: "add_time_and_switch_mode",
                mode,
            });
        }

        let plan = self.state.plan;
        let session = self.state.pomodoro_session;
        let extra_seconds = minutes_to_seconds(minutes);
        if mode.is_break() {
            self.state.load_segment(
                SessionMode::PomodoroExtra,
                plan.work_seconds().saturating_add(extra_seconds),
            );
        } else {
            self.state.load_segment(
                plan.break_mode(session),
                plan.break_seconds(session).saturating_add(extra_seconds),
            );
        }
        self.state.extra = true;
        self.start_countdown();

        info!(from = %mode, to = %self.state.mode, minutes, "segment extended");
        self.publish();
        Ok(())
    }

    /// Ends the current break and starts the next work segment.
    ///
    /// The session counter advances (4 wraps to 1) unless the cycle was
    /// manually extended.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless in a short or long break.
    pub fn skip_break(&mut self) -> Result<()> {
        let mode = self.state.mode;
        if !mode.is_break() {
            return Err(EngineError::InvalidTransition {
                command: "skip_break",
                mode,
            });
        }

        self.stop_countdown();
        if !self.state.extra {
            self.state.pomodoro_session = next_session(self.state.pomodoro_session);
        }
        self.state.extra = false;
        let work_seconds = self.state.plan.work_seconds();
        self.state
            .load_segment(SessionMode::PomodoroWork, work_seconds);
        self.start_countdown();

        info!(session = self.state.pomodoro_session, "break skipped");
        self.publish();
        Ok(())
    }

    /// Applies the Pomodoro transition for a segment that reached zero.
    ///
    /// `tick` calls this automatically; it is public for front ends that
    /// drive completion themselves.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside Pomodoro modes or while time is left.
    pub fn handle_completion(&mut self) -> Result<()> {
        let mode = self.state.mode;
        if !mode.is_pomodoro() || self.state.time_remaining != 0 {
            return Err(EngineError::InvalidTransition {
                command: "handle_completion",
                mode,
            });
        }

        self.stop_countdown();
        self.advance_after_completion();
        self.publish();
        Ok(())
    }

    /// Stops the countdown, leaves Pomodoro mode and restores the segment's
    /// full length.
    pub fn cancel(&mut self) {
        self.stop_countdown();
        self.alarm.stop();
        self.state.mode = SessionMode::Idle;
        self.state.reset_cycle();
        self.state.time_remaining = self.state.total_duration;

        info!("timer cancelled");
        self.publish();
    }

    /// Restarts the current segment from its full length.
    ///
    /// Mode and session counters are kept. An idle timer restarts as a
    /// regular countdown of its current length; after a finished cycle that
    /// is the long break, and `stop` goes back to the selected preset.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the current segment has no length.
    pub fn restart(&mut self) -> Result<()> {
        if self.state.total_duration == 0 {
            return Err(EngineError::InvalidTransition {
                command: "restart",
                mode: self.state.mode,
            });
        }

        self.stop_countdown();
        self.state.time_remaining = self.state.total_duration;
        if self.state.mode == SessionMode::Idle {
            self.state.mode = SessionMode::Regular;
        }
        self.start_countdown();

        info!(mode = %self.state.mode, "timer restarted");
        self.publish();
        Ok(())
    }

    /// Pauses a running countdown or resumes a paused one.
    ///
    /// A finished timer (paused at 0) is left alone; it has to be reset with
    /// `stop`, `start_regular` or `start_pomodoro`.
    pub fn toggle(&mut self) {
        if self.state.is_running {
            self.stop_countdown();
            debug!(remaining = self.state.time_remaining, "timer paused");
            self.publish();
            return;
        }

        if self.state.time_remaining == 0 {
            debug!("toggle ignored on finished timer");
            return;
        }

        if self.state.mode == SessionMode::Idle {
            self.state.mode = SessionMode::Regular;
        }
        self.start_countdown();
        debug!(remaining = self.state.time_remaining, "timer resumed");
        self.publish();
    }

    /// Acknowledges a finished timer: silences the alarm and reloads the
    /// selected preset, paused.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless paused at 0, and `InvalidArgument`
    /// if the selected preset is 0 minutes.
    pub fn stop(&mut self) -> Result<()> {
        if !self.state.is_finished() {
            return Err(EngineError::InvalidTransition {
                command: "stop",
                mode: self.state.mode,
            });
        }
        let seconds = self.preset_seconds(self.state.selected_preset_index)?;

        self.alarm.stop();
        self.state.reset_cycle();
        self.state.load_segment(SessionMode::Regular, seconds);

        info!(preset = self.state.selected_preset_index, "finished timer reset");
        self.publish();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Ticks
    // ------------------------------------------------------------------------

    /// Handles a tick delivered by the clock.
    ///
    /// Ticks from a cancelled registration are dropped.
    pub fn on_tick(&mut self, tick: Tick) {
        if self.ticker.is_none() || tick.generation != self.generation {
            trace!(
                generation = tick.generation,
                current = self.generation,
                "stale tick ignored"
            );
            return;
        }
        self.tick();
    }

    /// Advances the countdown by one second.
    ///
    /// Reaching zero stops the countdown, plays the alarm and, in Pomodoro
    /// modes, loads the next segment. A snapshot is published after every
    /// tick, running or not.
    pub fn tick(&mut self) {
        if self.state.is_running && self.state.tick() {
            self.complete_segment();
        }
        trace!(remaining = self.state.time_remaining, "tick");
        self.publish();
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Returns a reference to the current timer state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Returns the snapshot observers would receive now.
    pub fn snapshot(&self) -> TimerSnapshot {
        self.state.snapshot()
    }

    /// Returns the settings in use.
    pub fn settings(&self) -> &dyn SettingsStore {
        self.settings.as_ref()
    }

    /// Returns true while the countdown is ticking.
    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    /// Returns a mutable reference to the timer state (for testing).
    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut TimerState {
        &mut self.state
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn preset_seconds(&self, preset_index: usize) -> Result<u32> {
        let presets = self.settings.regular_presets();
        let minutes = *presets.get(preset_index).ok_or_else(|| {
            EngineError::InvalidArgument(format!(
                "プリセット番号{}は範囲外です (0-{})",
                preset_index,
                PRESET_COUNT - 1
            ))
        })?;
        if minutes == 0 {
            return Err(EngineError::InvalidArgument(format!(
                "プリセット{}の時間は1分以上にしてください",
                preset_index + 1
            )));
        }
        Ok(minutes_to_seconds(minutes))
    }

    /// Registers a fresh tick handle and marks the state running.
    ///
    /// Starting any countdown silences a ringing alarm.
    fn start_countdown(&mut self) {
        self.stop_countdown();
        self.alarm.stop();
        self.generation += 1;
        self.ticker = Some(self.clock.register_periodic(TICK_INTERVAL, self.generation));
        self.state.is_running = true;
    }

    /// Releases the tick handle and marks the state paused.
    fn stop_countdown(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
        }
        self.state.is_running = false;
    }

    fn complete_segment(&mut self) {
        self.stop_countdown();
        info!(mode = %self.state.mode, "countdown finished");

        if let Err(e) = self.alarm.play(self.settings.alarm_volume()) {
            warn!("Failed to play alarm: {} ({})", e, e.suggestion());
        }

        if self.state.mode.is_pomodoro() {
            self.advance_after_completion();
        }
    }

    /// Loads the segment that follows a finished Pomodoro segment, paused.
    fn advance_after_completion(&mut self) {
        let plan = self.state.plan;
        let session = self.state.pomodoro_session;

        if self.state.mode.is_work() {
            self.state
                .load_segment(plan.break_mode(session), plan.break_seconds(session));
            info!(session, long = session == SESSIONS_PER_CYCLE, "break ready");
        } else if self.state.mode.is_break() {
            if session == SESSIONS_PER_CYCLE {
                self.state.reset_cycle();
                self.state.mode = SessionMode::Idle;
                info!("pomodoro cycle complete");
                return;
            }
            if !self.state.extra {
                self.state.pomodoro_session = session + 1;
            }
            self.state.extra = false;
            self.state
                .load_segment(SessionMode::PomodoroWork, plan.work_seconds());
            info!(session = self.state.pomodoro_session, "work session ready");
        }
    }

    fn publish(&self) {
        self.sink.on_state_changed(&self.state.snapshot());
    }
}

/// Next session ordinal, wrapping after the last one.
fn next_session(session: u32) -> u32 {
    if session >= SESSIONS_PER_CYCLE {
        1
    } else {
        session + 1
    }
}

// ============================================================================
// Tests
// ============================================================================
