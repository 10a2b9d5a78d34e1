//! Timer engine for the Pomato timer.
//!
//! This module contains the session state machine and its collaborator seams:
//! - `timer`: [`TimerEngine`], the single owner of the timer state
//! - `clock`: periodic tick sources with scoped handles
//! - `error`: command errors
//!
//! The engine publishes a [`TimerSnapshot`] to a [`NotificationSink`] after
//! every tick and after every command that changes state.

pub mod clock;
pub mod error;
pub mod timer;

use std::sync::{Arc, Mutex};

pub use clock::{Clock, MockClock, Tick, TickHandle, TokioClock, TICK_INTERVAL};
pub use error::EngineError;
pub use timer::TimerEngine;

use crate::types::TimerSnapshot;

/// Receiver of state snapshots (menu bar label, floating display).
///
/// Implementations must not block.
pub trait NotificationSink {
    fn on_state_changed(&self, snapshot: &TimerSnapshot);
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn on_state_changed(&self, snapshot: &TimerSnapshot) {
        (**self).on_state_changed(snapshot)
    }
}

/// Sink that keeps every snapshot, for tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    snapshots: Mutex<Vec<TimerSnapshot>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.snapshots.lock().unwrap().len()
    }

    #[must_use]
    pub fn last(&self) -> Option<TimerSnapshot> {
        self.snapshots.lock().unwrap().last().copied()
    }

    #[must_use]
    pub fn snapshots(&self) -> Vec<TimerSnapshot> {
        self.snapshots.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.snapshots.lock().unwrap().clear();
    }
}

impl NotificationSink for RecordingSink {
    fn on_state_changed(&self, snapshot: &TimerSnapshot) {
        self.snapshots.lock().unwrap().push(*snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimerState;

    #[test]
    fn test_recording_sink() {
        let sink = Arc::new(RecordingSink::new());
        let boxed: Box<dyn NotificationSink> = Box::new(Arc::clone(&sink));

        let snapshot = TimerState::new(60).snapshot();
        boxed.on_state_changed(&snapshot);

        assert_eq!(sink.count(), 1);
        assert_eq!(sink.last(), Some(snapshot));

        sink.clear();
        assert_eq!(sink.count(), 0);
    }
}
