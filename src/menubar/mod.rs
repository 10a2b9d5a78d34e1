//! Menu bar view model for the Pomato timer.
//!
//! This module provides:
//! - Real-time title text (e.g., "🍅 24:59")
//! - Menu configuration with the commands valid for the current state
//! - Action parsing and dispatch onto the engine
//!
//! # Architecture
//!
//! - `icon.rs`: Title and label generation (pure functions of a snapshot)
//! - `menu.rs`: Menu configuration
//! - `event.rs`: Actions, dispatch, and the update channel
//! - `mod.rs`: [`MenuBar`], which follows the engine through the channel
//!
//! # Usage
//!
//! The engine publishes through a [`ChannelSink`]; the front end owns the
//! receiving [`MenuBar`] and renders whatever it reports as changed.
//!
//! ```
//! use crossbeam_channel::unbounded;
//! use pomato::engine::NotificationSink;
//! use pomato::menubar::{ChannelSink, MenuBar};
//! use pomato::types::TimerState;
//!
//! let (tx, rx) = unbounded();
//! let sink = ChannelSink::new(tx);
//! let mut menubar = MenuBar::new(TimerState::new(300).snapshot(), [5, 10, 15], rx);
//!
//! let mut state = TimerState::new(300);
//! state.time_remaining = 299;
//! sink.on_state_changed(&state.snapshot());
//!
//! assert_eq!(menubar.process_pending_updates(), 1);
//! assert_eq!(menubar.generate_title(), "4:59");
//! ```

pub mod event;
pub mod icon;
pub mod menu;

// Re-export main types
pub use event::{
    ChannelSink, Dispatch, EventHandler, MenuAction, MenuItemId, ParseActionError, TrayUpdate,
};
pub use icon::{format_duration, mode_label, session_dots, session_label, IconManager};
pub use menu::{MenuBuilder, MenuConfig, MenuItemConfig};

use crossbeam_channel::{Receiver, TryRecvError};

use crate::types::{TimerSnapshot, PRESET_COUNT};

// ============================================================================
// MenuBar
// ============================================================================

/// Follows the engine's snapshots and derives what the menu bar shows.
pub struct MenuBar {
    /// Title generation
    icon_manager: IconManager,
    /// Menu configuration
    menu_builder: MenuBuilder,
    /// Latest snapshot received
    current: TimerSnapshot,
    /// Title last handed out by `take_title_change`
    last_title: Option<String>,
    /// Channel for receiving updates from the engine
    update_rx: Receiver<TrayUpdate>,
    /// Set once `Shutdown` arrives or the channel disconnects
    shut_down: bool,
}

impl MenuBar {
    /// Creates a MenuBar showing `initial` until the first update arrives.
    pub fn new(
        initial: TimerSnapshot,
        presets: [u32; PRESET_COUNT],
        update_rx: Receiver<TrayUpdate>,
    ) -> Self {
        Self {
            icon_manager: IconManager::new(),
            menu_builder: MenuBuilder::new(presets),
            current: initial,
            last_title: None,
            update_rx,
            shut_down: false,
        }
    }

    /// Returns the latest snapshot.
    pub fn current(&self) -> &TimerSnapshot {
        &self.current
    }

    /// Returns whether the display was shut down.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Generates the current title for the menu bar.
    pub fn generate_title(&self) -> String {
        self.icon_manager.generate_title(&self.current)
    }

    /// Generates the current menu configuration.
    pub fn generate_menu_config(&self) -> MenuConfig {
        self.menu_builder.build(&self.current)
    }

    /// Returns the title if it differs from the one returned last time.
    pub fn take_title_change(&mut self) -> Option<String> {
        let title = self.generate_title();
        if self.last_title.as_deref() == Some(title.as_str()) {
            return None;
        }
        self.last_title = Some(title.clone());
        Some(title)
    }

    /// Returns true if the mode differs from the previous call.
    pub fn mode_changed(&mut self) -> bool {
        self.icon_manager.mode_changed(self.current.mode)
    }

    /// Processes a pending update from the channel.
    ///
    /// Returns `true` if an update was processed, `false` if the channel was empty.
    pub fn process_pending_update(&mut self) -> bool {
        match self.update_rx.try_recv() {
            Ok(update) => {
                self.handle_update(update);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                if !self.shut_down {
                    tracing::debug!("menu bar update channel disconnected");
                    self.shut_down = true;
                }
                false
            }
        }
    }

    /// Processes every pending update and returns how many there were.
    pub fn process_pending_updates(&mut self) -> usize {
        let mut processed = 0;
        while self.process_pending_update() {
            processed += 1;
        }
        processed
    }

    fn handle_update(&mut self, update: TrayUpdate) {
        match update {
            TrayUpdate::State(snapshot) => {
                self.current = snapshot;
            }
            TrayUpdate::Shutdown => {
                tracing::debug!("menu bar shutting down");
                self.shut_down = true;
            }
        }
    }
}

impl std::fmt::Debug for MenuBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuBar")
            .field("current", &self.current)
            .field("shut_down", &self.shut_down)
            .field("icon_manager", &self.icon_manager)
            .field("menu_builder", &self.menu_builder)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MockClock, NotificationSink, TimerEngine};
    use crate::sound::MockAlarmPlayer;
    use crate::types::{SessionMode, Settings, TimerState};
    use crossbeam_channel::unbounded;

    fn idle() -> TimerSnapshot {
        TimerState::new(300).snapshot()
    }

    mod menubar_tests {
        use super::*;

        #[test]
        fn test_new() {
            let (_, rx) = unbounded();
            let menubar = MenuBar::new(idle(), [5, 10, 15], rx);

            assert!(!menubar.is_shut_down());
            assert_eq!(menubar.generate_title(), "5:00");
            assert_eq!(menubar.current().mode, SessionMode::Idle);
        }

        #[test]
        fn test_process_pending_update_empty() {
            let (_tx, rx) = unbounded();
            let mut menubar = MenuBar::new(idle(), [5, 10, 15], rx);

            assert!(!menubar.process_pending_update());
            assert!(!menubar.is_shut_down());
        }

        #[test]
        fn test_process_state_update() {
            let (tx, rx) = unbounded();
            let mut menubar = MenuBar::new(idle(), [5, 10, 15], rx);

            let mut state = TimerState::new(1500);
            state.mode = SessionMode::PomodoroWork;
            state.is_running = true;
            state.time_remaining = 930;
            tx.send(TrayUpdate::State(state.snapshot())).unwrap();

            assert!(menubar.process_pending_update());
            assert_eq!(menubar.generate_title(), "🍅 15:30");
            assert_eq!(menubar.generate_menu_config().primary.text, "pause");
        }

        #[test]
        fn test_shutdown_update() {
            let (tx, rx) = unbounded();
            let mut menubar = MenuBar::new(idle(), [5, 10, 15], rx);

            tx.send(TrayUpdate::Shutdown).unwrap();
            menubar.process_pending_updates();

            assert!(menubar.is_shut_down());
        }

        #[test]
        fn test_disconnect_marks_shut_down() {
            let (tx, rx) = unbounded::<TrayUpdate>();
            let mut menubar = MenuBar::new(idle(), [5, 10, 15], rx);
            drop(tx);

            assert!(!menubar.process_pending_update());
            assert!(menubar.is_shut_down());
        }

        #[test]
        fn test_take_title_change() {
            let (tx, rx) = unbounded();
            let mut menubar = MenuBar::new(idle(), [5, 10, 15], rx);

            assert_eq!(menubar.take_title_change().as_deref(), Some("5:00"));
            assert_eq!(menubar.take_title_change(), None);

            tx.send(TrayUpdate::State(idle())).unwrap();
            menubar.process_pending_updates();
            assert_eq!(menubar.take_title_change(), None);

            let mut state = TimerState::new(300);
            state.time_remaining = 299;
            tx.send(TrayUpdate::State(state.snapshot())).unwrap();
            menubar.process_pending_updates();
            assert_eq!(menubar.take_title_change().as_deref(), Some("4:59"));
        }

        #[test]
        fn test_mode_changed() {
            let (_tx, rx) = unbounded();
            let mut menubar = MenuBar::new(idle(), [5, 10, 15], rx);

            assert!(menubar.mode_changed());
            assert!(!menubar.mode_changed());
        }
    }

    mod engine_to_menubar_tests {
        use super::*;

        #[test]
        fn test_follows_engine_through_channel() {
            let (tx, rx) = unbounded();
            let mut engine = TimerEngine::new(
                Box::new(Settings::default()),
                Box::new(MockClock::new()),
                Box::new(MockAlarmPlayer::new()),
                Box::new(ChannelSink::new(tx)),
            );
            let mut menubar = MenuBar::new(engine.snapshot(), [5, 10, 15], rx);

            engine.start_pomodoro().unwrap();
            engine.tick();
            engine.tick();

            assert_eq!(menubar.process_pending_updates(), 3);
            assert_eq!(menubar.current(), &engine.snapshot());
            assert_eq!(menubar.generate_title(), "🍅 24:58");
        }

        #[test]
        fn test_channel_sink_is_a_notification_sink() {
            let (tx, rx) = unbounded();
            let sink: Box<dyn NotificationSink> = Box::new(ChannelSink::new(tx));
            sink.on_state_changed(&idle());
            assert_eq!(rx.len(), 1);
        }
    }
}
