//! Menu building and item state management for the menu bar.
//!
//! This module handles:
//! - Menu item configuration and state
//! - Which commands are offered for the current snapshot
//!
//! Commands that are invalid in the current state are either hidden or
//! disabled, so the front end never has to show an `InvalidTransition`.

use super::event::MenuItemId;
use super::icon::{format_duration, mode_label, progress_percent, session_dots, session_label};
use crate::types::{SessionMode, TimerSnapshot, PRESET_COUNT};

/// Minutes offered by the extension buttons of a paused Pomodoro.
pub const EXTENSION_MINUTES: [u32; 2] = [1, 5];

// ============================================================================
// MenuItemConfig
// ============================================================================

/// Configuration for a menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemConfig {
    /// Which item this is
    pub id: MenuItemId,
    /// Display text for the menu item
    pub text: String,
    /// Whether the menu item is enabled (clickable)
    pub enabled: bool,
}

impl MenuItemConfig {
    /// Creates a new menu item configuration.
    pub fn new(id: MenuItemId, text: impl Into<String>, enabled: bool) -> Self {
        Self {
            id,
            text: text.into(),
            enabled,
        }
    }

    /// Creates a disabled informational item.
    pub fn label(text: impl Into<String>) -> Self {
        Self::new(MenuItemId::Unknown, text, false)
    }
}

// ============================================================================
// MenuConfig
// ============================================================================

/// Complete menu configuration for one snapshot.
#[derive(Debug, Clone)]
pub struct MenuConfig {
    /// Title item (always disabled, shows app name)
    pub title: MenuItemConfig,
    /// Status info items (always disabled)
    pub status_items: Vec<MenuItemConfig>,
    /// Start / pause, or stop once the timer has finished
    pub primary: MenuItemConfig,
    /// Preset and Pomodoro buttons, or the extension buttons when a
    /// Pomodoro is paused
    pub timer_items: Vec<MenuItemConfig>,
    /// Only present during a break
    pub skip_break: Option<MenuItemConfig>,
    /// Cancel button
    pub cancel: MenuItemConfig,
    /// Restart button
    pub restart: MenuItemConfig,
    /// Quit button (always enabled)
    pub quit: MenuItemConfig,
}

impl MenuConfig {
    /// Returns the clickable items in display order.
    pub fn action_items(&self) -> Vec<&MenuItemConfig> {
        let mut items = vec![&self.primary];
        items.extend(self.timer_items.iter());
        items.extend(self.skip_break.iter());
        items.push(&self.cancel);
        items.push(&self.restart);
        items.push(&self.quit);
        items
    }

    /// Returns true if the item is shown and enabled.
    pub fn is_enabled(&self, id: MenuItemId) -> bool {
        self.action_items()
            .iter()
            .any(|item| item.id == id && item.enabled)
    }
}

// ============================================================================
// MenuBuilder
// ============================================================================

/// Builds menu configuration from a timer snapshot.
#[derive(Debug, Clone)]
pub struct MenuBuilder {
    /// Preset lengths in minutes, for the button labels
    presets: [u32; PRESET_COUNT],
}

impl Default for MenuBuilder {
    fn default() -> Self {
        Self::new([5, 10, 15])
    }
}

impl MenuBuilder {
    /// Creates a MenuBuilder labelling presets with the given minutes.
    pub fn new(presets: [u32; PRESET_COUNT]) -> Self {
        Self { presets }
    }

    /// Builds a complete menu configuration for the snapshot.
    pub fn build(&self, snapshot: &TimerSnapshot) -> MenuConfig {
        MenuConfig {
            title: MenuItemConfig::label("ポモドーロタイマー"),
            status_items: self.build_status_items(snapshot),
            primary: self.build_primary_item(snapshot),
            timer_items: self.build_timer_items(snapshot),
            skip_break: snapshot
                .mode
                .is_break()
                .then(|| MenuItemConfig::new(MenuItemId::SkipBreak, "Skip Break", true)),
            cancel: MenuItemConfig::new(
                MenuItemId::Cancel,
                "cancel",
                snapshot.mode != SessionMode::Idle,
            ),
            restart: MenuItemConfig::new(
                MenuItemId::Restart,
                "restart",
                snapshot.total_duration > 0,
            ),
            quit: MenuItemConfig::new(MenuItemId::Quit, "終了", true),
        }
    }

    fn build_status_items(&self, snapshot: &TimerSnapshot) -> Vec<MenuItemConfig> {
        let mut items = vec![MenuItemConfig::label(format!(
            "残り時間: {} ({}%)",
            format_duration(snapshot.time_remaining),
            progress_percent(snapshot)
        ))];

        if let Some(label) = session_label(snapshot) {
            items.push(MenuItemConfig::label(format!(
                "{} {}",
                label,
                session_dots(snapshot)
            )));
        }

        items
    }

    /// Start when paused, pause when running, stop when finished.
    fn build_primary_item(&self, snapshot: &TimerSnapshot) -> MenuItemConfig {
        if snapshot.is_running {
            MenuItemConfig::new(MenuItemId::Toggle, "pause", true)
        } else if snapshot.is_finished() {
            MenuItemConfig::new(MenuItemId::Stop, "stop", true)
        } else {
            MenuItemConfig::new(MenuItemId::Toggle, "start", true)
        }
    }

    fn build_timer_items(&self, snapshot: &TimerSnapshot) -> Vec<MenuItemConfig> {
        if Self::is_extend_offered(snapshot) {
            return EXTENSION_MINUTES
                .iter()
                .map(|&m| {
                    MenuItemConfig::new(MenuItemId::AddMinutes(m), format!("+{}m", m), true)
                })
                .collect();
        }

        let mut items: Vec<MenuItemConfig> = self
            .presets
            .iter()
            .enumerate()
            .map(|(i, &minutes)| {
                MenuItemConfig::new(MenuItemId::Preset(i), format!("{}m", minutes), minutes > 0)
            })
            .collect();
        items.push(MenuItemConfig::new(
            MenuItemId::Pomodoro,
            mode_label(snapshot),
            true,
        ));
        items
    }

    /// Extension buttons replace the timer buttons while a Pomodoro is paused.
    pub fn is_extend_offered(snapshot: &TimerSnapshot) -> bool {
        snapshot.mode.is_pomodoro() && !snapshot.is_running
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimerState;

    fn snapshot(mode: SessionMode, remaining: u32, running: bool) -> TimerSnapshot {
        let mut state = TimerState::new(300);
        state.mode = mode;
        state.time_remaining = remaining;
        state.is_running = running;
        state.snapshot()
    }

    fn ids(items: &[MenuItemConfig]) -> Vec<MenuItemId> {
        items.iter().map(|item| item.id).collect()
    }

    // ------------------------------------------------------------------------
    // MenuItemConfig Tests
    // ------------------------------------------------------------------------

    mod menu_item_config_tests {
        use super::*;

        #[test]
        fn test_new() {
            let item = MenuItemConfig::new(MenuItemId::Cancel, "cancel", true);
            assert_eq!(item.text, "cancel");
            assert!(item.enabled);
        }

        #[test]
        fn test_label_is_disabled() {
            let item = MenuItemConfig::label("info");
            assert_eq!(item.id, MenuItemId::Unknown);
            assert!(!item.enabled);
        }
    }

    // ------------------------------------------------------------------------
    // Idle / Regular
    // ------------------------------------------------------------------------

    mod regular_state_tests {
        use super::*;

        #[test]
        fn test_build_idle_state() {
            let config = MenuBuilder::default().build(&snapshot(SessionMode::Idle, 300, false));

            assert_eq!(config.title.text, "ポモドーロタイマー");
            assert!(!config.title.enabled);
            assert_eq!(config.primary.text, "start");
            assert_eq!(
                ids(&config.timer_items),
                vec![
                    MenuItemId::Preset(0),
                    MenuItemId::Preset(1),
                    MenuItemId::Preset(2),
                    MenuItemId::Pomodoro,
                ]
            );
            assert_eq!(config.timer_items[0].text, "5m");
            assert_eq!(config.timer_items[3].text, "pomo");
            assert!(config.skip_break.is_none());
            assert!(!config.cancel.enabled);
            assert!(config.restart.enabled);
            assert!(config.quit.enabled);
        }

        #[test]
        fn test_build_running_regular() {
            let config = MenuBuilder::default().build(&snapshot(SessionMode::Regular, 290, true));

            assert_eq!(config.primary.text, "pause");
            assert_eq!(config.primary.id, MenuItemId::Toggle);
            assert!(config.cancel.enabled);
            assert_eq!(config.status_items.len(), 1);
            assert_eq!(config.status_items[0].text, "残り時間: 4:50 (3%)");
        }

        #[test]
        fn test_build_finished_regular() {
            let config = MenuBuilder::default().build(&snapshot(SessionMode::Regular, 0, false));

            assert_eq!(config.primary.text, "stop");
            assert_eq!(config.primary.id, MenuItemId::Stop);
            assert!(config.is_enabled(MenuItemId::Stop));
            assert!(!config.is_enabled(MenuItemId::Toggle));
        }

        #[test]
        fn test_custom_preset_labels() {
            let config = MenuBuilder::new([1, 2, 45]).build(&snapshot(SessionMode::Idle, 60, false));
            assert_eq!(config.timer_items[2].text, "45m");
        }

        #[test]
        fn test_zero_preset_disabled() {
            let config = MenuBuilder::new([5, 0, 15]).build(&snapshot(SessionMode::Idle, 300, false));
            assert!(!config.is_enabled(MenuItemId::Preset(1)));
            assert!(config.is_enabled(MenuItemId::Preset(0)));
        }
    }

    // ------------------------------------------------------------------------
    // Pomodoro
    // ------------------------------------------------------------------------

    mod pomodoro_state_tests {
        use super::*;

        #[test]
        fn test_running_work_shows_presets_and_mode_label() {
            let config =
                MenuBuilder::default().build(&snapshot(SessionMode::PomodoroWork, 1000, true));

            assert_eq!(config.timer_items.len(), 4);
            assert_eq!(config.timer_items[3].text, "work");
            assert!(config.skip_break.is_none());
            assert_eq!(config.status_items.len(), 2);
            assert_eq!(config.status_items[1].text, "Session 1/4 ●○○○");
        }

        #[test]
        fn test_paused_pomodoro_offers_extensions() {
            let config =
                MenuBuilder::default().build(&snapshot(SessionMode::PomodoroWork, 1000, false));

            assert_eq!(
                ids(&config.timer_items),
                vec![MenuItemId::AddMinutes(1), MenuItemId::AddMinutes(5)]
            );
            assert_eq!(config.timer_items[0].text, "+1m");
            assert_eq!(config.timer_items[1].text, "+5m");
        }

        #[test]
        fn test_break_offers_skip() {
            let config =
                MenuBuilder::default().build(&snapshot(SessionMode::PomodoroBreak, 300, false));

            let skip = config.skip_break.as_ref().unwrap();
            assert_eq!(skip.text, "Skip Break");
            assert!(config.is_enabled(MenuItemId::SkipBreak));
            assert!(config.is_enabled(MenuItemId::AddMinutes(5)));
        }

        #[test]
        fn test_action_items_order() {
            let config =
                MenuBuilder::default().build(&snapshot(SessionMode::PomodoroLongBreak, 900, true));
            let order: Vec<MenuItemId> = config.action_items().iter().map(|i| i.id).collect();

            assert_eq!(order.first(), Some(&MenuItemId::Toggle));
            assert_eq!(order.last(), Some(&MenuItemId::Quit));
            assert!(order.contains(&MenuItemId::SkipBreak));
        }

        #[test]
        fn test_is_extend_offered() {
            assert!(MenuBuilder::is_extend_offered(&snapshot(
                SessionMode::PomodoroExtra,
                10,
                false
            )));
            assert!(!MenuBuilder::is_extend_offered(&snapshot(
                SessionMode::PomodoroExtra,
                10,
                true
            )));
            assert!(!MenuBuilder::is_extend_offered(&snapshot(
                SessionMode::Regular,
                10,
                false
            )));
        }
    }
}
