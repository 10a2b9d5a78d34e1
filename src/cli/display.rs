//! Display utilities for the Pomato CLI.
//!
//! This module provides formatted output for:
//! - The live status line of an interactive session
//! - Available key commands
//! - Settings
//! - Error messages

use std::io::{self, Write};
use std::path::Path;

use crate::menubar::{format_duration, mode_label, session_dots, session_label, MenuConfig};
use crate::types::{SessionMode, Settings, TimerSnapshot};

/// Clears the current terminal line and returns the cursor to column 0.
const CLEAR_LINE: &str = "\r\x1b[2K";

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Formats the one-line status shown while a session runs.
    ///
    /// e.g. `🍅 24:59  work  Session 1/4 ●○○○  0%`
    pub fn format_status_line(title: &str, snapshot: &TimerSnapshot) -> String {
        let mut line = title.to_string();

        if snapshot.is_pomodoro() {
            line.push_str("  ");
            line.push_str(mode_label(snapshot));
            if let Some(session) = session_label(snapshot) {
                line.push_str(&format!("  {} {}", session, session_dots(snapshot)));
            }
        }

        line.push_str(&format!("  {:.0}%", snapshot.progress() * 100.0));
        line
    }

    /// Formats the available commands, e.g. `[t] pause  [c] cancel`.
    pub fn format_key_help(config: &MenuConfig) -> String {
        config
            .action_items()
            .into_iter()
            .filter(|item| item.enabled)
            .filter_map(|item| {
                item.id
                    .to_action()
                    .map(|action| format!("[{}] {}", action.key(), item.text))
            })
            .collect::<Vec<_>>()
            .join("  ")
    }

    /// Rewrites the status line in place.
    pub fn show_status_line(line: &str) {
        let mut stdout = io::stdout();
        let _ = write!(stdout, "{}{}", CLEAR_LINE, line);
        let _ = stdout.flush();
    }

    /// Prints the key help on its own line.
    pub fn show_key_help(config: &MenuConfig) {
        println!("{}{}", CLEAR_LINE, Self::format_key_help(config));
    }

    /// Announces a finished segment.
    pub fn show_finished(snapshot: &TimerSnapshot) {
        let next = match snapshot.mode {
            SessionMode::PomodoroBreak | SessionMode::PomodoroLongBreak => "休憩",
            SessionMode::PomodoroWork | SessionMode::PomodoroExtra => "作業",
            SessionMode::Idle => "サイクル完了",
            SessionMode::Regular => "タイマー終了",
        };
        println!("{}⏰ 時間です! 次: {}", CLEAR_LINE, next);
    }

    /// Shows the settings.
    pub fn show_settings(settings: &Settings, path: &Path) {
        println!("設定 ({})", path.display());
        println!("─────────────────────────────");
        for line in Self::format_settings(settings) {
            println!("{}", line);
        }
    }

    /// Formats the settings as `key: value` lines.
    pub fn format_settings(settings: &Settings) -> Vec<String> {
        let presets = settings
            .timer_presets
            .iter()
            .map(|m| format!("{}分", m))
            .collect::<Vec<_>>()
            .join(", ");
        let sound = settings
            .alarm_sound
            .as_ref()
            .map_or_else(|| "ビープ音".to_string(), |p| p.display().to_string());

        vec![
            format!("プリセット: {}", presets),
            format!(
                "ポモドーロ: 作業 {}分 / 休憩 {}分 / 長い休憩 {}分",
                settings.pomodoro_work_duration,
                settings.pomodoro_break_duration,
                settings.pomodoro_long_break_duration
            ),
            format!("アラーム音量: {}", settings.alarm_volume),
            format!("アラーム音: {}", sound),
        ]
    }

    /// Shows a success message for saved settings.
    pub fn show_settings_saved(path: &Path) {
        println!("* 設定を保存しました: {}", path.display());
    }

    /// Shows a success message for reset settings.
    pub fn show_settings_reset(path: &Path) {
        println!("* 設定を初期値に戻しました: {}", path.display());
    }

    /// Announces the alarm preview.
    pub fn show_test_sound(volume: u8) {
        println!("* テスト音を再生します (音量 {})", volume);
    }

    /// Shows the session summary printed on exit.
    pub fn show_goodbye(snapshot: &TimerSnapshot) {
        println!(
            "{}[] 終了しました (残り {})",
            CLEAR_LINE,
            format_duration(snapshot.time_remaining)
        );
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("{}エラー: {}", CLEAR_LINE, message);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menubar::{IconManager, MenuBuilder};
    use crate::types::TimerState;

    fn snapshot(mode: SessionMode, total: u32, remaining: u32, running: bool) -> TimerSnapshot {
        let mut state = TimerState::new(total);
        state.mode = mode;
        state.time_remaining = remaining;
        state.is_running = running;
        state.snapshot()
    }

    mod status_line_tests {
        use super::*;

        #[test]
        fn test_regular_line() {
            let s = snapshot(SessionMode::Regular, 300, 150, true);
            let title = IconManager::new().generate_title(&s);
            assert_eq!(Display::format_status_line(&title, &s), "2:30  50%");
        }

        #[test]
        fn test_pomodoro_line() {
            let s = snapshot(SessionMode::PomodoroWork, 1500, 1500, true);
            let title = IconManager::new().generate_title(&s);
            assert_eq!(
                Display::format_status_line(&title, &s),
                "🍅 25:00  work  Session 1/4 ●○○○  0%"
            );
        }
    }

    mod key_help_tests {
        use super::*;

        #[test]
        fn test_idle_help() {
            let config = MenuBuilder::default().build(&snapshot(SessionMode::Idle, 300, 300, false));
            let help = Display::format_key_help(&config);

            assert!(help.starts_with("[t] start"));
            assert!(help.contains("[1] 5m"));
            assert!(help.contains("[p] pomo"));
            assert!(help.contains("[q] 終了"));
            assert!(!help.contains("[c]"), "cancel is disabled when idle");
        }

        #[test]
        fn test_paused_break_help() {
            let config =
                MenuBuilder::default().build(&snapshot(SessionMode::PomodoroBreak, 300, 300, false));
            let help = Display::format_key_help(&config);

            assert!(help.contains("[+1] +1m"));
            assert!(help.contains("[+5] +5m"));
            assert!(help.contains("[k] Skip Break"));
            assert!(!help.contains("[1]"));
        }

        #[test]
        fn test_finished_help() {
            let config = MenuBuilder::default().build(&snapshot(SessionMode::Regular, 300, 0, false));
            assert!(Display::format_key_help(&config).starts_with("[s] stop"));
        }
    }

    mod settings_tests {
        use super::*;

        #[test]
        fn test_format_default_settings() {
            let lines = Display::format_settings(&Settings::default());
            assert_eq!(lines[0], "プリセット: 5分, 10分, 15分");
            assert_eq!(lines[1], "ポモドーロ: 作業 25分 / 休憩 5分 / 長い休憩 15分");
            assert_eq!(lines[2], "アラーム音量: 25");
            assert_eq!(lines[3], "アラーム音: ビープ音");
        }

        #[test]
        fn test_format_custom_sound() {
            let mut settings = Settings::default();
            settings.alarm_sound = Some("/tmp/bell.wav".into());
            let lines = Display::format_settings(&settings);
            assert_eq!(lines[3], "アラーム音: /tmp/bell.wav");
        }
    }
}
