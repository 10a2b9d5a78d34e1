//! End-to-end tests for the timer engine through the public API.
//!
//! These tests drive complete user workflows:
//! - Regular countdown to the alarm and back to the preset
//! - A full Pomodoro cycle typed as keyboard commands
//! - Extending and skipping breaks
//! - Real tokio ticks (with paused time)

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::unbounded;
use tokio::time::timeout;

use pomato::engine::{MockClock, RecordingSink, TimerEngine, TokioClock};
use pomato::menubar::{ChannelSink, Dispatch, EventHandler, MenuAction, MenuBar};
use pomato::sound::{AlarmPlayer, MockAlarmPlayer};
use pomato::types::{SessionMode, Settings};

// ============================================================================
// Test Helpers
// ============================================================================

/// One-minute segments everywhere.
fn create_fast_settings() -> Settings {
    Settings::default()
        .with_presets([1, 2, 3])
        .with_work_minutes(1)
        .with_break_minutes(1)
        .with_long_break_minutes(1)
}

fn create_engine(settings: Settings) -> (TimerEngine, Arc<MockAlarmPlayer>, Arc<RecordingSink>) {
    let alarm = Arc::new(MockAlarmPlayer::new());
    let sink = Arc::new(RecordingSink::new());
    let engine = TimerEngine::new(
        Box::new(settings),
        Box::new(MockClock::new()),
        Box::new(Arc::clone(&alarm)),
        Box::new(Arc::clone(&sink)),
    );
    (engine, alarm, sink)
}

/// Parses and dispatches a keyboard command.
fn press(handler: &EventHandler, engine: &mut TimerEngine, key: &str) -> Dispatch {
    let action: MenuAction = key.parse().unwrap();
    handler.dispatch(action, engine).unwrap()
}

fn tick_n(engine: &mut TimerEngine, n: u32) {
    for _ in 0..n {
        engine.tick();
    }
}

// ============================================================================
// Regular Timer Workflow
// ============================================================================

#[test]
fn test_regular_timer_rings_once_and_resets() {
    let (mut engine, alarm, sink) = create_engine(Settings::default());

    engine.start_regular(0).unwrap();
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.time_remaining, 300);
    assert_eq!(snapshot.total_duration, 300);
    assert_eq!(snapshot.mode, SessionMode::Regular);

    tick_n(&mut engine, 300);

    assert_eq!(engine.state().time_remaining, 0);
    assert!(!engine.is_running());
    assert_eq!(alarm.play_count(), 1);
    assert!(alarm.is_playing());
    assert_eq!(sink.count(), 301);

    engine.stop().unwrap();
    assert!(!alarm.is_playing());
    assert_eq!(engine.state().time_remaining, 300);
    assert!(!engine.is_running());
}

#[test]
fn test_pause_resume_keeps_remaining_time() {
    let (mut engine, _, _) = create_engine(Settings::default());
    let handler = EventHandler::new();

    press(&handler, &mut engine, "2");
    tick_n(&mut engine, 30);
    press(&handler, &mut engine, "t");
    tick_n(&mut engine, 30);
    press(&handler, &mut engine, "t");
    tick_n(&mut engine, 30);

    assert_eq!(engine.state().time_remaining, 540);
    assert!(engine.is_running());
}

// ============================================================================
// Pomodoro Workflow
// ============================================================================

#[test]
fn test_full_pomodoro_cycle_with_keyboard() {
    let (mut engine, alarm, sink) = create_engine(create_fast_settings());
    let handler = EventHandler::new();

    press(&handler, &mut engine, "p");
    assert_eq!(engine.state().mode, SessionMode::PomodoroWork);

    let mut sessions = Vec::new();
    for _ in 0..8 {
        tick_n(&mut engine, 60);
        assert!(!engine.is_running());
        sessions.push((engine.state().mode, engine.state().pomodoro_session));
        press(&handler, &mut engine, "t");
    }

    assert_eq!(
        sessions,
        vec![
            (SessionMode::PomodoroBreak, 1),
            (SessionMode::PomodoroWork, 2),
            (SessionMode::PomodoroBreak, 2),
            (SessionMode::PomodoroWork, 3),
            (SessionMode::PomodoroBreak, 3),
            (SessionMode::PomodoroWork, 4),
            (SessionMode::PomodoroLongBreak, 4),
            (SessionMode::Idle, 1),
        ]
    );
    assert_eq!(alarm.play_count(), 8);

    let exits = sink
        .snapshots()
        .windows(2)
        .filter(|w| w[0].is_pomodoro() && !w[1].is_pomodoro())
        .count();
    assert_eq!(exits, 1);
}

#[test]
fn test_extend_then_skip_break() {
    let (mut engine, _, _) = create_engine(Settings::default());
    let handler = EventHandler::new();

    press(&handler, &mut engine, "p");
    tick_n(&mut engine, 1500);
    assert_eq!(engine.state().mode, SessionMode::PomodoroBreak);

    // Keep working five more minutes instead of taking the break
    press(&handler, &mut engine, "+5");
    assert_eq!(engine.state().mode, SessionMode::PomodoroExtra);
    assert_eq!(engine.state().time_remaining, 1800);

    tick_n(&mut engine, 1800);
    assert_eq!(engine.state().mode, SessionMode::PomodoroBreak);

    press(&handler, &mut engine, "k");
    let state = engine.state();
    assert_eq!(state.mode, SessionMode::PomodoroWork);
    assert_eq!(state.pomodoro_session, 1);
    assert!(state.is_running);
}

#[test]
fn test_rejected_commands_change_nothing() {
    let (mut engine, _, sink) = create_engine(Settings::default());
    let handler = EventHandler::new();

    press(&handler, &mut engine, "1");
    let before = engine.state().clone();
    let published = sink.count();

    for action in [
        MenuAction::SkipBreak,
        MenuAction::AddMinutes(5),
        MenuAction::Stop,
    ] {
        assert!(handler.dispatch(action, &mut engine).is_err());
    }

    assert_eq!(engine.state(), &before);
    assert_eq!(sink.count(), published);
}

#[test]
fn test_quit_dispatch() {
    let (mut engine, _, _) = create_engine(Settings::default());
    let handler = EventHandler::new();
    assert_eq!(press(&handler, &mut engine, "q"), Dispatch::Quit);
}

// ============================================================================
// MenuBar Follows the Engine
// ============================================================================

#[test]
fn test_menubar_title_follows_pomodoro() {
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
    menubar.process_pending_updates();
    assert_eq!(menubar.generate_title(), "🍅 24:59");

    tick_n(&mut engine, 1499);
    menubar.process_pending_updates();
    assert_eq!(menubar.generate_title(), "⏸ ☕ 5:00");

    let config = menubar.generate_menu_config();
    assert!(config.skip_break.is_some());
    assert_eq!(config.primary.text, "start");
}

// ============================================================================
// Real Clock
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_tokio_clock_drives_countdown() {
    let (clock, mut ticks) = TokioClock::new();
    let alarm = Arc::new(MockAlarmPlayer::new());
    let mut engine = TimerEngine::new(
        Box::new(create_fast_settings()),
        Box::new(clock),
        Box::new(Arc::clone(&alarm)),
        Box::new(RecordingSink::new()),
    );

    engine.start_regular(0).unwrap();
    while engine.is_running() {
        let tick = timeout(Duration::from_secs(5), ticks.recv())
            .await
            .expect("tick within timeout")
            .expect("clock channel open");
        engine.on_tick(tick);
    }

    assert_eq!(engine.state().time_remaining, 0);
    assert_eq!(alarm.play_count(), 1);

    // The countdown's task is gone: no more ticks arrive.
    assert!(timeout(Duration::from_secs(5), ticks.recv()).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_tokio_clock_pause_stops_ticks() {
    let (clock, mut ticks) = TokioClock::new();
    let mut engine = TimerEngine::new(
        Box::new(Settings::default()),
        Box::new(clock),
        Box::new(MockAlarmPlayer::new()),
        Box::new(RecordingSink::new()),
    );

    engine.start_regular(0).unwrap();
    for _ in 0..3 {
        let tick = ticks.recv().await.unwrap();
        engine.on_tick(tick);
    }
    engine.toggle();

    assert!(timeout(Duration::from_secs(5), ticks.recv()).await.is_err());
    assert_eq!(engine.state().time_remaining, 297);
}
