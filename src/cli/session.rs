//! Interactive timer session.
//!
//! Owns the [`TimerEngine`] and serializes everything that touches it in a
//! single `select!` loop: clock ticks, typed commands and Ctrl-C. The engine
//! publishes into a [`ChannelSink`]; after each step the loop drains the
//! channel through a [`MenuBar`] and redraws the status line.

use anyhow::{Context, Result};
use crossbeam_channel::unbounded;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::display::Display;
use crate::engine::{TimerEngine, TokioClock};
use crate::menubar::{ChannelSink, Dispatch, EventHandler, MenuAction, MenuBar, TrayUpdate};
use crate::sound::AlarmPlayer;
use crate::types::{Settings, TimerSnapshot};

/// Redraws the terminal after the engine changed.
struct Renderer {
    menubar: MenuBar,
    previous: TimerSnapshot,
}

impl Renderer {
    fn new(menubar: MenuBar) -> Self {
        let previous = *menubar.current();
        Self { menubar, previous }
    }

    /// Draws whatever changed since the last call. Nothing is drawn once the
    /// display was shut down.
    fn render(&mut self) {
        if self.menubar.process_pending_updates() == 0 || self.menubar.is_shut_down() {
            return;
        }
        let snapshot = *self.menubar.current();

        let completed = segment_completed(&self.previous, &snapshot);
        if completed {
            Display::show_finished(&snapshot);
        }
        if self.menubar.mode_changed() || completed {
            self.help();
        }
        if let Some(title) = self.menubar.take_title_change() {
            Display::show_status_line(&Display::format_status_line(&title, &snapshot));
        }

        self.previous = snapshot;
    }

    fn help(&self) {
        Display::show_key_help(&self.menubar.generate_menu_config());
    }
}

/// True when the last second of a running segment elapsed between the two
/// snapshots.
fn segment_completed(previous: &TimerSnapshot, current: &TimerSnapshot) -> bool {
    previous.is_running
        && previous.time_remaining == 1
        && !current.is_running
        && (current.is_finished() || current.mode != previous.mode)
}

/// Runs an interactive session starting with `initial`.
///
/// Returns when the user quits, stdin is closed or Ctrl-C is pressed.
///
/// # Errors
///
/// Returns an error if the initial command is rejected or stdin fails.
pub async fn run(settings: Settings, alarm: Box<dyn AlarmPlayer>, initial: MenuAction) -> Result<()> {
    let presets = settings.timer_presets;
    let (clock, mut ticks) = TokioClock::new();
    let (tx, rx) = unbounded();

    let mut engine = TimerEngine::new(
        Box::new(settings),
        Box::new(clock),
        alarm,
        Box::new(ChannelSink::new(tx.clone())),
    );
    let menubar = MenuBar::new(engine.snapshot(), presets, rx);
    let handler = EventHandler::new();
    let mut renderer = Renderer::new(menubar);

    handler
        .dispatch(initial, &mut engine)
        .context("タイマーを開始できませんでした")?;
    renderer.render();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            Some(tick) = ticks.recv() => {
                engine.on_tick(tick);
            }
            line = lines.next_line() => {
                let line = line.context("標準入力の読み込みに失敗しました")?;
                let Some(line) = line else {
                    tracing::debug!("stdin closed");
                    break;
                };
                if line.trim() == "?" || line.trim() == "h" {
                    renderer.help();
                    continue;
                }
                match line.parse::<MenuAction>() {
                    Ok(action) => match handler.dispatch(action, &mut engine) {
                        Ok(Dispatch::Quit) => break,
                        Ok(Dispatch::Continue) => {}
                        Err(e) => Display::show_error(&e.to_string()),
                    },
                    Err(e) => Display::show_error(&e.to_string()),
                }
            }
            _ = &mut ctrl_c => {
                tracing::debug!("interrupted");
                break;
            }
        }
        renderer.render();
    }

    let last = engine.snapshot();
    engine.cancel();
    let _ = tx.send(TrayUpdate::Shutdown);
    renderer.render();
    Display::show_goodbye(&last);
    Ok(())
}
