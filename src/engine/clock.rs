//! Periodic tick sources for the timer engine.
//!
//! A [`Clock`] hands out a [`TickHandle`] per registration. The engine keeps
//! at most one handle and drops it whenever the countdown stops, so every
//! exit from the running state releases the underlying timer.
//!
//! Each registration carries a generation number. Ticks are tagged with it,
//! which lets the engine discard ticks that were already queued when the
//! handle was cancelled.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Interval between countdown ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

// ============================================================================
// Tick / TickHandle / Clock
// ============================================================================

/// One periodic callback firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Generation of the registration that produced this tick
    pub generation: u64,
}

/// Scoped registration of a periodic callback.
///
/// Dropping the handle must have the same effect as calling `cancel`.
pub trait TickHandle {
    /// Stops further ticks. Calling it more than once is harmless.
    fn cancel(&mut self);
}

/// A scheduler that fires ticks at a fixed interval.
pub trait Clock {
    /// Registers a periodic callback tagged with `generation`.
    fn register_periodic(&self, interval: Duration, generation: u64) -> Box<dyn TickHandle>;
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn register_periodic(&self, interval: Duration, generation: u64) -> Box<dyn TickHandle> {
        (**self).register_periodic(interval, generation)
    }
}

// ============================================================================
// TokioClock
// ============================================================================

/// Clock backed by `tokio::time::interval`.
///
/// Ticks are delivered on an unbounded channel so the owner of the engine can
/// serialize them with user commands in a single `select!` loop.
#[derive(Debug, Clone)]
pub struct TokioClock {
    tx: mpsc::UnboundedSender<Tick>,
}

impl TokioClock {
    /// Creates a clock and the receiver its ticks arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Clock for TokioClock {
    /// Spawns the ticking task. Must be called inside a tokio runtime.
    fn register_periodic(&self, interval: Duration, generation: u64) -> Box<dyn TickHandle> {
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if tx.send(Tick { generation }).is_err() {
                    break;
                }
            }
        });

        tracing::trace!(generation, "tick task spawned");
        Box::new(TokioTickHandle { task })
    }
}

/// Handle that aborts the ticking task.
struct TokioTickHandle {
    task: JoinHandle<()>,
}

impl TickHandle for TokioTickHandle {
    fn cancel(&mut self) {
        self.task.abort();
    }
}

impl Drop for TokioTickHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// ============================================================================
// MockClock
// ============================================================================

/// Clock that never fires on its own; tests call `TimerEngine::tick` directly.
///
/// It records registrations so tests can check that at most one countdown is
/// active at a time.
#[derive(Debug, Default)]
pub struct MockClock {
    active: Arc<AtomicUsize>,
    generations: Mutex<Vec<u64>>,
}

impl MockClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles not yet cancelled.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Total number of registrations.
    #[must_use]
    pub fn registration_count(&self) -> usize {
        self.generations.lock().unwrap().len()
    }

    /// Generation of the most recent registration.
    #[must_use]
    pub fn last_generation(&self) -> Option<u64> {
        self.generations.lock().unwrap().last().copied()
    }
}

impl Clock for MockClock {
    fn register_periodic(&self, _interval: Duration, generation: u64) -> Box<dyn TickHandle> {
        self.active.fetch_add(1, Ordering::SeqCst);
        self.generations.lock().unwrap().push(generation);
        Box::new(MockTickHandle {
            active: Arc::clone(&self.active),
            cancelled: false,
        })
    }
}

struct MockTickHandle {
    active: Arc<AtomicUsize>,
    cancelled: bool,
}

impl TickHandle for MockTickHandle {
    fn cancel(&mut self) {
        if !self.cancelled {
            self.cancelled = true;
            self.active.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Drop for MockTickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ============================================================================
// Tests
// ============================================================================
