//! Playback clock driven by a frame-style tick task.
//!
//! The clock owns at most one outstanding tick registration at a time.
//! `pause` and `reset` cancel it synchronously, so no stale tick can move
//! `current_time` after a logical pause.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::debug;

/// Tick cadence of the clock's recurring registration (~60 fps).
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Default)]
struct ClockState {
    current_time: Duration,
    /// Position at which the current play segment began (the resume base).
    start_time: Duration,
    is_playing: bool,
}

/// Elapsed-time tracker with play/pause/reset semantics.
///
/// State is shared only with the clock's own tick task; the task handle is
/// owned exclusively by the clock and never exposed.
#[derive(Debug, Default)]
pub struct PlaybackClock {
    state: Arc<Mutex<ClockState>>,
    timer: Option<JoinHandle<()>>,
}

impl PlaybackClock {
    /// Create a stopped clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin advancing `current_time` from its present value.
    ///
    /// Spawns the recurring tick task; while one is already outstanding this
    /// is a no-op, so duplicate registrations cannot pile up.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start(&mut self) {
        if self.timer.is_some() {
            return;
        }

        let (base, anchor) = {
            let mut state = lock(&self.state);
            state.is_playing = true;
            state.start_time = state.current_time;
            (state.start_time, Instant::now())
        };
        debug!(?base, "playback started");

        let state = Arc::clone(&self.state);
        self.timer = Some(tokio::spawn(async move {
            let mut frames = time::interval(FRAME_INTERVAL);
            loop {
                frames.tick().await;
                let mut state = lock(&state);
                // A pause may have landed between ticks; never write past it
                if !state.is_playing {
                    break;
                }
                state.current_time = base + anchor.elapsed();
            }
        }));
    }

    /// Stop advancing, keeping `current_time` where it is.
    ///
    /// Cancels the outstanding tick registration before returning. Idempotent:
    /// pausing a paused or stopped clock only re-asserts the stopped state.
    pub fn pause(&mut self) {
        lock(&self.state).is_playing = false;
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        debug!("playback paused");
    }

    /// Pause and rewind to zero.
    pub fn reset(&mut self) {
        self.pause();
        let mut state = lock(&self.state);
        state.current_time = Duration::ZERO;
        state.start_time = Duration::ZERO;
        debug!("playback reset");
    }

    #[must_use]
    pub fn current_time(&self) -> Duration {
        lock(&self.state).current_time
    }

    #[must_use]
    pub fn start_time(&self) -> Duration {
        lock(&self.state).start_time
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        lock(&self.state).is_playing
    }
}

impl Drop for PlaybackClock {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

fn lock(state: &Mutex<ClockState>) -> MutexGuard<'_, ClockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Format a position in seconds as zero-padded `"MM:SS"`.
///
/// Negative and non-finite inputs render as `"00:00"`; the format has no
/// representation for either.
#[must_use]
pub fn format_time(seconds: f64) -> String {
    let clamped = if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = clamped.floor() as u64;

    let mins = total / 60;
    let secs = total % 60;
    format!("{mins:02}:{secs:02}")
}
