#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame clock driving the simulation.
//!
//! The clock turns a stream of monotonic frame timestamps into
//! [`Command::Tick`] values. The first frame after (re)start carries a zero
//! delta so a paused or freshly opened game never jumps forward.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use type_siege_core::Command;

/// Converts monotonic frame timestamps into tick commands.
#[derive(Debug, Default)]
pub struct GameClock {
    last: Option<Duration>,
}

impl GameClock {
    /// Creates a clock with no previous frame.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Records a frame timestamp and returns the tick to apply.
    ///
    /// The first call yields a zero delta; later calls yield the saturating
    /// difference from the previous timestamp, so a backend that reports a
    /// non-monotonic stamp produces a zero-length tick instead of a panic.
    pub fn tick(&mut self, timestamp: Duration) -> Command {
        let dt = match self.last {
            Some(previous) => timestamp.saturating_sub(previous),
            None => Duration::ZERO,
        };
        self.last = Some(timestamp);
        Command::Tick { dt }
    }

    /// Forgets the previous frame so the next tick carries a zero delta.
    pub fn pause(&mut self) {
        self.last = None;
    }
}

/// Shared flag that stops a running clock loop.
///
/// Cloned handles observe the same flag, so the loop owner can hand a token
/// to another thread or callback and cancel from there.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token in the running state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the loop stop after the current frame.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Drains a frame source into a command sink until it is exhausted or the
/// token is cancelled. The token is checked before each frame, so a cancel
/// issued from inside `sink` halts before the next tick.
pub fn run<S, K>(clock: &mut GameClock, token: &CancelToken, mut frames: S, mut sink: K)
where
    S: FnMut() -> Option<Duration>,
    K: FnMut(Command),
{
    while !token.is_cancelled() {
        let Some(timestamp) = frames() else {
            return;
        };
        sink(clock.tick(timestamp));
    }
}
