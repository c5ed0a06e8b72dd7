//! Cooldown gate between accepted detections.

use std::time::{Duration, Instant};

/// Rate limiter for accepted signs. Time is always supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    wait: Duration,
    started_at: Option<Instant>,
}

impl Cooldown {
    /// An idle cooldown that waits `wait` once started.
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            started_at: None,
        }
    }

    /// Arm the cooldown at `now`.
    pub fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
    }

    /// True when never started, when the wait is zero, or once the wait has passed.
    pub fn is_elapsed(&self, now: Instant) -> bool {
        match self.started_at {
            None => true,
            Some(_) if self.wait.is_zero() => true,
            Some(t0) => now.saturating_duration_since(t0) >= self.wait,
        }
    }
}
