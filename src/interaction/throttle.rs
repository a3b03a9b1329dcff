use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Roughly 30 redraws per second.
pub const DEFAULT_REDRAW_INTERVAL: Duration = Duration::from_millis(33);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThrottleState {
    Idle,
    Pending { deadline: Duration },
}

/// Drops pointer-move work that arrives within `interval` of the last
/// accepted event.
///
/// Time is supplied by the caller as a monotonic duration since any fixed
/// epoch, which keeps the state machine deterministic under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedrawThrottle {
    interval: Duration,
    state: ThrottleState,
}

impl Default for RedrawThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_REDRAW_INTERVAL)
    }
}

impl RedrawThrottle {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            state: ThrottleState::Idle,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn state(&self) -> ThrottleState {
        self.state
    }

    /// Returns `true` when the event may proceed and opens a new window.
    pub fn try_acquire(&mut self, now: Duration) -> bool {
        self.poll(now);
        if let ThrottleState::Pending { .. } = self.state {
            return false;
        }
        self.state = ThrottleState::Pending {
            deadline: now.saturating_add(self.interval),
        };
        true
    }

    /// Expires the pending window once `now` reaches its deadline.
    pub fn poll(&mut self, now: Duration) -> ThrottleState {
        if let ThrottleState::Pending { deadline } = self.state {
            if now >= deadline {
                self.state = ThrottleState::Idle;
            }
        }
        self.state
    }

    pub fn reset(&mut self) {
        self.state = ThrottleState::Idle;
    }
}
