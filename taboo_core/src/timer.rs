use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Expired,
}

/// Emitted exactly once per run, on the `Running -> Expired` transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal {
    Expired,
}

/// Countdown clock for one turn. The core never sleeps: the driver measures
/// wall time between events and feeds it in through `tick`, so the timer is
/// deterministic under test and cancellable at any event boundary.
#[derive(Debug, Clone)]
pub struct TurnTimer {
    state: TimerState,
    remaining: Duration,
}

impl TurnTimer {
    pub fn new() -> Self {
        TurnTimer {
            state: TimerState::Idle,
            remaining: Duration::ZERO,
        }
    }

    pub fn start(&mut self, duration: Duration) {
        self.remaining = duration;
        self.state = TimerState::Running;
    }

    /// Freezes the remaining time. Safe to call at any point; only a running
    /// timer transitions.
    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == TimerState::Paused {
            self.state = TimerState::Running;
        }
    }

    /// Discards the remaining time and returns to `Idle`. Never commits
    /// anything; abandoning a turn goes through here.
    pub fn abort(&mut self) {
        self.state = TimerState::Idle;
        self.remaining = Duration::ZERO;
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.state == TimerState::Expired
    }

    /// Advances the countdown by `elapsed`. Paused and idle timers ignore
    /// ticks, so no time is counted across a pause/resume cycle.
    pub fn tick(&mut self, elapsed: Duration) -> Option<TimerSignal> {
        if self.state != TimerState::Running {
            return None;
        }
        if elapsed >= self.remaining {
            self.remaining = Duration::ZERO;
            self.state = TimerState::Expired;
            Some(TimerSignal::Expired)
        } else {
            self.remaining -= elapsed;
            None
        }
    }
}

impl Default for TurnTimer {
    fn default() -> Self {
        Self::new()
    }
}
