//! Cancellable preview countdown
//!
//! A passive scheduled task: the front-end owns the clock and calls `tick`
//! once per interval.

use serde::{Deserialize, Serialize};

/// Result of advancing the countdown by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    /// Not running (never started, cancelled, or already expired)
    Idle,
    /// Still running with this many ticks left
    Remaining(u32),
    /// Reached zero on this tick
    Expired,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: u32,
    active: bool,
}

impl Countdown {
    /// Arm the countdown; restarting replaces any running count
    pub fn start(&mut self, ticks: u32) {
        self.remaining = ticks;
        self.active = true;
    }

    pub fn tick(&mut self) -> CountdownStep {
        if !self.active {
            return CountdownStep::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.active = false;
            CountdownStep::Expired
        } else {
            CountdownStep::Remaining(self.remaining)
        }
    }

    /// Stop without expiring. Returns whether a count was running.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.active;
        self.active = false;
        self.remaining = 0;
        was_active
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
