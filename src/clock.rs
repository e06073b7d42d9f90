//! Injectable clock abstraction.
//!
//! All "now" reads in the engine go through [`Clock`] so tests can
//! simulate arbitrary elapsed time without real waiting. Timestamps are
//! unix seconds.

use chrono::Utc;
use std::cell::Cell;

/// Source of the current wall-clock time in unix seconds.
pub trait Clock {
    fn now(&self) -> i64;
}

/// Production clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Manually driven clock for tests.
#[derive(Debug)]
pub struct ManualClock {
    seconds: Cell<i64>,
}

impl ManualClock {
    pub fn new(seconds: i64) -> Self {
        Self {
            seconds: Cell::new(seconds),
        }
    }

    pub fn set(&self, seconds: i64) {
        self.seconds.set(seconds);
    }

    pub fn advance(&self, delta: i64) {
        self.seconds.set(self.seconds.get() + delta);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.seconds.get()
    }
}
