//! Millisecond clocks and interval scheduling
//!
//! The main loop reads the clock once per frame and hands the value to
//! everything that needs time, so one frame sees one consistent "now".

use std::cell::Cell;
use std::time::Instant;

/// Monotonic millisecond time source
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> u64;
}

/// Wall-clock backed monotonic time, starting at zero on creation
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Start a clock at zero
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock for simulations and tests
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    /// Clock reading `start_ms`
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Move time forward
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    /// Jump to an absolute reading; going backwards is ignored
    pub fn set(&self, ms: u64) {
        if ms > self.now.get() {
            self.now.set(ms);
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// "Every N milliseconds" as an explicit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTimer {
    interval_ms: u64,
    last_ms: Option<u64>,
}

impl IntervalTimer {
    /// Timer firing at most once per `interval_ms` (0 = every check)
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// Configured interval
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// True if the interval has elapsed; records `now_ms` as the last run.
    /// The first check is always due.
    pub fn due(&mut self, now_ms: u64) -> bool {
        let due = match self.last_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms,
        };
        if due {
            self.last_ms = Some(now_ms);
        }
        due
    }

    /// Forget the last run so the next check is due
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
