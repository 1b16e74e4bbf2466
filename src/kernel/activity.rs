// Inactivity tracking and an adaptive poll-rate hint
//
// The external power manager asks `sleep_due()`; the main loop asks
// `poll_interval_ms()` how long to wait before sampling keys again:
// - recent input: 10ms, responsive debouncing
// - a little while idle: 50ms
// - idle: 100ms, save power

use core::fmt;

pub const BASE_TICK_MS: u32 = 10;

/// Idle time before the poll rate drops a step.
const FAST_HOLD_MS: u64 = 200;
const NORMAL_HOLD_MS: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollRate {
    #[default]
    Fast,
    Normal,
    Slow,
}

impl PollRate {
    pub const fn interval_ms(self) -> u32 {
        let divisor = match self {
            PollRate::Fast => 1,
            PollRate::Normal => 5,
            PollRate::Slow => 10,
        };
        divisor * BASE_TICK_MS
    }
}

impl fmt::Display for PollRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollRate::Fast => write!(f, "Fast({}ms)", self.interval_ms()),
            PollRate::Normal => write!(f, "Normal({}ms)", self.interval_ms()),
            PollRate::Slow => write!(f, "Slow({}ms)", self.interval_ms()),
        }
    }
}

pub struct ActivityTracker {
    last_input_ms: u64,
    // 0 disables auto sleep
    sleep_after_ms: u64,
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityTracker {
    pub const fn new() -> Self {
        Self {
            last_input_ms: 0,
            sleep_after_ms: 0,
        }
    }

    pub fn on_input(&mut self, now_ms: u64) {
        self.last_input_ms = now_ms;
    }

    pub fn set_sleep_timeout_min(&mut self, minutes: u16) {
        self.sleep_after_ms = u64::from(minutes) * 60_000;
    }

    pub fn last_input_ms(&self) -> u64 {
        self.last_input_ms
    }

    pub fn idle_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_input_ms)
    }

    pub fn sleep_due(&self, now_ms: u64) -> bool {
        self.sleep_after_ms > 0 && self.idle_ms(now_ms) >= self.sleep_after_ms
    }

    pub fn poll_rate(&self, now_ms: u64) -> PollRate {
        match self.idle_ms(now_ms) {
            idle if idle < FAST_HOLD_MS => PollRate::Fast,
            idle if idle < FAST_HOLD_MS + NORMAL_HOLD_MS => PollRate::Normal,
            _ => PollRate::Slow,
        }
    }

    pub fn poll_interval_ms(&self, now_ms: u64) -> u32 {
        self.poll_rate(now_ms).interval_ms()
    }
}
