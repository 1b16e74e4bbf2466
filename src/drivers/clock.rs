// Wall clock and network time sync.

use core::fmt;
use core::task::Poll;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WallTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl WallTime {
    /// "HH:MM", or "h:MM AM" style when `h24` is false.
    pub fn write_hm(&self, w: &mut impl fmt::Write, h24: bool) -> fmt::Result {
        if h24 {
            return write!(w, "{:02}:{:02}", self.hour, self.minute);
        }
        let suffix = if self.hour < 12 { "AM" } else { "PM" };
        let hour = match self.hour % 12 {
            0 => 12,
            h => h,
        };
        write!(w, "{}:{:02} {}", hour, self.minute, suffix)
    }

    pub fn write_date(&self, w: &mut impl fmt::Write) -> fmt::Result {
        write!(w, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncError {
    Unavailable,
    Failed,
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Unavailable => write!(f, "no network"),
            SyncError::Failed => write!(f, "time sync failed"),
        }
    }
}

pub trait Clock {
    /// None until the clock has been set once.
    fn now(&self) -> Option<WallTime>;

    fn start_sync(&mut self) -> Result<(), SyncError>;

    fn poll_sync(&mut self) -> Poll<Result<(), SyncError>>;

    /// Abandon an in-flight sync.
    fn cancel_sync(&mut self);
}
