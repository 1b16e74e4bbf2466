// Background operations polled once per loop iteration.
//
// Collaborators answer with core::task::Poll; the deadline turns a
// Pending that has run too long into TimedOut.

use core::task::Poll;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskPoll<T> {
    Pending,
    Done(T),
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    started_ms: u64,
    timeout_ms: u64,
}

impl Deadline {
    pub const fn start(now_ms: u64, timeout_ms: u64) -> Self {
        Self {
            started_ms: now_ms,
            timeout_ms,
        }
    }

    pub fn elapsed(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_ms)
    }

    pub fn expired(&self, now_ms: u64) -> bool {
        self.elapsed(now_ms) >= self.timeout_ms
    }

    /// A ready result wins over an expired deadline.
    pub fn check<T>(&self, now_ms: u64, poll: Poll<T>) -> TaskPoll<T> {
        match poll {
            Poll::Ready(v) => TaskPoll::Done(v),
            Poll::Pending if self.expired(now_ms) => TaskPoll::TimedOut,
            Poll::Pending => TaskPoll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_until_deadline() {
        let d = Deadline::start(1_000, 10_000);
        assert_eq!(d.check::<()>(5_000, Poll::Pending), TaskPoll::Pending);
        assert_eq!(d.check::<()>(11_000, Poll::Pending), TaskPoll::TimedOut);
    }

    #[test]
    fn ready_result_beats_timeout() {
        let d = Deadline::start(0, 10);
        assert_eq!(d.check(50, Poll::Ready(7)), TaskPoll::Done(7));
    }
}
