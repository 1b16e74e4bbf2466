// Priority job queues drained once per loop iteration
// NOTE: fixed capacity per level, no allocation
use core::fmt;

use heapless::Deque;

use crate::board::action::ActionEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Input(ActionEvent),

    PollBackground,

    StatusTick,
    SaveSettings,
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Job::Input(ev) => write!(f, "Input({:?})", ev),
            Job::PollBackground => write!(f, "PollBackground"),
            Job::StatusTick => write!(f, "StatusTick"),
            Job::SaveSettings => write!(f, "SaveSettings"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    High = 0,
    Normal = 1,
    Low = 2,
}

impl Job {
    pub const fn priority(&self) -> Priority {
        match self {
            Job::Input(_) => Priority::High,
            Job::PollBackground => Priority::Normal,
            Job::StatusTick | Job::SaveSettings => Priority::Low,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum PushError {
    /// Queue for this priority level is full, contains the rejected job
    Full(Job),
}

impl fmt::Display for PushError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PushError::Full(job) => write!(f, "queue full, rejected {}", job),
        }
    }
}

/// FIFO of jobs for one priority level.
pub struct JobQueue<const N: usize> {
    jobs: Deque<Job, N>,
}

impl<const N: usize> JobQueue<N> {
    pub const fn new() -> Self {
        Self { jobs: Deque::new() }
    }

    pub fn push(&mut self, job: Job) -> Result<(), Job> {
        self.jobs.push_back(job)
    }

    pub fn pop(&mut self) -> Option<Job> {
        self.jobs.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn contains(&self, job: &Job) -> bool {
        self.jobs.iter().any(|j| j == job)
    }
}

impl<const N: usize> Default for JobQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Scheduler {
    high: JobQueue<8>,
    normal: JobQueue<4>,
    low: JobQueue<4>,
}

impl Scheduler {
    pub const fn new() -> Self {
        Self {
            high: JobQueue::new(),
            normal: JobQueue::new(),
            low: JobQueue::new(),
        }
    }

    fn queue_mut(&mut self, priority: Priority) -> &mut dyn QueueOps {
        match priority {
            Priority::High => &mut self.high,
            Priority::Normal => &mut self.normal,
            Priority::Low => &mut self.low,
        }
    }

    /// Rejects the job when its level is full.
    pub fn push(&mut self, job: Job) -> Result<(), PushError> {
        self.queue_mut(job.priority())
            .push_job(job)
            .map_err(PushError::Full)
    }

    /// No-op when an equal job is already waiting.
    pub fn push_unique(&mut self, job: Job) -> Result<(), PushError> {
        let queue = self.queue_mut(job.priority());
        if queue.has(&job) {
            return Ok(());
        }
        queue.push_job(job).map_err(PushError::Full)
    }

    pub fn pop(&mut self) -> Option<Job> {
        self.high
            .pop()
            .or_else(|| self.normal.pop())
            .or_else(|| self.low.pop())
    }

    pub fn is_empty(&self) -> bool {
        self.high.is_empty() && self.normal.is_empty() && self.low.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.high.len() + self.normal.len() + self.low.len()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

// lets the scheduler pick a queue by priority despite differing N
trait QueueOps {
    fn push_job(&mut self, job: Job) -> Result<(), Job>;
    fn has(&self, job: &Job) -> bool;
}

impl<const N: usize> QueueOps for JobQueue<N> {
    fn push_job(&mut self, job: Job) -> Result<(), Job> {
        self.push(job)
    }

    fn has(&self, job: &Job) -> bool {
        self.contains(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::action::Action;

    #[test]
    fn pops_by_priority_then_fifo() {
        let mut s = Scheduler::new();
        s.push(Job::StatusTick).unwrap();
        s.push(Job::PollBackground).unwrap();
        s.push(Job::Input(ActionEvent::Click(Action::Down))).unwrap();
        s.push(Job::Input(ActionEvent::Click(Action::Up))).unwrap();

        assert_eq!(s.pop(), Some(Job::Input(ActionEvent::Click(Action::Down))));
        assert_eq!(s.pop(), Some(Job::Input(ActionEvent::Click(Action::Up))));
        assert_eq!(s.pop(), Some(Job::PollBackground));
        assert_eq!(s.pop(), Some(Job::StatusTick));
        assert!(s.is_empty());
    }

    #[test]
    fn full_queue_rejects_job() {
        let mut s = Scheduler::new();
        for _ in 0..4 {
            s.push(Job::StatusTick).unwrap();
        }
        assert!(matches!(s.push(Job::SaveSettings), Err(PushError::Full(Job::SaveSettings))));
        assert_eq!(s.pending(), 4);
    }

    #[test]
    fn unique_push_dedups() {
        let mut s = Scheduler::new();
        s.push_unique(Job::SaveSettings).unwrap();
        s.push_unique(Job::SaveSettings).unwrap();
        assert_eq!(s.pending(), 1);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut q = JobQueue::<2>::new();
        for _ in 0..5 {
            q.push(Job::StatusTick).unwrap();
            assert_eq!(q.pop(), Some(Job::StatusTick));
        }
        assert!(q.is_empty());
    }
}
