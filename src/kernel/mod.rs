// Main loop plumbing: the engine, its job queues, input routing,
// inactivity tracking and background task polling.
// Single core, no preemption; every call runs to completion.

pub mod activity;
pub mod dispatch;
pub mod engine;
pub mod scheduler;
pub mod task;

pub use activity::{ActivityTracker, PollRate};
pub use dispatch::{Route, route};
pub use engine::Engine;
pub use scheduler::{Job, PushError, Scheduler};
pub use task::{Deadline, TaskPoll};
