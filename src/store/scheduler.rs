//! Deferred store tasks and the clock that drives them
//!
//! Nothing here runs on its own. The host calls
//! [`LayoutStore::run_due_tasks`](super::LayoutStore::run_due_tasks) from its
//! event loop, and tests advance a [`ManualClock`] instead of sleeping.

use std::cell::{Cell, RefCell};
use std::time::{SystemTime, UNIX_EPOCH};

use super::LayoutStore;

/// Source of wall-clock milliseconds
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Real time, in milliseconds since the Unix epoch
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Hand-driven clock for tests
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

pub type Task = Box<dyn FnOnce(&LayoutStore)>;

struct Scheduled {
    id: TaskId,
    due_at: u64,
    task: Task,
}

/// Queue of tasks keyed by due time
#[derive(Default)]
pub struct Scheduler {
    tasks: RefCell<Vec<Scheduled>>,
    next_id: Cell<u64>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&self, due_at: u64, task: Task) -> TaskId {
        let id = TaskId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.tasks.borrow_mut().push(Scheduled { id, due_at, task });
        id
    }

    pub fn cancel(&self, id: TaskId) -> bool {
        let mut tasks = self.tasks.borrow_mut();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        tasks.len() != before
    }

    /// Remove and return every task due at or before `now`, earliest first
    /// (ties in scheduling order)
    pub fn take_due(&self, now: u64) -> Vec<Task> {
        let mut tasks = self.tasks.borrow_mut();
        let (mut due, pending): (Vec<_>, Vec<_>) =
            tasks.drain(..).partition(|t| t.due_at <= now);
        *tasks = pending;
        due.sort_by_key(|t| (t.due_at, t.id.0));
        due.into_iter().map(|t| t.task).collect()
    }

    /// Due time of the earliest pending task
    pub fn next_due(&self) -> Option<u64> {
        self.tasks.borrow().iter().map(|t| t.due_at).min()
    }

    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.tasks.borrow_mut().clear();
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.len())
            .field("next_due", &self.next_due())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_due_orders_and_keeps_pending() {
        let scheduler = Scheduler::new();
        scheduler.schedule(300, Box::new(|_| {}));
        scheduler.schedule(100, Box::new(|_| {}));
        scheduler.schedule(900, Box::new(|_| {}));

        assert_eq!(scheduler.take_due(50).len(), 0);
        assert_eq!(scheduler.take_due(300).len(), 2);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.next_due(), Some(900));
    }

    #[test]
    fn test_cancel() {
        let scheduler = Scheduler::new();
        let id = scheduler.schedule(10, Box::new(|_| {}));
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(1_000);
        clock.advance(500);
        assert_eq!(clock.now_ms(), 1_500);
        clock.set(10);
        assert_eq!(clock.now_ms(), 10);
    }
}
