//! Timer scheduling
//!
//! [`Scheduler`] is the event-loop seam: the browser build implements it with
//! `setTimeout`, tests use [`ManualScheduler`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

pub type Task = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

pub trait Scheduler {
    /// Monotonic time elapsed since the scheduler's origin.
    fn now(&self) -> Duration;

    /// Run `task` once after `delay`, on the same thread, after the current
    /// handler has returned.
    fn schedule(&self, delay: Duration, task: Task) -> TaskId;

    /// Drop a task that has not run yet. Unknown or finished ids are ignored.
    fn cancel(&self, id: TaskId);
}

impl<T: Scheduler + ?Sized> Scheduler for Rc<T> {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn schedule(&self, delay: Duration, task: Task) -> TaskId {
        (**self).schedule(delay, task)
    }

    fn cancel(&self, id: TaskId) {
        (**self).cancel(id)
    }
}

/// Virtual-time scheduler. Time only moves when [`advance`](Self::advance)
/// is called; due tasks run in deadline order, ties in scheduling order.
///
/// Clones share the same clock and queue.
#[derive(Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<ManualInner>>,
}

#[derive(Default)]
struct ManualInner {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, TaskId), Task>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward, running every task that falls due on the way.
    /// Returns the number of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.inner.borrow().now + by;
        let mut ran = 0;

        while let Some(task) = self.pop_due(target) {
            task();
            ran += 1;
        }

        self.inner.borrow_mut().now = target;
        ran
    }

    /// Run tasks until the queue is empty, moving the clock to each deadline.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = self.inner.borrow().queue.keys().next().map(|(at, _)| *at);
            let Some(at) = next else {
                return ran;
            };
            let now = self.now();
            ran += self.advance(at.saturating_sub(now));
        }
    }

    pub fn pending(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    fn pop_due(&self, target: Duration) -> Option<Task> {
        let mut inner = self.inner.borrow_mut();
        let key = *inner.queue.keys().next()?;
        if key.0 > target {
            return None;
        }
        inner.now = key.0;
        inner.queue.remove(&key)
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    fn schedule(&self, delay: Duration, task: Task) -> TaskId {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = TaskId(inner.next_id);
        let at = inner.now + delay;
        inner.queue.insert((at, id), task);
        id
    }

    fn cancel(&self, id: TaskId) {
        self.inner
            .borrow_mut()
            .queue
            .retain(|(_, queued), _| *queued != id);
    }
}

impl Clone for ManualScheduler {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Drops the sub-millisecond part of every delay, like a host whose timers
/// take whole milliseconds.
#[cfg(test)]
pub(crate) struct WholeMillis(pub ManualScheduler);

#[cfg(test)]
impl Scheduler for WholeMillis {
    fn now(&self) -> Duration {
        self.0.now()
    }

    fn schedule(&self, delay: Duration, task: Task) -> TaskId {
        let whole = Duration::from_millis(delay.as_millis() as u64);
        self.0.schedule(whole, task)
    }

    fn cancel(&self, id: TaskId) {
        self.0.cancel(id)
    }
}
