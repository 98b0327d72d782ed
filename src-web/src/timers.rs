//! Browser-backed scheduler

use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Duration;
use web_sys::{Performance, Window};

use folio_timing::{Scheduler, Task, TaskId};

/// Schedules tasks with `setTimeout` and reads time from
/// `performance.now()`.
///
/// A finished timer is dropped on a later `schedule` or `cancel` call rather
/// than from inside its own callback.
pub struct BrowserScheduler {
    performance: Option<Performance>,
    timers: Rc<RefCell<Timers>>,
}

#[derive(Default)]
struct Timers {
    next_id: u64,
    active: HashMap<TaskId, Timeout>,
    finished: Vec<TaskId>,
}

impl Timers {
    fn purge(&mut self) {
        for id in self.finished.drain(..) {
            self.active.remove(&id);
        }
    }
}

impl BrowserScheduler {
    pub fn new(window: &Window) -> Self {
        Self {
            performance: window.performance(),
            timers: Rc::default(),
        }
    }
}

/// `setTimeout` takes whole milliseconds; round up so a timer never wakes
/// before its deadline.
pub(crate) fn timeout_millis(delay: Duration) -> u32 {
    u32::try_from(delay.as_nanos().div_ceil(1_000_000)).unwrap_or(u32::MAX)
}

/// Milliseconds from a high-resolution clock as a `Duration`.
pub(crate) fn duration_from_millis(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::from_secs_f64(ms / 1000.0)
    } else {
        Duration::ZERO
    }
}

impl Scheduler for BrowserScheduler {
    fn now(&self) -> Duration {
        let ms = match &self.performance {
            Some(performance) => performance.now(),
            None => js_sys::Date::now(),
        };
        duration_from_millis(ms)
    }

    fn schedule(&self, delay: Duration, task: Task) -> TaskId {
        let mut timers = self.timers.borrow_mut();
        timers.purge();
        timers.next_id += 1;
        let id = TaskId::new(timers.next_id);

        let weak: Weak<RefCell<Timers>> = Rc::downgrade(&self.timers);
        let timeout = Timeout::new(timeout_millis(delay), move || {
            task();
            if let Some(timers) = weak.upgrade() {
                timers.borrow_mut().finished.push(id);
            }
        });

        timers.active.insert(id, timeout);
        id
    }

    fn cancel(&self, id: TaskId) {
        let mut timers = self.timers.borrow_mut();
        timers.purge();
        // Dropping a pending Timeout clears it.
        timers.active.remove(&id);
    }
}
