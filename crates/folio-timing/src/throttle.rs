//! Throttle: at most one invocation per interval
//!
//! A call that arrives inside the interval becomes the single trailing call,
//! run when the interval lapses. Later calls in the same window only replace
//! its arguments.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::scheduler::{Scheduler, TaskId};

/// What the caller should do with a call offered to a [`ThrottleGate`].
#[derive(Debug, PartialEq, Eq)]
pub enum Admission<A> {
    /// Invoke now with these arguments.
    Run(A),
    /// Arguments stored as the trailing call; arm a timer for `delay`.
    Schedule(Duration),
    /// A trailing call was already armed; its arguments were replaced.
    Replaced,
}

/// Time-driven throttle state, with timestamps supplied by the caller.
#[derive(Debug)]
pub struct ThrottleGate<A> {
    interval: Duration,
    last_run: Option<Duration>,
    trailing: Option<(Duration, A)>,
}

impl<A> ThrottleGate<A> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
            trailing: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Offer a call made at `now`.
    ///
    /// On [`Admission::Run`] any trailing call is discarded; the caller should
    /// cancel the timer it armed for it.
    pub fn call(&mut self, now: Duration, args: A) -> Admission<A> {
        let due = self.last_run.map(|last| last + self.interval);

        match due {
            Some(due) if now < due => {
                if let Some((_, pending)) = self.trailing.as_mut() {
                    *pending = args;
                    Admission::Replaced
                } else {
                    self.trailing = Some((due, args));
                    Admission::Schedule(due - now)
                }
            }
            _ => {
                self.trailing = None;
                self.last_run = Some(now);
                Admission::Run(args)
            }
        }
    }

    /// Take the trailing call if it is due at `now`.
    pub fn fire(&mut self, now: Duration) -> Option<A> {
        match &self.trailing {
            Some((due, _)) if *due <= now => {
                let (_, args) = self.trailing.take()?;
                self.last_run = Some(now);
                Some(args)
            }
            _ => None,
        }
    }

    /// Take the trailing call regardless of its deadline.
    pub fn flush(&mut self, now: Duration) -> Option<A> {
        let (_, args) = self.trailing.take()?;
        self.last_run = Some(now);
        Some(args)
    }

    /// Drop the trailing call, returning its arguments.
    pub fn cancel(&mut self) -> Option<A> {
        self.trailing.take().map(|(_, args)| args)
    }

    pub fn has_trailing(&self) -> bool {
        self.trailing.is_some()
    }
}

/// A callback wrapped by [`throttle`].
pub struct Throttled<A: 'static> {
    shared: Rc<Shared<A>>,
}

struct Shared<A: 'static> {
    scheduler: Rc<dyn Scheduler>,
    gate: RefCell<ThrottleGate<A>>,
    timer: Cell<Option<TaskId>>,
    callback: RefCell<Box<dyn FnMut(A)>>,
}

/// Wrap `callback` so it runs at most once per `interval`.
///
/// The first call in a quiet period runs immediately. Calls inside the
/// interval collapse into one trailing call with the latest arguments.
pub fn throttle<A, F>(scheduler: Rc<dyn Scheduler>, interval: Duration, callback: F) -> Throttled<A>
where
    A: 'static,
    F: FnMut(A) + 'static,
{
    Throttled {
        shared: Rc::new(Shared {
            scheduler,
            gate: RefCell::new(ThrottleGate::new(interval)),
            timer: Cell::new(None),
            callback: RefCell::new(Box::new(callback)),
        }),
    }
}

impl<A: 'static> Throttled<A> {
    pub fn call(&self, args: A) {
        let shared = &self.shared;
        let now = shared.scheduler.now();
        let admission = shared.gate.borrow_mut().call(now, args);

        match admission {
            Admission::Run(args) => {
                shared.clear_timer();
                shared.invoke(args);
            }
            Admission::Schedule(delay) => {
                let weak: Weak<Shared<A>> = Rc::downgrade(shared);
                let id = shared.scheduler.schedule(
                    delay,
                    Box::new(move || {
                        if let Some(shared) = weak.upgrade() {
                            shared.fire();
                        }
                    }),
                );
                shared.timer.set(Some(id));
            }
            Admission::Replaced => {}
        }
    }

    /// Run the trailing call now, if there is one.
    pub fn flush(&self) {
        let now = self.shared.scheduler.now();
        let args = self.shared.gate.borrow_mut().flush(now);
        self.shared.clear_timer();
        if let Some(args) = args {
            self.shared.invoke(args);
        }
    }

    /// Drop the trailing call without running it.
    pub fn cancel(&self) {
        self.shared.gate.borrow_mut().cancel();
        self.shared.clear_timer();
    }

    pub fn is_pending(&self) -> bool {
        self.shared.gate.borrow().has_trailing()
    }
}

impl<A: 'static> Shared<A> {
    /// The armed timer elapsed. Every path that drops the trailing call
    /// also cancels this timer, so the call runs even when a host clock
    /// with coarser resolution wakes it slightly before the deadline.
    fn fire(&self) {
        self.timer.set(None);
        let now = self.scheduler.now();
        let args = self.gate.borrow_mut().flush(now);
        if let Some(args) = args {
            self.invoke(args);
        }
    }

    fn invoke(&self, args: A) {
        match self.callback.try_borrow_mut() {
            Ok(mut callback) => (*callback)(args),
            Err(_) => tracing::warn!("Throttled callback re-entered itself; call dropped"),
        }
    }

    fn clear_timer(&self) {
        if let Some(id) = self.timer.take() {
            self.scheduler.cancel(id);
        }
    }
}

impl<A: 'static> Drop for Shared<A> {
    fn drop(&mut self) {
        self.clear_timer();
    }
}
