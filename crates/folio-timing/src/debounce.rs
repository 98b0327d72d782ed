//! Debounce: one invocation after a quiet period

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::scheduler::{Scheduler, TaskId};

/// Time-driven debounce state, with timestamps supplied by the caller.
#[derive(Debug)]
pub struct DebounceGate<A> {
    delay: Duration,
    pending: Option<(Duration, A)>,
}

impl<A> DebounceGate<A> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a call at `now`. Any earlier pending call is replaced and the
    /// deadline restarts; returns the delay to arm a timer for.
    pub fn call(&mut self, now: Duration, args: A) -> Duration {
        self.pending = Some((now + self.delay, args));
        self.delay
    }

    /// Take the pending call if the quiet period has elapsed at `now`.
    ///
    /// A timer that fires before the current deadline (one that was not
    /// cancelled in time) gets `None`.
    pub fn fire(&mut self, now: Duration) -> Option<A> {
        match &self.pending {
            Some((deadline, _)) if *deadline <= now => self.pending.take().map(|(_, args)| args),
            _ => None,
        }
    }

    pub fn flush(&mut self) -> Option<A> {
        self.pending.take().map(|(_, args)| args)
    }

    pub fn cancel(&mut self) -> Option<A> {
        self.pending.take().map(|(_, args)| args)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }
}

/// A callback wrapped by [`debounce`].
pub struct Debounced<A: 'static> {
    shared: Rc<Shared<A>>,
}

struct Shared<A: 'static> {
    scheduler: Rc<dyn Scheduler>,
    gate: RefCell<DebounceGate<A>>,
    timer: Cell<Option<TaskId>>,
    callback: RefCell<Box<dyn FnMut(A)>>,
}

/// Wrap `callback` so it runs once, `delay` after the last call.
pub fn debounce<A, F>(scheduler: Rc<dyn Scheduler>, delay: Duration, callback: F) -> Debounced<A>
where
    A: 'static,
    F: FnMut(A) + 'static,
{
    Debounced {
        shared: Rc::new(Shared {
            scheduler,
            gate: RefCell::new(DebounceGate::new(delay)),
            timer: Cell::new(None),
            callback: RefCell::new(Box::new(callback)),
        }),
    }
}

impl<A: 'static> Debounced<A> {
    pub fn call(&self, args: A) {
        let shared = &self.shared;
        let now = shared.scheduler.now();
        let delay = shared.gate.borrow_mut().call(now, args);

        shared.clear_timer();
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

    /// Run the pending call now instead of waiting out the delay.
    pub fn flush(&self) {
        let args = self.shared.gate.borrow_mut().flush();
        self.shared.clear_timer();
        if let Some(args) = args {
            self.shared.invoke(args);
        }
    }

    pub fn cancel(&self) {
        self.shared.gate.borrow_mut().cancel();
        self.shared.clear_timer();
    }

    pub fn is_pending(&self) -> bool {
        self.shared.gate.borrow().deadline().is_some()
    }
}

impl<A: 'static> Shared<A> {
    /// Each call re-arms the timer, so the one that fires belongs to the
    /// latest call even if it wakes a little before the deadline.
    fn fire(&self) {
        self.timer.set(None);
        let args = self.gate.borrow_mut().flush();
        if let Some(args) = args {
            self.invoke(args);
        }
    }

    fn invoke(&self, args: A) {
        match self.callback.try_borrow_mut() {
            Ok(mut callback) => (*callback)(args),
            Err(_) => tracing::warn!("Debounced callback re-entered itself; call dropped"),
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
