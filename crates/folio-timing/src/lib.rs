//! Folio Timing
//!
//! Rate-limiting primitives for a single-threaded event loop.
//!
//! - [`throttle`]: at most one call per interval, trailing call keeps the
//!   latest arguments
//! - [`debounce`]: one call after a quiet period
//!
//! Each wrapper is built on a pure gate ([`ThrottleGate`], [`DebounceGate`])
//! that takes explicit timestamps, plus a [`Scheduler`] that owns the timers.
//! Tasks run on the caller's thread; nothing here is `Send`.

mod debounce;
mod scheduler;
mod throttle;

pub use debounce::{debounce, DebounceGate, Debounced};
pub use scheduler::{ManualScheduler, Scheduler, Task, TaskId};
pub use throttle::{throttle, Admission, ThrottleGate, Throttled};
