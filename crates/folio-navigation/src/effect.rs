//! Navigation effects
//!
//! A committed index change is described by a [`Transition`]; the host
//! applies it (scroll, then URL) and arms the lock release timer.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    /// Jump without animation (initial load)
    Instant,
    /// Animated scroll
    Smooth,
}

impl ScrollBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollBehavior::Instant => "instant",
            ScrollBehavior::Smooth => "smooth",
        }
    }
}

/// How a commit touches browser history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryUpdate {
    /// New entry; for deliberate jumps such as menu links
    Push,
    /// Rewrite the current entry; for ambient corrections
    Replace,
    /// Leave the URL alone
    Skip,
}

/// Options for an explicit jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoTo {
    pub scroll: Option<ScrollBehavior>,
    pub history: HistoryUpdate,
}

impl GoTo {
    pub fn smooth_push() -> Self {
        Self {
            scroll: Some(ScrollBehavior::Smooth),
            history: HistoryUpdate::Push,
        }
    }

    pub fn smooth_replace() -> Self {
        Self {
            scroll: Some(ScrollBehavior::Smooth),
            history: HistoryUpdate::Replace,
        }
    }

    pub fn instant_replace() -> Self {
        Self {
            scroll: Some(ScrollBehavior::Instant),
            history: HistoryUpdate::Replace,
        }
    }

    /// Update the index only.
    pub fn silent() -> Self {
        Self {
            scroll: None,
            history: HistoryUpdate::Skip,
        }
    }
}

/// An engaged scroll lock. The host delivers
/// `InputEvent::CooldownElapsed { generation }` after `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockTicket {
    pub generation: u64,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub index: usize,
    pub slug: String,
    pub path: String,
    /// `None` when the viewport is already there
    pub scroll: Option<ScrollBehavior>,
    pub history: HistoryUpdate,
    pub lock: Option<LockTicket>,
}

impl Transition {
    /// Neither scrolls nor touches the URL.
    pub fn is_silent(&self) -> bool {
        self.scroll.is_none() && self.history == HistoryUpdate::Skip
    }
}
