//! Folio Navigation
//!
//! The section-snapping navigator for a one-page site of full-screen
//! sections:
//! - Index state: which section is current
//! - Input events: wheel, scroll, resize, keys, history, links
//! - Scroll lock: one transition per wheel gesture
//! - Transitions: what the host must scroll and write to the URL

mod config;
mod effect;
mod error;
mod index;
mod input;
mod navigator;
mod section;
mod state;

pub use config::NavigatorConfig;
pub use effect::{GoTo, HistoryUpdate, LockTicket, ScrollBehavior, Transition};
pub use error::NavigationError;
pub use index::{index_for_offset, IndexState};
pub use input::{InputEvent, NavKey, Viewport};
pub use navigator::Navigator;
pub use section::{location_path, Section, Sections, DEFAULT_SLUG};
pub use state::GestureState;

pub type Result<T> = std::result::Result<T, NavigationError>;
