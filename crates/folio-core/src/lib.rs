//! Folio Core
//!
//! Coordination layer for a one-page site of full-screen sections:
//! the navigator, the theme and menu controls, and the [`PageHost`]
//! boundary the browser build implements.

mod config;
mod error;
mod host;
mod menu;
mod site;
mod theme;

pub use config::Config;
pub use error::CoreError;
pub use host::PageHost;
pub use menu::MenuState;
pub use site::Site;
pub use theme::{Theme, ThemeController};

// Re-export core components
pub use folio_navigation::{
    GestureState, GoTo, HistoryUpdate, InputEvent, NavKey, NavigationError, Navigator,
    NavigatorConfig, ScrollBehavior, Sections, Transition, Viewport,
};
pub use folio_storage::{MemoryStore, SettingsStore, StorageError};
pub use folio_timing::{ManualScheduler, Scheduler, TaskId};

pub type Result<T> = std::result::Result<T, CoreError>;
