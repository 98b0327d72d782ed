//! The page host boundary
//!
//! Everything the site does to the page goes through [`PageHost`]. The
//! browser build implements it over the DOM; tests record the calls.

use folio_navigation::ScrollBehavior;

use crate::theme::Theme;
use crate::Result;

pub trait PageHost {
    /// Bring the section at `index` to the top of the viewport.
    fn scroll_to_section(&self, index: usize, behavior: ScrollBehavior) -> Result<()>;

    /// Add a history entry for `path`.
    fn push_url(&self, path: &str) -> Result<()>;

    /// Rewrite the current history entry to `path`.
    fn replace_url(&self, path: &str) -> Result<()>;

    fn set_back_to_top_visible(&self, visible: bool) -> Result<()>;

    /// Apply theme classes and the toggle icon.
    fn apply_theme(&self, theme: Theme) -> Result<()>;

    /// Apply menu classes and the toggle glyph.
    fn set_menu_open(&self, open: bool) -> Result<()>;

    /// Make the page visible once the initial section is in place.
    fn reveal(&self) -> Result<()>;
}
