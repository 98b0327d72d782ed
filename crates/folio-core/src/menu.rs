//! Collapsible navigation menu

/// Open/closed state of the small-screen menu.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuState {
    open: bool,
    breakpoint: f64,
}

impl MenuState {
    pub fn new(breakpoint: f64) -> Self {
        Self {
            open: false,
            breakpoint,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Flip the menu, returning the new state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Returns true if the menu was open.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }

    pub fn is_mobile(&self, viewport_width: f64) -> bool {
        viewport_width <= self.breakpoint
    }

    /// A click outside the toggle and the link list closes an open menu,
    /// but only on narrow viewports where the menu overlays the page.
    pub fn closes_on_click(&self, viewport_width: f64, inside_menu: bool) -> bool {
        self.open && !inside_menu && self.is_mobile(viewport_width)
    }

    pub fn glyph(&self) -> &'static str {
        Self::glyph_for(self.open)
    }

    /// Toggle glyph for a menu in the given state.
    pub fn glyph_for(open: bool) -> &'static str {
        if open {
            "✕"
        } else {
            "☰"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_close() {
        let mut menu = MenuState::new(768.0);
        assert!(!menu.is_open());
        assert_eq!(menu.glyph(), "☰");

        assert!(menu.toggle());
        assert_eq!(menu.glyph(), "✕");
        assert!(menu.close());
        assert!(!menu.close());
        assert!(!menu.is_open());
    }

    #[test]
    fn test_outside_click_rule() {
        let mut menu = MenuState::new(768.0);
        assert!(!menu.closes_on_click(400.0, false));

        menu.toggle();
        assert!(menu.closes_on_click(400.0, false));
        assert!(menu.closes_on_click(768.0, false));
        assert!(!menu.closes_on_click(400.0, true));
        assert!(!menu.closes_on_click(1024.0, false));
    }
}
