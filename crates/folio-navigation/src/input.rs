//! Input events fed to the navigator
//!
//! Host adapters translate raw browser events into [`InputEvent`]s; the
//! navigator decides what, if anything, they commit.

use serde::{Deserialize, Serialize};

/// Scroll offset and viewport height at the time of an event, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scroll_y: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(scroll_y: f64, height: f64) -> Self {
        Self { scroll_y, height }
    }

    /// Scrolled past the first screen.
    pub fn past_first_screen(&self) -> bool {
        self.scroll_y > self.height
    }
}

/// Keys the navigator handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavKey {
    Next,
    Previous,
    First,
    Last,
}

impl NavKey {
    /// Map a `KeyboardEvent.key` value. Unhandled keys keep their default
    /// browser action.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowDown" | "PageDown" => Some(NavKey::Next),
            "ArrowUp" | "PageUp" => Some(NavKey::Previous),
            "Home" => Some(NavKey::First),
            "End" => Some(NavKey::Last),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Mouse wheel or trackpad step
    Wheel { delta_y: f64 },
    /// Passive scroll position change
    Scroll(Viewport),
    /// Viewport resized (debounced by the host)
    Resize(Viewport),
    /// Navigation key
    Key { key: NavKey },
    /// Browser back/forward landed on `location`
    PopState { location: String },
    /// Menu link pointing at a section slug
    LinkClick { slug: String },
    /// Back-to-top button
    BackToTop,
    /// A scroll lock's cooldown timer fired
    CooldownElapsed { generation: u64 },
}

impl InputEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            InputEvent::Wheel { .. } => "wheel",
            InputEvent::Scroll(_) => "scroll",
            InputEvent::Resize(_) => "resize",
            InputEvent::Key { .. } => "key",
            InputEvent::PopState { .. } => "popstate",
            InputEvent::LinkClick { .. } => "link",
            InputEvent::BackToTop => "back_to_top",
            InputEvent::CooldownElapsed { .. } => "cooldown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(NavKey::from_key("ArrowDown"), Some(NavKey::Next));
        assert_eq!(NavKey::from_key("PageDown"), Some(NavKey::Next));
        assert_eq!(NavKey::from_key("ArrowUp"), Some(NavKey::Previous));
        assert_eq!(NavKey::from_key("PageUp"), Some(NavKey::Previous));
        assert_eq!(NavKey::from_key("Home"), Some(NavKey::First));
        assert_eq!(NavKey::from_key("End"), Some(NavKey::Last));
        assert_eq!(NavKey::from_key("ArrowLeft"), None);
        assert_eq!(NavKey::from_key("end"), None);
    }

    #[test]
    fn test_event_json_shape() {
        let event: InputEvent =
            serde_json::from_str(r#"{"type":"wheel","delta_y":-120.0}"#).unwrap();
        assert_eq!(event, InputEvent::Wheel { delta_y: -120.0 });
        assert_eq!(event.kind(), "wheel");

        let event: InputEvent =
            serde_json::from_str(r#"{"type":"link_click","slug":"work"}"#).unwrap();
        assert_eq!(event.kind(), "link");
    }

    #[test]
    fn test_past_first_screen() {
        assert!(!Viewport::new(800.0, 800.0).past_first_screen());
        assert!(Viewport::new(801.0, 800.0).past_first_screen());
    }
}
