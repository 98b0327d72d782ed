//! Navigator configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::NavigationError;
use crate::section::DEFAULT_SLUG;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// How long a wheel transition holds the scroll lock
    pub cooldown_ms: u64,
    /// Minimum spacing between handled wheel events
    pub wheel_throttle_ms: u64,
    /// Minimum spacing between handled scroll events
    pub scroll_throttle_ms: u64,
    /// Quiet period before a resize is handled
    pub resize_debounce_ms: u64,
    /// Rewrite the URL when free scrolling lands on another section
    pub update_url_on_scroll: bool,
    /// Track back-to-top button visibility
    pub enable_back_to_top: bool,
    /// Every animated commit takes the scroll lock, and passive scroll
    /// re-sync waits for it
    pub unified_lock: bool,
    /// Slug the root path resolves to
    pub default_slug: String,
}

impl NavigatorConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn wheel_throttle(&self) -> Duration {
        Duration::from_millis(self.wheel_throttle_ms)
    }

    pub fn scroll_throttle(&self) -> Duration {
        Duration::from_millis(self.scroll_throttle_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn validate(&self) -> Result<()> {
        let windows = [
            ("cooldown_ms", self.cooldown_ms),
            ("wheel_throttle_ms", self.wheel_throttle_ms),
            ("scroll_throttle_ms", self.scroll_throttle_ms),
            ("resize_debounce_ms", self.resize_debounce_ms),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, ms)| *ms == 0) {
            return Err(NavigationError::InvalidConfig(format!(
                "{} must be greater than zero",
                name
            )));
        }

        if self.default_slug.trim().is_empty() {
            return Err(NavigationError::InvalidConfig(
                "default_slug cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 400,
            wheel_throttle_ms: 100,
            scroll_throttle_ms: 100,
            resize_debounce_ms: 250,
            update_url_on_scroll: true,
            enable_back_to_top: true,
            unified_lock: true,
            default_slug: DEFAULT_SLUG.to_string(),
        }
    }
}
