//! Light/dark theme with a persisted preference

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use folio_storage::SettingsStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    /// Toggle button glyph: what a click switches to.
    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}

/// Owns the current theme. Storage failures never block a toggle.
pub struct ThemeController {
    store: Rc<dyn SettingsStore>,
    key: String,
    current: Theme,
}

impl ThemeController {
    /// Read the stored preference once, falling back to `default`.
    pub fn load(store: Rc<dyn SettingsStore>, key: impl Into<String>, default: Theme) -> Self {
        let key = key.into();
        let current = match store.get(&key) {
            Ok(Some(value)) => value.parse::<Theme>().unwrap_or_else(|e: String| {
                tracing::warn!(key = %key, error = %e, "Ignoring stored theme");
                default
            }),
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Theme storage unavailable");
                default
            }
        };

        tracing::debug!(theme = %current, "Theme loaded");

        Self {
            store,
            key,
            current,
        }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn toggle(&mut self) -> Theme {
        self.set(self.current.toggled());
        self.current
    }

    pub fn set(&mut self, theme: Theme) {
        self.current = theme;
        if let Err(e) = self.store.set(&self.key, theme.as_str()) {
            tracing::warn!(key = %self.key, error = %e, "Failed to persist theme");
        }
        tracing::info!(theme = %theme, "Theme changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_storage::MemoryStore;

    #[test]
    fn test_theme_strings() {
        assert_eq!(Theme::Dark.as_str(), "dark");
        assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));
        assert!("Dark".parse::<Theme>().is_err());
        assert_eq!(Theme::Light.icon(), "🌙");
        assert_eq!(Theme::Dark.icon(), "☀️");
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }

    #[test]
    fn test_load_default_when_empty() {
        let store = MemoryStore::new();
        let theme = ThemeController::load(Rc::new(store), "theme", Theme::Light);
        assert_eq!(theme.current(), Theme::Light);
    }

    #[test]
    fn test_toggle_persists_across_reload() {
        let store = MemoryStore::new();

        let mut theme = ThemeController::load(Rc::new(store.clone()), "theme", Theme::Light);
        assert_eq!(theme.toggle(), Theme::Dark);
        assert_eq!(store.get("theme").unwrap(), Some("dark".to_string()));

        let reloaded = ThemeController::load(Rc::new(store), "theme", Theme::Light);
        assert_eq!(reloaded.current(), Theme::Dark);
    }

    #[test]
    fn test_garbage_value_falls_back() {
        let store = MemoryStore::new();
        store.set("theme", "purple").unwrap();
        let theme = ThemeController::load(Rc::new(store), "theme", Theme::Dark);
        assert_eq!(theme.current(), Theme::Dark);
    }

    #[test]
    fn test_unavailable_storage_still_toggles() {
        let mut theme =
            ThemeController::load(Rc::new(MemoryStore::unavailable()), "theme", Theme::Light);
        assert_eq!(theme.current(), Theme::Light);
        assert_eq!(theme.toggle(), Theme::Dark);
        assert_eq!(theme.toggle(), Theme::Light);
    }
}
