//! Site configuration

use serde::{Deserialize, Serialize};

use folio_navigation::NavigatorConfig;

use crate::error::CoreError;
use crate::theme::Theme;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Navigator timing and behavior switches
    pub navigator: NavigatorConfig,
    /// Storage key holding the theme preference
    pub theme_key: String,
    /// Theme used when nothing usable is stored
    pub default_theme: Theme,
    /// CSS class shared by every section element
    pub section_class: String,
    /// Widest viewport, in CSS pixels, that gets the collapsible menu
    pub mobile_breakpoint: f64,
    /// Images fetched ahead of first paint
    pub preload_images: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            navigator: NavigatorConfig::default(),
            theme_key: "theme".to_string(),
            default_theme: Theme::Light,
            section_class: "screen".to_string(),
            mobile_breakpoint: 768.0,
            preload_images: vec![
                "images/logo.png".to_string(),
                "images/background_dark.png".to_string(),
                "images/background_light.png".to_string(),
            ],
        }
    }
}

impl Config {
    /// Parse a (possibly partial) JSON document over the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.navigator.validate()?;

        if self.theme_key.trim().is_empty() {
            return Err(CoreError::Config("theme_key cannot be empty".to_string()));
        }
        if self.section_class.trim().is_empty() {
            return Err(CoreError::Config(
                "section_class cannot be empty".to_string(),
            ));
        }
        if !(self.mobile_breakpoint.is_finite() && self.mobile_breakpoint >= 0.0) {
            return Err(CoreError::Config(format!(
                "mobile_breakpoint must be a non-negative width, got {}",
                self.mobile_breakpoint
            )));
        }

        Ok(())
    }

    /// CSS selector matching the section elements.
    pub fn section_selector(&self) -> String {
        format!(".{}", self.section_class.trim_start_matches('.'))
    }
}
