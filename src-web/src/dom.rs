//! DOM-backed page host

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Node, ScrollIntoViewOptions, Window};

use folio_core::{
    Config, CoreError, MenuState, PageHost, Result, ScrollBehavior, Theme, Viewport,
};

pub const THEME_TOGGLE_ID: &str = "themeToggle";
pub const MENU_TOGGLE_ID: &str = "menuToggle";
pub const BACK_TO_TOP_ID: &str = "backToTop";
pub const NAV_ITEMS_SELECTOR: &str = ".nav-items";
pub const NAV_LINK_SELECTOR: &str = ".nav-items a[data-target]";

/// Class on the nav list while the menu is open
const MENU_OPEN_CLASS: &str = "show";
/// Class on the body while the menu is open
const BODY_MENU_OPEN_CLASS: &str = "nav-open";

pub(crate) fn host_error(context: &str, err: JsValue) -> CoreError {
    CoreError::Host(format!("{}: {:?}", context, err))
}

/// Optional controls. A missing control disables its feature.
struct Controls {
    theme_toggle: Option<Element>,
    menu_toggle: Option<Element>,
    nav_items: Option<Element>,
    back_to_top: Option<HtmlElement>,
}

impl Controls {
    fn find(document: &Document) -> Self {
        let by_id = |id: &str| {
            let element = document.get_element_by_id(id);
            if element.is_none() {
                tracing::warn!(id = %id, "Control not found; feature disabled");
            }
            element
        };

        let theme_toggle = by_id(THEME_TOGGLE_ID);
        let menu_toggle = by_id(MENU_TOGGLE_ID);
        let back_to_top = by_id(BACK_TO_TOP_ID).and_then(|e| e.dyn_into::<HtmlElement>().ok());

        let nav_items = document.query_selector(NAV_ITEMS_SELECTOR).ok().flatten();
        if nav_items.is_none() {
            tracing::warn!(selector = NAV_ITEMS_SELECTOR, "Navigation list not found");
        }

        Self {
            theme_toggle,
            menu_toggle,
            nav_items,
            back_to_top,
        }
    }
}

pub struct DomHost {
    window: Window,
    document: Document,
    body: HtmlElement,
    sections: Vec<Element>,
    controls: Controls,
}

impl DomHost {
    /// Look up the page structure. Sections are required; controls are not.
    pub fn attach(window: &Window, config: &Config) -> Result<Self> {
        let document = window
            .document()
            .ok_or_else(|| CoreError::MissingElement("document".to_string()))?;
        let body = document
            .body()
            .ok_or_else(|| CoreError::MissingElement("body".to_string()))?;

        let selector = config.section_selector();
        let nodes = document
            .query_selector_all(&selector)
            .map_err(|e| host_error("query sections", e))?;
        let sections: Vec<Element> = (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect();

        if sections.is_empty() {
            return Err(CoreError::MissingElement(selector));
        }

        tracing::info!(count = sections.len(), selector = %selector, "Sections found");

        Ok(Self {
            window: window.clone(),
            controls: Controls::find(&document),
            document,
            body,
            sections,
        })
    }

    /// Section ids in document order.
    pub fn section_ids(&self) -> Vec<String> {
        self.sections.iter().map(Element::id).collect()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn body(&self) -> &HtmlElement {
        &self.body
    }

    pub fn theme_toggle(&self) -> Option<&Element> {
        self.controls.theme_toggle.as_ref()
    }

    pub fn menu_toggle(&self) -> Option<&Element> {
        self.controls.menu_toggle.as_ref()
    }

    pub fn back_to_top(&self) -> Option<&HtmlElement> {
        self.controls.back_to_top.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        let height = self
            .window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0);
        Viewport::new(scroll_y, height)
    }

    pub fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0)
    }

    pub fn location(&self) -> String {
        self.window.location().href().unwrap_or_else(|_| "/".to_string())
    }

    /// True if `target` sits inside the menu toggle or the nav list.
    pub fn is_inside_menu(&self, target: Option<&Node>) -> bool {
        let Some(target) = target else {
            return false;
        };
        [&self.controls.menu_toggle, &self.controls.nav_items]
            .into_iter()
            .flatten()
            .any(|control| control.contains(Some(target)))
    }
}

impl PageHost for DomHost {
    fn scroll_to_section(&self, index: usize, behavior: ScrollBehavior) -> Result<()> {
        let section = self
            .sections
            .get(index)
            .ok_or_else(|| CoreError::MissingElement(format!("section #{}", index)))?;

        let options = ScrollIntoViewOptions::new();
        options.set_behavior(match behavior {
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
        });
        section.scroll_into_view_with_scroll_into_view_options(&options);
        Ok(())
    }

    fn push_url(&self, path: &str) -> Result<()> {
        self.window
            .history()
            .and_then(|h| h.push_state_with_url(&JsValue::NULL, "", Some(path)))
            .map_err(|e| host_error("pushState", e))
    }

    fn replace_url(&self, path: &str) -> Result<()> {
        self.window
            .history()
            .and_then(|h| h.replace_state_with_url(&JsValue::NULL, "", Some(path)))
            .map_err(|e| host_error("replaceState", e))
    }

    fn set_back_to_top_visible(&self, visible: bool) -> Result<()> {
        let Some(button) = &self.controls.back_to_top else {
            return Ok(());
        };

        let (opacity, pointer_events) = if visible { ("0.8", "auto") } else { ("0", "none") };
        let style = button.style();
        style
            .set_property("opacity", opacity)
            .and_then(|_| style.set_property("pointer-events", pointer_events))
            .map_err(|e| host_error("back-to-top style", e))
    }

    fn apply_theme(&self, theme: Theme) -> Result<()> {
        let classes = self.body.class_list();
        classes
            .remove_1(theme.toggled().as_str())
            .and_then(|_| classes.add_1(theme.as_str()))
            .map_err(|e| host_error("theme class", e))?;

        if let Some(toggle) = &self.controls.theme_toggle {
            toggle.set_text_content(Some(theme.icon()));
        }
        Ok(())
    }

    fn set_menu_open(&self, open: bool) -> Result<()> {
        if let Some(nav_items) = &self.controls.nav_items {
            nav_items
                .class_list()
                .toggle_with_force(MENU_OPEN_CLASS, open)
                .map_err(|e| host_error("menu class", e))?;
        }
        if let Some(toggle) = &self.controls.menu_toggle {
            toggle.set_text_content(Some(MenuState::glyph_for(open)));
        }
        self.body
            .class_list()
            .toggle_with_force(BODY_MENU_OPEN_CLASS, open)
            .map_err(|e| host_error("body menu class", e))?;
        Ok(())
    }

    fn reveal(&self) -> Result<()> {
        self.body
            .style()
            .set_property("opacity", "1")
            .map_err(|e| host_error("reveal", e))
    }
}
