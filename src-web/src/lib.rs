//! Folio Web
//!
//! Browser entry point: binds the site to the DOM, `localStorage` and
//! browser timers, then wires page events to it.

mod dom;
mod events;
mod perf;
mod storage;
mod timers;

pub use dom::DomHost;
pub use storage::LocalStorage;
pub use timers::BrowserScheduler;

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{Document, DocumentReadyState, Window};

use folio_core::{Config, CoreError, Result, Scheduler, Sections, SettingsStore, Site};

/// Body attribute holding optional JSON configuration
const CONFIG_ATTRIBUTE: &str = "data-folio-config";

#[wasm_bindgen(start)]
pub fn start() -> std::result::Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already installed".into());
    }

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if document.ready_state() == DocumentReadyState::Loading {
        let window_for_boot = window.clone();
        let on_ready = Closure::once_into_js(move || run(&window_for_boot));
        document.add_event_listener_with_callback(
            "DOMContentLoaded",
            on_ready.unchecked_ref(),
        )?;
        Ok(())
    } else {
        run(&window);
        Ok(())
    }
}

fn run(window: &Window) {
    if let Err(e) = boot(window) {
        tracing::error!(error = %e, "Site failed to start");
    }
}

fn boot(window: &Window) -> Result<()> {
    let document = window
        .document()
        .ok_or_else(|| CoreError::MissingElement("document".to_string()))?;
    let config = read_config(&document)?;

    let host = Rc::new(DomHost::attach(window, &config)?);
    let sections = Sections::new(host.section_ids())?;
    let scheduler: Rc<dyn Scheduler> = Rc::new(BrowserScheduler::new(window));
    let store: Rc<dyn SettingsStore> = Rc::new(LocalStorage::from_window(window));

    let site = Rc::new(Site::new(&config, sections, host.clone(), scheduler, store)?);
    events::bind(window, &site, &host)?;

    perf::preload_images(&config.preload_images);
    site.start(&host.location())?;

    Ok(())
}

fn read_config(document: &Document) -> Result<Config> {
    let attribute = document
        .body()
        .and_then(|body| body.get_attribute(CONFIG_ATTRIBUTE));
    config_from_attribute(attribute.as_deref())
}

/// Parse the configuration attribute; absent or blank means defaults.
fn config_from_attribute(attribute: Option<&str>) -> Result<Config> {
    match attribute.map(str::trim) {
        Some(json) if !json.is_empty() => Config::from_json(json),
        _ => Ok(Config::default()),
    }
}
