//! Page event wiring
//!
//! Listeners live as long as the page, so their closures are leaked with
//! `forget` once registered.

use gloo_timers::callback::Timeout;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, DocumentReadyState, Element, Event, EventTarget, KeyboardEvent, Node,
    WheelEvent, Window,
};

use folio_core::{Result, Site};

use crate::dom::{host_error, DomHost, NAV_LINK_SELECTOR};
use crate::perf;

fn listen<F>(target: &EventTarget, kind: &str, passive: Option<bool>, handler: F) -> Result<()>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    let callback: &js_sys::Function = closure.as_ref().unchecked_ref();

    let registered = match passive {
        Some(passive) => {
            let options = AddEventListenerOptions::new();
            options.set_passive(passive);
            target.add_event_listener_with_callback_and_add_event_listener_options(
                kind, callback, &options,
            )
        }
        None => target.add_event_listener_with_callback(kind, callback),
    };
    registered.map_err(|e| host_error(kind, e))?;

    closure.forget();
    Ok(())
}

/// Register every page listener.
pub fn bind(window: &Window, site: &Rc<Site>, host: &Rc<DomHost>) -> Result<()> {
    // Not passive: the default scroll is cancelled for every wheel event.
    {
        let site = Rc::clone(site);
        listen(window, "wheel", Some(false), move |event| {
            event.prevent_default();
            if let Some(wheel) = event.dyn_ref::<WheelEvent>() {
                site.on_wheel(wheel.delta_y());
            }
        })?;
    }

    {
        let (site, host) = (Rc::clone(site), Rc::clone(host));
        listen(window, "scroll", Some(true), move |_| site.on_scroll(host.viewport()))?;
    }

    {
        let (site, host) = (Rc::clone(site), Rc::clone(host));
        listen(window, "resize", Some(true), move |_| site.on_resize(host.viewport()))?;
    }

    {
        let (site, host) = (Rc::clone(site), Rc::clone(host));
        listen(window, "popstate", None, move |_| site.on_pop_state(&host.location()))?;
    }

    {
        let site = Rc::clone(site);
        listen(host.document(), "keydown", None, move |event| {
            if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
                if site.on_key(&key.key()) {
                    event.prevent_default();
                }
            }
        })?;
    }

    {
        let (site, inner) = (Rc::clone(site), Rc::clone(host));
        listen(host.document(), "click", None, move |event| {
            let target = event.target();
            let node = target.as_ref().and_then(|t| t.dyn_ref::<Node>());
            site.on_document_click(inner.viewport_width(), inner.is_inside_menu(node));
        })?;
    }

    if let Some(toggle) = host.theme_toggle() {
        let site = Rc::clone(site);
        listen(toggle, "click", None, move |_| {
            site.toggle_theme();
        })?;
    }

    if let Some(toggle) = host.menu_toggle() {
        let site = Rc::clone(site);
        listen(toggle, "click", None, move |_| {
            site.toggle_menu();
        })?;
    }

    if let Some(button) = host.back_to_top() {
        let site = Rc::clone(site);
        listen(button, "click", None, move |_| site.on_back_to_top())?;
    }

    bind_nav_links(site, host)?;
    bind_load_timing(window, host.document().ready_state())?;

    tracing::debug!("Page listeners bound");
    Ok(())
}

/// The module usually boots after `load`; only wait for it if it is ahead.
fn load_already_fired(state: DocumentReadyState) -> bool {
    state == DocumentReadyState::Complete
}

fn bind_load_timing(window: &Window, state: DocumentReadyState) -> Result<()> {
    // `loadEventEnd` is only set once the load handlers have returned.
    let log_next_tick = |window: Window| {
        Timeout::new(0, move || perf::log_load_timing(&window)).forget();
    };

    if load_already_fired(state) {
        log_next_tick(window.clone());
        return Ok(());
    }

    let window_for_load = window.clone();
    listen(window, "load", None, move |_| {
        log_next_tick(window_for_load.clone())
    })
}

fn bind_nav_links(site: &Rc<Site>, host: &Rc<DomHost>) -> Result<()> {
    let links = host
        .document()
        .query_selector_all(NAV_LINK_SELECTOR)
        .map_err(|e| host_error("query nav links", e))?;

    for i in 0..links.length() {
        let Some(link) = links.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };

        let site = Rc::clone(site);
        let target = link.clone();
        listen(&link, "click", None, move |event| {
            event.prevent_default();
            match target.get_attribute("data-target") {
                Some(slug) => site.on_link_click(&slug),
                None => tracing::warn!("Navigation link without data-target"),
            }
        })?;
    }

    tracing::debug!(count = links.length(), "Navigation links bound");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_already_fired() {
        assert!(load_already_fired(DocumentReadyState::Complete));
        assert!(!load_already_fired(DocumentReadyState::Interactive));
        assert!(!load_already_fired(DocumentReadyState::Loading));
    }
}
