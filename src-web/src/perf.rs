//! Image preloading and load timing

use wasm_bindgen::JsCast;
use web_sys::{HtmlImageElement, PerformanceNavigationTiming, Window};

/// Start fetching images the first screens need.
pub fn preload_images(sources: &[String]) {
    for src in sources {
        match HtmlImageElement::new() {
            Ok(image) => image.set_src(src),
            Err(e) => tracing::warn!(src = %src, error = ?e, "Failed to preload image"),
        }
    }
    tracing::debug!(count = sources.len(), "Images preloading");
}

/// Log `loadEventEnd - fetchStart` from navigation timing.
///
/// `loadEventEnd` is only set once the `load` handlers have returned, so
/// this runs from a zero-delay timeout scheduled by the `load` listener.
pub fn log_load_timing(window: &Window) {
    let Some(performance) = window.performance() else {
        return;
    };

    let timing = performance
        .get_entries_by_type("navigation")
        .get(0)
        .dyn_into::<PerformanceNavigationTiming>();

    match timing {
        Ok(timing) => {
            let load_ms = timing.load_event_end() - timing.fetch_start();
            tracing::info!(load_ms, "Page load time");
        }
        Err(_) => tracing::debug!("Navigation timing unavailable"),
    }
}
