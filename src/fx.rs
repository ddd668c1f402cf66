//! Page-level effects with no gauge involvement: theme persistence, smooth
//! scroll-to-top, reduced-motion handling, feature detection, and the
//! console-backed analytics stub.

use wasm_bindgen::prelude::*;
use web_sys::{window, ScrollBehavior, ScrollToOptions};

const THEME_KEY: &str = "theme";
const DARK_CLASS: &str = "dark-theme";

/// Flip the dark theme on `<body>` and persist the choice in localStorage.
#[wasm_bindgen]
pub fn toggle_theme() {
    let Some(win) = window() else { return };
    let Some(body) = win.document().and_then(|d| d.body()) else { return };
    let is_dark = body.class_list().toggle(DARK_CLASS).unwrap_or(false);
    if let Ok(Some(storage)) = win.local_storage() {
        let _ = storage.set_item(THEME_KEY, if is_dark { "dark" } else { "light" });
    }
}

/// Re-apply the theme saved by a previous visit, if any.
pub fn load_saved_theme() {
    let Some(win) = window() else { return };
    let saved = match win.local_storage() {
        Ok(Some(storage)) => storage.get_item(THEME_KEY).ok().flatten(),
        _ => None,
    };
    if saved.as_deref() == Some("dark") {
        if let Some(body) = win.document().and_then(|d| d.body()) {
            let _ = body.class_list().add_1(DARK_CLASS);
        }
    }
}

/// Smooth-scroll the page back to the top.
#[wasm_bindgen]
pub fn scroll_to_top() {
    if let Some(win) = window() {
        let opts = ScrollToOptions::new();
        opts.set_top(0.0);
        opts.set_behavior(ScrollBehavior::Smooth);
        win.scroll_to_with_scroll_to_options(&opts);
    }
}

/// Tag `<body>` when the user prefers reduced motion; CSS shortens or
/// disables the transitions accordingly.
pub fn apply_reduced_motion_preference() {
    let Some(win) = window() else { return };
    let reduced = win
        .match_media("(prefers-reduced-motion: reduce)")
        .ok()
        .flatten()
        .map(|mq| mq.matches())
        .unwrap_or(false);
    if reduced {
        if let Some(body) = win.document().and_then(|d| d.body()) {
            let _ = body.class_list().add_1("reduced-motion");
        }
    }
}

/// Whether the host window exposes IntersectionObserver; drives the
/// reveal-everything fallback path when false.
pub fn supports_intersection_observer() -> bool {
    window()
        .map(|win| {
            js_sys::Reflect::has(win.as_ref(), &JsValue::from_str("IntersectionObserver"))
                .unwrap_or(false)
        })
        .unwrap_or(false)
}

/// Analytics stub: logs the event name and property payload to the console.
/// No network or persistence; a real tracker would hook in here.
pub fn track_event(name: &str, props: &[(&str, JsValue)]) {
    let payload = js_sys::Object::new();
    for (key, value) in props {
        let _ = js_sys::Reflect::set(&payload, &JsValue::from_str(key), value);
    }
    web_sys::console::log_3(&JsValue::from_str("event:"), &JsValue::from_str(name), &payload);
}

/// Fire the boot-time page view event with the current path.
pub fn track_page_view() {
    let path = window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default();
    track_event("page_view", &[("page", JsValue::from_str(&path))]);
}
