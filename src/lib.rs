//! folio-rings core crate.
//!
//! Client-side presentation layer for a portfolio page, compiled to WASM:
//! scroll-triggered reveal animations, animated circular skill gauges,
//! lazy image loading, a scroll-to-top control, theme persistence and
//! print-mode adjustments. The gauge geometry and fill state machine live
//! in [`gauge`] as pure Rust; [`page`] binds them to the DOM.

use wasm_bindgen::prelude::*;

pub mod gauge;
pub mod reveal;

mod fx;
mod page;

pub use fx::{scroll_to_top, toggle_theme};
pub use page::{PresenterConfig, debug_gauges, force_reveal_all};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Boot the page presenter with the default configuration. Call once after
/// the document has loaded.
#[wasm_bindgen]
pub fn start_portfolio() -> Result<(), JsValue> {
    page::boot(PresenterConfig::default())
}

/// Boot with a JSON configuration object (radius tiers, observer threshold
/// and margin, stagger and resize timing, resize policy). Unknown fields
/// fall back to their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_portfolio_with_config(json: &str) -> Result<(), JsValue> {
    let config: PresenterConfig =
        serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    page::boot(config)
}

pub(crate) fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
