//! DOM side of the portfolio: the presenter wires the IntersectionObserver
//! reveal path, the gauge fill animations, lazy images, the resize debounce
//! and the scroll/print listeners. All mutation funnels through one
//! [`PresenterInner`] constructed at boot; closures capture `Rc` clones of it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlElement, HtmlImageElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, NodeList, SvgElement, Window, window,
};

use crate::fx;
use crate::gauge::{FillPlan, GaugeHandle, GaugeRegistry, GaugeSpec, GeometryUpdate};
use crate::reveal::{
    self, HEADER_DELAY_MS, ObserverConfig, REVEAL_SELECTORS, SCROLL_TOP_THRESHOLD_PX,
};

const SKILL_ITEM_SELECTOR: &str = ".skill-item";
const RING_SELECTOR: &str = ".progress-ring__progress";
const LABEL_SELECTOR: &str = ".progress-text";
const RING_INDEX_ATTR: &str = "data-ring-idx";
const REVEALED_ATTR: &str = "data-revealed";

/// Full presenter configuration, overridable from JS as JSON when the
/// `serde_json` feature is enabled.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PresenterConfig {
    pub render: crate::gauge::RenderConfig,
    pub observer: ObserverConfig,
    pub tiers: crate::gauge::RadiusTiers,
}

/// DOM nodes backing one registered gauge. Either sub-element may be absent;
/// the corresponding update step is then skipped silently.
struct GaugeBinding {
    ring: Option<SvgElement>,
    label: Option<Element>,
}

struct PresenterInner {
    window: Window,
    document: Document,
    registry: RefCell<GaugeRegistry>,
    bindings: RefCell<Vec<GaugeBinding>>,
    resize_timer: Cell<Option<i32>>,
    // Long-lived listener closures; dropped only with the presenter itself.
    listeners: RefCell<Vec<Closure<dyn FnMut()>>>,
    observer_callbacks: RefCell<Vec<Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>>>,
}

thread_local! {
    static PRESENTER: RefCell<Option<Rc<PresenterInner>>> = RefCell::new(None);
}

/// Build the presenter, register every gauge found in the document, and wire
/// all observers and listeners. Called once from the exported entry point.
pub(crate) fn boot(config: PresenterConfig) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win.document().ok_or_else(|| JsValue::from_str("no document"))?;

    let width = viewport_width(&win);
    let inner = Rc::new(PresenterInner {
        window: win,
        document: doc,
        registry: RefCell::new(GaugeRegistry::new(config.render, width)),
        bindings: RefCell::new(Vec::new()),
        resize_timer: Cell::new(None),
        listeners: RefCell::new(Vec::new()),
        observer_callbacks: RefCell::new(Vec::new()),
    });

    register_gauges(&inner, &config);

    if fx::supports_intersection_observer() {
        install_reveal_observer(&inner, &config.observer)?;
        install_lazy_image_observer(&inner)?;
    } else {
        // Old engines get everything at once; gauges still fill staggered.
        fallback_reveal_all(&inner);
    }

    install_resize_listener(&inner)?;
    install_scroll_listener(&inner)?;
    install_print_listeners(&inner)?;
    schedule_header_entrance(&inner);

    fx::load_saved_theme();
    fx::apply_reduced_motion_preference();
    fx::track_page_view();

    PRESENTER.with(|p| p.replace(Some(inner)));
    Ok(())
}

// --- Gauge registration & fill -----------------------------------------------

fn register_gauges(inner: &Rc<PresenterInner>, config: &PresenterConfig) {
    for item in query_all_doc(&inner.document, SKILL_ITEM_SELECTOR) {
        let Some(percentage) = item
            .get_attribute("data-progress")
            .and_then(|v| v.parse::<u32>().ok())
        else {
            continue;
        };
        let spec = GaugeSpec { percentage, tiers: config.tiers };
        let handle = inner.registry.borrow_mut().register(spec);
        let _ = item.set_attribute(RING_INDEX_ATTR, &handle.0.to_string());

        let ring = item
            .query_selector(RING_SELECTOR)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<SvgElement>().ok());
        let label = item.query_selector(LABEL_SELECTOR).ok().flatten();

        // Start visually empty at the current tier's circumference.
        if let (Some(ring), Some(state)) = (&ring, inner.registry.borrow().state(handle).copied()) {
            apply_ring_geometry(ring, state.circumference, state.current_offset);
        }
        inner.bindings.borrow_mut().push(GaugeBinding { ring, label });
    }
}

fn trigger_gauge(inner: &Rc<PresenterInner>, item: &Element, batch_index: usize) {
    let Some(handle) = item
        .get_attribute(RING_INDEX_ATTR)
        .and_then(|v| v.parse::<usize>().ok())
        .map(GaugeHandle)
    else {
        return;
    };
    let Some(plan) = inner.registry.borrow_mut().on_visible(handle, batch_index) else {
        return;
    };
    let inner2 = inner.clone();
    schedule_timeout(&inner.window, plan.delay_ms as i32, move || {
        apply_fill(&inner2, handle, &plan);
    });
}

/// Two-step fill: pin the stroke at fully empty, then move to the target
/// offset on the next frame so the CSS transition actually plays.
fn apply_fill(inner: &Rc<PresenterInner>, handle: GaugeHandle, plan: &FillPlan) {
    let bindings = inner.bindings.borrow();
    let Some(binding) = bindings.get(handle.0) else { return };

    if let Some(ring) = &binding.ring {
        apply_ring_geometry(ring, plan.circumference, plan.circumference);
        let ring2 = ring.clone();
        let target = plan.target_offset;
        request_frame(&inner.window, move |_ts| {
            let _ = ring2.style().set_property("stroke-dashoffset", &target.to_string());
        });
    }

    match &binding.label {
        Some(label) => {
            run_label_counter(
                inner.clone(),
                handle,
                label.clone(),
                plan.percentage,
                plan.label_duration_ms,
            );
        }
        None => inner.registry.borrow_mut().finish(handle),
    }
}

/// Count the label from 0 up to `target` with the quartic ease-out, one
/// sample per animation frame. Same raf-loop shape as the board tick loop
/// this crate grew out of, except it stops rescheduling once progress hits 1.
fn run_label_counter(
    inner: Rc<PresenterInner>,
    handle: GaugeHandle,
    label: Element,
    target: u32,
    duration_ms: f64,
) {
    let start = crate::performance_now();
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        let p = ((crate::performance_now() - start) / duration_ms).clamp(0.0, 1.0);
        let value = crate::gauge::label_value(target, p);
        label.set_text_content(Some(&format!("{value}%")));
        if p < 1.0 {
            if let Some(w) = window() {
                let _ = w.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
            }
        } else {
            inner.registry.borrow_mut().finish(handle);
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        let _ = w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

fn apply_ring_geometry(ring: &SvgElement, circumference: f64, offset: f64) {
    let style = ring.style();
    let _ = style.set_property("stroke-dasharray", &circumference.to_string());
    let _ = style.set_property("stroke-dashoffset", &offset.to_string());
}

fn apply_geometry_update(inner: &Rc<PresenterInner>, update: &GeometryUpdate) {
    let bindings = inner.bindings.borrow();
    let Some(binding) = bindings.get(update.handle.0) else { return };
    if let Some(ring) = &binding.ring {
        apply_ring_geometry(ring, update.circumference, update.offset);
    }
    if update.replay_label {
        match &binding.label {
            Some(label) => run_label_counter(
                inner.clone(),
                update.handle,
                label.clone(),
                update.percentage,
                update.label_duration_ms,
            ),
            None => inner.registry.borrow_mut().finish(update.handle),
        }
    }
}

// --- Reveal observer ---------------------------------------------------------

fn install_reveal_observer(
    inner: &Rc<PresenterInner>,
    config: &ObserverConfig,
) -> Result<(), JsValue> {
    let inner2 = inner.clone();
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, _obs: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else { continue };
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                let _ = target.class_list().add_1("visible");
                let classes = target.class_list();
                if classes.contains("skills-with-bars") {
                    reveal_skill_items(&inner2, &target);
                }
                if classes.contains("projects-section") {
                    reveal_children(&inner2, &target, ".project-card");
                }
                if classes.contains("education-section") {
                    reveal_children(&inner2, &target, ".education-item");
                }
            }
        },
    );

    let opts = IntersectionObserverInit::new();
    opts.set_threshold(&JsValue::from_f64(config.threshold));
    opts.set_root_margin(&config.root_margin);
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &opts)?;
    for el in query_all_doc(&inner.document, REVEAL_SELECTORS) {
        observer.observe(&el);
    }
    inner.observer_callbacks.borrow_mut().push(callback);
    Ok(())
}

/// Reveal a skills section: stagger the `visible` class across its items and
/// route each one into the gauge fill path. Latched so a section that
/// re-enters the viewport does not restart its stagger.
fn reveal_skill_items(inner: &Rc<PresenterInner>, section: &Element) {
    if section.get_attribute(REVEALED_ATTR).is_some() {
        return;
    }
    let _ = section.set_attribute(REVEALED_ATTR, "true");
    let step = inner.registry.borrow().config().stagger_step_ms;
    for (idx, item) in query_all(section, SKILL_ITEM_SELECTOR).into_iter().enumerate() {
        let delay = reveal::stagger_delay(idx, step) as i32;
        let shown = item.clone();
        schedule_timeout(&inner.window, delay, move || {
            let _ = shown.class_list().add_1("visible");
        });
        trigger_gauge(inner, &item, idx);
    }
}

/// Stagger the `visible` class across a section's cards, once per page load.
fn reveal_children(inner: &Rc<PresenterInner>, section: &Element, selector: &str) {
    if section.get_attribute(REVEALED_ATTR).is_some() {
        return;
    }
    let _ = section.set_attribute(REVEALED_ATTR, "true");
    let step = inner.registry.borrow().config().stagger_step_ms;
    for (idx, child) in query_all(section, selector).into_iter().enumerate() {
        let delay = reveal::stagger_delay(idx, step) as i32;
        schedule_timeout(&inner.window, delay, move || {
            let _ = child.class_list().add_1("visible");
        });
    }
}

// --- Lazy images -------------------------------------------------------------

fn install_lazy_image_observer(inner: &Rc<PresenterInner>) -> Result<(), JsValue> {
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, obs: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else { continue };
                if !entry.is_intersecting() {
                    continue;
                }
                if let Ok(img) = entry.target().dyn_into::<HtmlImageElement>() {
                    if let Some(src) = img.get_attribute("data-src") {
                        img.set_src(&src);
                    }
                    let _ = img.class_list().remove_1("lazy");
                    obs.unobserve(&img);
                }
            }
        },
    );
    let observer = IntersectionObserver::new(callback.as_ref().unchecked_ref())?;
    for el in query_all_doc(&inner.document, "img[data-src]") {
        observer.observe(&el);
    }
    inner.observer_callbacks.borrow_mut().push(callback);
    Ok(())
}

// --- Resize / scroll / print listeners ---------------------------------------

/// Debounced resize: recompute tier geometry only after a quiet period, so a
/// continuous resize gesture coalesces into one relayout.
fn install_resize_listener(inner: &Rc<PresenterInner>) -> Result<(), JsValue> {
    let inner2 = inner.clone();
    let on_resize = Closure::<dyn FnMut()>::new(move || {
        if let Some(id) = inner2.resize_timer.take() {
            inner2.window.clear_timeout_with_handle(id);
        }
        let quiet = inner2.registry.borrow().config().resize_quiet_ms;
        let inner3 = inner2.clone();
        let id = schedule_timeout(&inner2.window, quiet, move || {
            inner3.resize_timer.set(None);
            let width = viewport_width(&inner3.window);
            let updates = inner3.registry.borrow_mut().relayout(width);
            for update in &updates {
                apply_geometry_update(&inner3, update);
            }
        });
        inner2.resize_timer.set(id);
    });
    inner
        .window
        .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    inner.listeners.borrow_mut().push(on_resize);
    Ok(())
}

fn install_scroll_listener(inner: &Rc<PresenterInner>) -> Result<(), JsValue> {
    let inner2 = inner.clone();
    let on_scroll = Closure::<dyn FnMut()>::new(move || {
        let Some(button) = inner2
            .document
            .get_element_by_id("scrollToTop")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        let depth = inner2.window.page_y_offset().unwrap_or(0.0);
        let display = if depth > SCROLL_TOP_THRESHOLD_PX { "block" } else { "none" };
        let _ = button.style().set_property("display", display);
    });
    inner
        .window
        .add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())?;
    inner.listeners.borrow_mut().push(on_scroll);
    Ok(())
}

fn install_print_listeners(inner: &Rc<PresenterInner>) -> Result<(), JsValue> {
    let doc = inner.document.clone();
    let before = Closure::<dyn FnMut()>::new(move || {
        if let Some(body) = doc.body() {
            let _ = body.class_list().add_1("print-mode");
        }
        for el in query_all_doc(&doc, ".fade-in, .slide-in-left, .slide-in-right, .scale-in") {
            let _ = el.class_list().add_1("visible");
        }
    });
    let doc = inner.document.clone();
    let after = Closure::<dyn FnMut()>::new(move || {
        if let Some(body) = doc.body() {
            let _ = body.class_list().remove_1("print-mode");
        }
    });
    inner
        .window
        .add_event_listener_with_callback("beforeprint", before.as_ref().unchecked_ref())?;
    inner
        .window
        .add_event_listener_with_callback("afterprint", after.as_ref().unchecked_ref())?;
    let mut listeners = inner.listeners.borrow_mut();
    listeners.push(before);
    listeners.push(after);
    Ok(())
}

fn schedule_header_entrance(inner: &Rc<PresenterInner>) {
    let doc = inner.document.clone();
    schedule_timeout(&inner.window, HEADER_DELAY_MS, move || {
        if let Some(header) = doc.query_selector(".header").ok().flatten() {
            let _ = header.class_list().add_1("visible");
        }
    });
}

// --- Fallback & debug paths ---------------------------------------------------

/// No IntersectionObserver: show everything now, fill gauges staggered.
fn fallback_reveal_all(inner: &Rc<PresenterInner>) {
    for el in query_all_doc(&inner.document, REVEAL_SELECTORS) {
        let _ = el.class_list().add_1("visible");
    }
    for el in query_all_doc(
        &inner.document,
        ".skill-item, .project-card, .education-item",
    ) {
        let _ = el.class_list().add_1("visible");
    }
    fill_all(inner);
}

fn fill_all(inner: &Rc<PresenterInner>) {
    let count = inner.bindings.borrow().len();
    for idx in 0..count {
        let handle = GaugeHandle(idx);
        let Some(plan) = inner.registry.borrow_mut().on_visible(handle, idx) else { continue };
        let inner2 = inner.clone();
        schedule_timeout(&inner.window, plan.delay_ms as i32, move || {
            apply_fill(&inner2, handle, &plan);
        });
    }
}

/// Force every reveal section and gauge to its shown state, bypassing the
/// observer. Exposed to the browser console for manual testing.
#[wasm_bindgen]
pub fn force_reveal_all() {
    PRESENTER.with(|p| {
        if let Some(inner) = p.borrow().as_ref() {
            fallback_reveal_all(inner);
        }
    });
}

/// Log every registered gauge's state to the console.
#[wasm_bindgen]
pub fn debug_gauges() {
    PRESENTER.with(|p| {
        let borrow = p.borrow();
        let Some(inner) = borrow.as_ref() else {
            web_sys::console::log_1(&JsValue::from_str("presenter not booted"));
            return;
        };
        let registry = inner.registry.borrow();
        for idx in 0..registry.len() {
            if let Some(state) = registry.state(GaugeHandle(idx)) {
                web_sys::console::log_1(&JsValue::from_str(&format!(
                    "gauge {idx}: circumference={:.2} offset={:.2} animating={} filled={}",
                    state.circumference, state.current_offset, state.animating, state.filled
                )));
            }
        }
    });
}

// --- Small DOM helpers --------------------------------------------------------

fn viewport_width(win: &Window) -> f64 {
    win.inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1024.0)
}

/// One-shot timer; the closure is consumed by the JS side when it fires.
fn schedule_timeout(win: &Window, delay_ms: i32, f: impl FnOnce() + 'static) -> Option<i32> {
    let cb = Closure::once_into_js(f);
    win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), delay_ms)
        .ok()
}

fn request_frame(win: &Window, f: impl FnOnce(f64) + 'static) {
    let cb = Closure::once_into_js(f);
    let _ = win.request_animation_frame(cb.unchecked_ref());
}

fn collect_elements(list: Result<NodeList, JsValue>) -> Vec<Element> {
    let mut out = Vec::new();
    if let Ok(list) = list {
        for i in 0..list.length() {
            if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                out.push(el);
            }
        }
    }
    out
}

fn query_all_doc(doc: &Document, selector: &str) -> Vec<Element> {
    collect_elements(doc.query_selector_all(selector))
}

fn query_all(el: &Element, selector: &str) -> Vec<Element> {
    collect_elements(el.query_selector_all(selector))
}
