//! Scroll-reveal constants and stagger timing shared by the observer path
//! and the no-observer fallback.

/// Selector list the reveal observer watches.
pub const REVEAL_SELECTORS: &str = ".fade-in, .slide-in-left, .slide-in-right, .scale-in, \
     .skills-with-bars, .projects-section, .education-section";

/// Delay before the page header slides in (ms).
pub const HEADER_DELAY_MS: i32 = 200;

/// Scroll depth past which the scroll-to-top control is shown (px).
pub const SCROLL_TOP_THRESHOLD_PX: f64 = 300.0;

/// Visibility watcher tuning: fraction of the element that must be visible
/// and the extra trigger margin around the viewport.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ObserverConfig {
    pub threshold: f64,
    pub root_margin: String,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self { threshold: 0.1, root_margin: "0px 0px -20px 0px".to_string() }
    }
}

/// Start delay for the `index`-th sibling of a batch revealed together, so
/// a group animates in declaration order rather than all at once.
pub fn stagger_delay(index: usize, step_ms: f64) -> f64 {
    index as f64 * step_ms
}
