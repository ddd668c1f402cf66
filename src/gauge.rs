//! Circular skill-gauge core: stroke-dash geometry, label easing, and the
//! fill state machine driven by visibility events.
//!
//! Everything in this module is pure Rust with no browser dependency so it
//! can run under `cargo test` on the host; the DOM side lives in `page`.

use std::f64::consts::PI;

// --- Presentation constants --------------------------------------------------

/// Default per-sibling stagger between gauges revealed in one batch (ms).
pub const STAGGER_STEP_MS: f64 = 150.0;
/// Default delay between a skill item becoming visible and its fill starting (ms).
pub const FILL_DELAY_MS: f64 = 300.0;
/// Duration of the 0 -> percentage label count-up (ms).
pub const LABEL_DURATION_MS: f64 = 1500.0;
/// Quiet period after the last resize event before geometry is recomputed (ms).
pub const RESIZE_QUIET_MS: i32 = 250;

// --- Geometry ----------------------------------------------------------------

/// Circumference of the ring track for a given radius.
pub fn circumference(radius: f64) -> f64 {
    2.0 * PI * radius
}

/// Stroke-dash offset representing `percentage` of a ring of `radius`.
///
/// `offset == circumference` is an empty ring, `offset == 0.0` fully filled.
/// Inputs outside [0,100] are not validated; they yield a geometrically
/// out-of-range but finite offset.
pub fn compute_offset(percentage: f64, radius: f64) -> f64 {
    let c = circumference(radius);
    c - (percentage / 100.0) * c
}

/// Quartic ease-out: fast initial growth settling into the end value.
pub fn ease_out_quart(p: f64) -> f64 {
    1.0 - (1.0 - p).powi(4)
}

/// Label value shown at normalized progress `p` of the count-up animation.
/// Exact at the endpoints: 0 at `p = 0`, `percentage` at `p = 1`.
pub fn label_value(percentage: u32, p: f64) -> u32 {
    (percentage as f64 * ease_out_quart(p)).round() as u32
}

// --- Radius tiers ------------------------------------------------------------

/// Fixed ring radii for three screen-width tiers plus the tier breakpoints.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RadiusTiers {
    pub small: f64,
    pub medium: f64,
    pub large: f64,
    /// Widths at or below this use the small radius.
    pub narrow_max: f64,
    /// Widths above `narrow_max` and at or below this use the medium radius.
    pub medium_max: f64,
}

impl Default for RadiusTiers {
    fn default() -> Self {
        Self { small: 40.0, medium: 45.0, large: 50.0, narrow_max: 480.0, medium_max: 768.0 }
    }
}

impl RadiusTiers {
    /// Boundary-exact three-tier step function of the viewport width.
    pub fn select(&self, viewport_width: f64) -> f64 {
        if viewport_width <= self.narrow_max {
            self.small
        } else if viewport_width <= self.medium_max {
            self.medium
        } else {
            self.large
        }
    }
}

// --- Specs & state -----------------------------------------------------------

/// Declared, immutable description of one gauge.
#[derive(Clone, Copy, Debug)]
pub struct GaugeSpec {
    /// Proportion of the ring to fill, 0..=100 by contract (not validated).
    pub percentage: u32,
    pub tiers: RadiusTiers,
}

impl GaugeSpec {
    pub fn new(percentage: u32) -> Self {
        Self { percentage, tiers: RadiusTiers::default() }
    }
}

/// Mutable visual state of one gauge, owned by the registry.
#[derive(Clone, Copy, Debug)]
pub struct GaugeState {
    pub circumference: f64,
    /// Ranges from `circumference` (empty) down to the filled offset.
    pub current_offset: f64,
    /// True from fill start until the count-up reaches its end value.
    pub animating: bool,
    /// Latched after the first fill; repeat visibility events are no-ops.
    pub filled: bool,
}

impl GaugeState {
    fn empty(radius: f64) -> Self {
        let c = circumference(radius);
        Self { circumference: c, current_offset: c, animating: false, filled: false }
    }
}

/// Whether a resize-triggered re-render replays the label count-up or only
/// snaps stroke geometry to the new radius tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResizePolicy {
    /// Re-apply geometry for the new tier; label keeps its final value.
    #[default]
    Snap,
    /// Re-run the label count-up as well.
    Replay,
}

/// Timing knobs for the fill and resize paths.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderConfig {
    pub stagger_step_ms: f64,
    pub fill_delay_ms: f64,
    pub label_duration_ms: f64,
    pub resize_quiet_ms: i32,
    pub resize_policy: ResizePolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            stagger_step_ms: STAGGER_STEP_MS,
            fill_delay_ms: FILL_DELAY_MS,
            label_duration_ms: LABEL_DURATION_MS,
            resize_quiet_ms: RESIZE_QUIET_MS,
            resize_policy: ResizePolicy::Snap,
        }
    }
}

// --- Registry ----------------------------------------------------------------

/// Opaque handle returned by [`GaugeRegistry::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GaugeHandle(pub usize);

/// Everything the DOM layer needs to start one gauge's fill animation.
#[derive(Clone, Copy, Debug)]
pub struct FillPlan {
    pub delay_ms: f64,
    pub percentage: u32,
    pub radius: f64,
    pub circumference: f64,
    pub target_offset: f64,
    pub label_duration_ms: f64,
}

/// Geometry to re-apply to one gauge after a layout change.
#[derive(Clone, Copy, Debug)]
pub struct GeometryUpdate {
    pub handle: GaugeHandle,
    pub percentage: u32,
    pub circumference: f64,
    pub offset: f64,
    /// Set under [`ResizePolicy::Replay`] for already-filled gauges.
    pub replay_label: bool,
    pub label_duration_ms: f64,
}

struct GaugeEntry {
    spec: GaugeSpec,
    state: GaugeState,
}

/// Owns every registered gauge's spec and state. Constructed once at page
/// initialization and driven by the visibility watcher and resize events;
/// never a shared global.
pub struct GaugeRegistry {
    gauges: Vec<GaugeEntry>,
    config: RenderConfig,
    viewport_width: f64,
}

impl GaugeRegistry {
    pub fn new(config: RenderConfig, viewport_width: f64) -> Self {
        Self { gauges: Vec::new(), config, viewport_width }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.gauges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gauges.is_empty()
    }

    /// Register one gauge; its state starts fully empty for the current
    /// viewport's radius tier.
    pub fn register(&mut self, spec: GaugeSpec) -> GaugeHandle {
        let radius = spec.tiers.select(self.viewport_width);
        self.gauges.push(GaugeEntry { spec, state: GaugeState::empty(radius) });
        GaugeHandle(self.gauges.len() - 1)
    }

    pub fn state(&self, handle: GaugeHandle) -> Option<&GaugeState> {
        self.gauges.get(handle.0).map(|g| &g.state)
    }

    /// Visibility notification for one gauge of a revealed batch.
    ///
    /// Returns a fill plan exactly once per reveal: `None` while the gauge
    /// is already animating or filled, so repeat notifications are cheap
    /// no-ops. `batch_index` is the gauge's position among siblings revealed
    /// together and determines its stagger delay.
    pub fn on_visible(&mut self, handle: GaugeHandle, batch_index: usize) -> Option<FillPlan> {
        let entry = self.gauges.get_mut(handle.0)?;
        if entry.state.animating || entry.state.filled {
            return None;
        }
        let radius = entry.spec.tiers.select(self.viewport_width);
        let c = circumference(radius);
        let target = compute_offset(entry.spec.percentage as f64, radius);
        entry.state.circumference = c;
        entry.state.current_offset = target;
        entry.state.animating = true;
        Some(FillPlan {
            delay_ms: batch_index as f64 * self.config.stagger_step_ms + self.config.fill_delay_ms,
            percentage: entry.spec.percentage,
            radius,
            circumference: c,
            target_offset: target,
            label_duration_ms: self.config.label_duration_ms,
        })
    }

    /// Mark a gauge's fill animation as complete.
    pub fn finish(&mut self, handle: GaugeHandle) {
        if let Some(entry) = self.gauges.get_mut(handle.0) {
            entry.state.animating = false;
            entry.state.filled = true;
        }
    }

    /// Re-arm a gauge so the next visibility event animates it again.
    pub fn reset(&mut self, handle: GaugeHandle) {
        if let Some(entry) = self.gauges.get_mut(handle.0) {
            let radius = entry.spec.tiers.select(self.viewport_width);
            entry.state = GaugeState::empty(radius);
        }
    }

    /// Coalesced resize re-entry: adopt the new viewport width and return
    /// the geometry every gauge should now show. Filled gauges snap to the
    /// new tier's filled offset (replaying the label only under
    /// [`ResizePolicy::Replay`]); unrevealed gauges stay empty at the new
    /// circumference. No stagger applies here.
    pub fn relayout(&mut self, viewport_width: f64) -> Vec<GeometryUpdate> {
        self.viewport_width = viewport_width;
        let mut updates = Vec::with_capacity(self.gauges.len());
        for (idx, entry) in self.gauges.iter_mut().enumerate() {
            let radius = entry.spec.tiers.select(viewport_width);
            let c = circumference(radius);
            let shown = entry.state.filled || entry.state.animating;
            let offset = if shown {
                compute_offset(entry.spec.percentage as f64, radius)
            } else {
                c
            };
            entry.state.circumference = c;
            entry.state.current_offset = offset;
            let replay = shown && self.config.resize_policy == ResizePolicy::Replay;
            if replay {
                entry.state.animating = true;
                entry.state.filled = false;
            }
            updates.push(GeometryUpdate {
                handle: GaugeHandle(idx),
                percentage: entry.spec.percentage,
                circumference: c,
                offset,
                replay_label: replay,
                label_duration_ms: self.config.label_duration_ms,
            });
        }
        updates
    }
}
