// Integration tests (native) for the `folio-rings` crate.
// These tests avoid wasm-specific functionality and exercise the registry
// state machine and reveal timing so they can run under `cargo test` on the
// host.

use folio_rings::PresenterConfig;
use folio_rings::gauge::{
    GaugeHandle, GaugeRegistry, GaugeSpec, RenderConfig, ResizePolicy, circumference,
    compute_offset,
};
use folio_rings::reveal::{ObserverConfig, stagger_delay};

fn registry_at(width: f64) -> GaugeRegistry {
    GaugeRegistry::new(RenderConfig::default(), width)
}

#[test]
fn registered_gauge_starts_empty() {
    let mut reg = registry_at(1024.0);
    let handle = reg.register(GaugeSpec::new(75));
    let state = reg.state(handle).expect("registered gauge has state");
    let c = circumference(50.0); // large tier at width 1024
    assert!((state.circumference - c).abs() < 1e-9);
    assert!((state.current_offset - c).abs() < 1e-9, "initial offset must equal circumference");
    assert!(!state.animating);
    assert!(!state.filled);
}

#[test]
fn on_visible_fires_at_most_once_per_reveal() {
    let mut reg = registry_at(1024.0);
    let handle = reg.register(GaugeSpec::new(60));
    assert!(reg.on_visible(handle, 0).is_some());
    // Repeat notifications while animating are cheap no-ops.
    assert!(reg.on_visible(handle, 0).is_none());
    reg.finish(handle);
    // Still latched after the fill completes.
    assert!(reg.on_visible(handle, 0).is_none());
}

#[test]
fn explicit_reset_rearms_the_animation() {
    let mut reg = registry_at(1024.0);
    let handle = reg.register(GaugeSpec::new(60));
    reg.on_visible(handle, 0);
    reg.finish(handle);
    reg.reset(handle);
    let state = reg.state(handle).unwrap();
    assert!(!state.filled);
    assert!((state.current_offset - state.circumference).abs() < 1e-9);
    assert!(reg.on_visible(handle, 0).is_some());
}

#[test]
fn fill_plan_carries_tiered_geometry() {
    let mut reg = registry_at(1024.0);
    let handle = reg.register(GaugeSpec::new(75));
    let plan = reg.on_visible(handle, 0).unwrap();
    assert_eq!(plan.percentage, 75);
    assert_eq!(plan.radius, 50.0);
    assert!((plan.circumference - 314.159_265_358_979_3).abs() < 1e-9);
    assert!((plan.target_offset - 78.539_816_339_744_83).abs() < 1e-9);
    assert_eq!(plan.label_duration_ms, 1500.0);
}

#[test]
fn sibling_gauges_get_strictly_increasing_delays() {
    let mut reg = registry_at(1024.0);
    let handles: Vec<GaugeHandle> =
        (0..3).map(|i| reg.register(GaugeSpec::new(50 + i as u32 * 10))).collect();
    let delays: Vec<f64> = handles
        .iter()
        .enumerate()
        .map(|(i, &h)| reg.on_visible(h, i).unwrap().delay_ms)
        .collect();
    assert!(delays[0] < delays[1] && delays[1] < delays[2]);
    // Declaration order, 150 ms apart on top of the shared fill delay.
    assert_eq!(delays[1] - delays[0], 150.0);
    assert_eq!(delays[2] - delays[1], 150.0);
}

#[test]
fn relayout_snaps_geometry_to_the_new_tier() {
    let mut reg = registry_at(1024.0);
    let shown = reg.register(GaugeSpec::new(80));
    let hidden = reg.register(GaugeSpec::new(40));
    reg.on_visible(shown, 0);
    reg.finish(shown);

    // Shrink to the small tier (radius 40 by default).
    let updates = reg.relayout(400.0);
    assert_eq!(updates.len(), 2);

    let c_small = circumference(40.0);
    let shown_update = &updates[shown.0];
    assert!((shown_update.circumference - c_small).abs() < 1e-9);
    assert!((shown_update.offset - compute_offset(80.0, 40.0)).abs() < 1e-9);
    assert!(!shown_update.replay_label, "snap policy never replays the count-up");

    // A gauge that was never revealed stays empty at the new circumference.
    let hidden_update = &updates[hidden.0];
    assert!((hidden_update.offset - c_small).abs() < 1e-9);
    let hidden_state = reg.state(hidden).unwrap();
    assert!(!hidden_state.filled && !hidden_state.animating);
}

#[test]
fn replay_policy_reruns_the_label_animation_on_resize() {
    let config = RenderConfig { resize_policy: ResizePolicy::Replay, ..RenderConfig::default() };
    let mut reg = GaugeRegistry::new(config, 1024.0);
    let handle = reg.register(GaugeSpec::new(65));
    reg.on_visible(handle, 0);
    reg.finish(handle);

    let updates = reg.relayout(600.0);
    assert!(updates[0].replay_label);
    let state = reg.state(handle).unwrap();
    assert!(state.animating, "replay re-enters the animating state");
    assert!(!state.filled);

    // The relayout itself keeps the filled offset; only the label replays.
    assert!((updates[0].offset - compute_offset(65.0, 45.0)).abs() < 1e-9);
}

#[test]
fn relayout_does_not_consume_the_first_reveal() {
    let mut reg = registry_at(1024.0);
    let handle = reg.register(GaugeSpec::new(55));
    reg.relayout(500.0);
    // Resize before the gauge was ever visible must not latch it.
    assert!(reg.on_visible(handle, 0).is_some());
}

#[test]
fn default_timing_constants() {
    let config = RenderConfig::default();
    assert_eq!(config.stagger_step_ms, 150.0);
    assert_eq!(config.fill_delay_ms, 300.0);
    assert_eq!(config.label_duration_ms, 1500.0);
    assert_eq!(config.resize_quiet_ms, 250);
    assert_eq!(config.resize_policy, ResizePolicy::Snap);

    let observer = ObserverConfig::default();
    assert_eq!(observer.threshold, 0.1);
    assert_eq!(observer.root_margin, "0px 0px -20px 0px");
}

#[test]
fn stagger_delays_follow_declaration_order() {
    let delays: Vec<f64> = (0..3).map(|i| stagger_delay(i, 150.0)).collect();
    assert_eq!(delays, vec![0.0, 150.0, 300.0]);
}

#[test]
fn presenter_config_defaults_are_consistent() {
    let config = PresenterConfig::default();
    assert_eq!(config.tiers.select(480.0), config.tiers.small);
    assert_eq!(config.tiers.large, 50.0);
    assert_eq!(config.render.resize_policy, ResizePolicy::Snap);
}

#[cfg(feature = "serde_json")]
#[test]
fn presenter_config_parses_partial_json() {
    let json = r#"{"render": {"stagger_step_ms": 100.0}, "tiers": {"large": 60.0}}"#;
    let config: PresenterConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.render.stagger_step_ms, 100.0);
    assert_eq!(config.render.fill_delay_ms, 300.0);
    assert_eq!(config.tiers.large, 60.0);
    assert_eq!(config.tiers.small, 40.0);
}
