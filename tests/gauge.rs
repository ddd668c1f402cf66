// Native tests for the pure gauge geometry and easing functions.
// These avoid wasm/browser APIs so they run under `cargo test` on the host.

use std::f64::consts::PI;

use folio_rings::gauge::{RadiusTiers, circumference, compute_offset, ease_out_quart, label_value};

const EPS: f64 = 1e-9;

#[test]
fn offset_endpoints_match_circumference() {
    for radius in [10.0, 35.0, 50.0, 120.5] {
        let c = circumference(radius);
        assert!((c - 2.0 * PI * radius).abs() < EPS);
        assert!((compute_offset(0.0, radius) - c).abs() < EPS, "0% must leave the ring empty");
        assert!(compute_offset(100.0, radius).abs() < EPS, "100% must fill the ring");
    }
}

#[test]
fn offset_is_monotonically_non_increasing_in_percentage() {
    let radius = 50.0;
    let mut prev = f64::INFINITY;
    for pct in 0..=100 {
        let offset = compute_offset(pct as f64, radius);
        assert!(offset <= prev, "offset rose between {}% and {}%", pct - 1, pct);
        prev = offset;
    }
}

#[test]
fn out_of_range_percentage_is_not_validated_but_finite() {
    // Garbage in, geometrically meaningless but non-crashing output.
    assert!(compute_offset(150.0, 50.0) < 0.0);
    assert!(compute_offset(-20.0, 50.0) > circumference(50.0));
    assert!(compute_offset(150.0, 50.0).is_finite());
}

#[test]
fn radius_tiers_are_boundary_exact() {
    let tiers = RadiusTiers::default();
    assert_eq!(tiers.select(320.0), tiers.small);
    assert_eq!(tiers.select(480.0), tiers.small);
    assert_eq!(tiers.select(481.0), tiers.medium);
    assert_eq!(tiers.select(768.0), tiers.medium);
    assert_eq!(tiers.select(769.0), tiers.large);
    assert_eq!(tiers.select(1920.0), tiers.large);
}

#[test]
fn custom_tiers_and_breakpoints_are_honored() {
    let tiers = RadiusTiers { small: 20.0, medium: 30.0, large: 60.0, narrow_max: 400.0, medium_max: 900.0 };
    assert_eq!(tiers.select(400.0), 20.0);
    assert_eq!(tiers.select(401.0), 30.0);
    assert_eq!(tiers.select(900.0), 30.0);
    assert_eq!(tiers.select(901.0), 60.0);
}

#[test]
fn ease_out_quart_endpoints_and_shape() {
    assert!(ease_out_quart(0.0).abs() < EPS);
    assert!((ease_out_quart(1.0) - 1.0).abs() < EPS);
    // Fast initial growth: halfway through, the curve is already past 90%.
    assert!(ease_out_quart(0.5) > 0.9);
}

#[test]
fn label_value_starts_at_zero_and_finishes_exactly() {
    for pct in [0, 1, 42, 75, 100] {
        assert_eq!(label_value(pct, 0.0), 0);
        assert_eq!(label_value(pct, 1.0), pct, "label must end exactly at the declared percentage");
    }
}

#[test]
fn label_value_is_monotonically_non_decreasing() {
    let mut prev = 0;
    for step in 0..=100 {
        let value = label_value(75, step as f64 / 100.0);
        assert!(value >= prev, "label dipped at step {step}");
        prev = value;
    }
}

#[test]
fn reference_gauge_geometry() {
    // percentage = 75, radius = 50: the documented end-to-end values.
    let c = circumference(50.0);
    assert!((c - 314.159_265_358_979_3).abs() < 1e-9);
    let filled = compute_offset(75.0, 50.0);
    assert!((filled - 78.539_816_339_744_83).abs() < 1e-9);
    // Before animation the offset equals the full circumference.
    assert!((compute_offset(0.0, 50.0) - c).abs() < EPS);
}
