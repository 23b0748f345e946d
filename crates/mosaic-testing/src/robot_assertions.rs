//! Assertion utilities for robot testing
//!
//! Approximate comparisons for slider positions and values, which go through
//! float curve math and never land exactly.

use mosaic_slider::{SliderState, ValueDistribution};
use std::ops::RangeInclusive;

/// Assert that a value is within an expected range.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {} (±{}), got {} (diff: {})",
        msg,
        expected,
        tolerance,
        actual,
        diff
    );
}

/// Assert that both ends of a range are approximately equal.
pub fn assert_range_approx_eq(
    actual: &RangeInclusive<f32>,
    expected: &RangeInclusive<f32>,
    tolerance: f32,
    msg: &str,
) {
    assert_approx_eq(
        *actual.start(),
        *expected.start(),
        tolerance,
        &format!("{} - start", msg),
    );
    assert_approx_eq(
        *actual.end(),
        *expected.end(),
        tolerance,
        &format!("{} - end", msg),
    );
}

/// Assert that `fraction` survives a trip through the curve in both orders.
pub fn assert_round_trip(curve: &ValueDistribution, fraction: f32, tolerance: f32) {
    assert_approx_eq(
        curve.interpolate(curve.inverse(fraction)),
        fraction,
        tolerance,
        &format!("interpolate(inverse({}))", fraction),
    );
    assert_approx_eq(
        curve.inverse(curve.interpolate(fraction)),
        fraction,
        tolerance,
        &format!("inverse(interpolate({}))", fraction),
    );
}

/// Assert where the renderer would draw the thumb.
pub fn assert_thumb_at(state: &SliderState, fraction: f32, tolerance: f32) {
    assert_approx_eq(
        state.offset_as_fraction(),
        fraction,
        tolerance,
        &format!("thumb of slider {}", state.id()),
    );
}
