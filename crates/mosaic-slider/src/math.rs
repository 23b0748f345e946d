//! Scalar helpers shared by the distributions and the slider model.

use std::ops::RangeInclusive;

/// Linear interpolation between `start` and `stop`.
#[inline]
pub fn lerp(start: f32, stop: f32, fraction: f32) -> f32 {
    (1.0 - fraction) * start + fraction * stop
}

/// Position of `pos` between `a` and `b` as a fraction clamped to `0..=1`.
///
/// A zero-length interval yields 0 instead of dividing by zero; this is the
/// branch an unmeasured track (width 0) goes through.
#[inline]
pub fn calc_fraction(a: f32, b: f32, pos: f32) -> f32 {
    if b - a == 0.0 {
        0.0
    } else {
        ((pos - a) / (b - a)).clamp(0.0, 1.0)
    }
}

/// Maps `x1` from `a1..b1` onto `a2..b2`.
#[inline]
pub fn scale(a1: f32, b1: f32, x1: f32, a2: f32, b2: f32) -> f32 {
    lerp(a2, b2, calc_fraction(a1, b1, x1))
}

/// Fraction of `value` within `range`, clamped to `0..=1`.
#[inline]
pub fn value_to_fraction(value: f32, range: &RangeInclusive<f32>) -> f32 {
    calc_fraction(*range.start(), *range.end(), value)
}

/// Value at `fraction` (clamped to `0..=1`) of `range`.
#[inline]
pub fn fraction_to_value(fraction: f32, range: &RangeInclusive<f32>) -> f32 {
    scale(0.0, 1.0, fraction.clamp(0.0, 1.0), *range.start(), *range.end())
}

/// Clamps `value` into `range` without panicking on reversed or NaN bounds.
#[inline]
pub fn coerce_in(value: f32, range: &RangeInclusive<f32>) -> f32 {
    if value < *range.start() {
        *range.start()
    } else if value > *range.end() {
        *range.end()
    } else {
        value
    }
}

/// Whether `value` lies in `range` allowing `tolerance` on both ends.
#[inline]
pub(crate) fn contains_with_tolerance(range: &RangeInclusive<f32>, value: f32, tolerance: f32) -> bool {
    *range.start() - tolerance <= value && value <= *range.end() + tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_of_empty_interval_is_zero() {
        assert_eq!(calc_fraction(0.0, 0.0, 42.0), 0.0);
        assert_eq!(calc_fraction(5.0, 5.0, -1.0), 0.0);
    }

    #[test]
    fn fraction_is_clamped() {
        assert_eq!(calc_fraction(0.0, 100.0, 150.0), 1.0);
        assert_eq!(calc_fraction(0.0, 100.0, -20.0), 0.0);
        assert_eq!(calc_fraction(0.0, 100.0, 25.0), 0.25);
    }

    #[test]
    fn lerp_hits_both_endpoints_exactly() {
        assert_eq!(lerp(3.0, 7.0, 0.0), 3.0);
        assert_eq!(lerp(3.0, 7.0, 1.0), 7.0);
        assert_eq!(lerp(0.0, 1000.0, 0.5), 500.0);
    }

    #[test]
    fn scale_maps_between_ranges() {
        assert_eq!(scale(0.0, 200.0, 50.0, 0.0, 1.0), 0.25);
        assert_eq!(fraction_to_value(0.5, &(10.0..=20.0)), 15.0);
        assert_eq!(value_to_fraction(15.0, &(10.0..=20.0)), 0.5);
    }

    #[test]
    fn coerce_in_handles_reversed_bounds() {
        assert_eq!(coerce_in(5.0, &(0.0..=10.0)), 5.0);
        assert_eq!(coerce_in(-5.0, &(0.0..=10.0)), 0.0);
        assert_eq!(coerce_in(15.0, &(0.0..=10.0)), 10.0);
        // Reversed bounds never panic.
        let _ = coerce_in(5.0, &(10.0..=0.0));
    }
}
