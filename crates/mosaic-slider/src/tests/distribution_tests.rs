use crate::distribution::{
    DistributionError, Lookup, PiecewiseDistribution, SensitivitySlice, ValueDistribution,
};
use std::sync::Arc;

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn increasing_checkpoints_build() {
    let curve = ValueDistribution::checkpoints(&[(0.0, 0.0), (0.5, 10.0), (1.0, 20.0)]).unwrap();
    assert_close(curve.interpolate(0.25), 0.25);
    assert_close(curve.inverse(0.75), 0.75);
}

#[test]
fn decreasing_checkpoints_fail() {
    let err = ValueDistribution::checkpoints(&[(0.0, 0.0), (0.5, 30.0), (1.0, 20.0)]).unwrap_err();
    assert_eq!(
        err,
        DistributionError::DecreasingValue {
            offset: 0.5,
            value: 30.0,
            next_offset: 1.0,
            next_value: 20.0,
        }
    );
}

#[test]
fn checkpoint_values_are_normalized_before_inverse() {
    let curve =
        ValueDistribution::checkpoints(&[(0.0, 0.0), (0.25, 25.0), (0.5, 75.0), (1.0, 100.0)])
            .unwrap();
    assert_close(curve.inverse(0.25), 0.25);
    assert_close(curve.inverse(0.75), 0.5);
}

#[test]
fn every_variant_round_trips() {
    let variants = [
        ValueDistribution::Linear,
        ValueDistribution::parabolic(0.6, 0.4, 0.0),
        ValueDistribution::checkpoints(&[(0.0, 0.0), (0.3, 60.0), (1.0, 100.0)]).unwrap(),
        ValueDistribution::sensitivity(&[
            SensitivitySlice::new(2.0, 0.0),
            SensitivitySlice::new(1.0, 0.5),
            SensitivitySlice::new(2.0, 0.8),
        ])
        .unwrap(),
    ];

    for curve in &variants {
        for step in 0..=20 {
            let fraction = step as f32 / 20.0;
            assert_close(curve.interpolate(curve.inverse(fraction)), fraction);
            assert_close(curve.inverse(curve.interpolate(fraction)), fraction);
        }
    }
}

#[test]
fn range_helpers_map_both_ends() {
    let curve = ValueDistribution::parabolic(1.0, 0.0, 0.0);
    let mapped = curve.interpolate_range(0.5..=1.0);
    assert_close(*mapped.start(), 0.25);
    assert_close(*mapped.end(), 1.0);

    let unmapped = curve.inverse_range(0.25..=1.0);
    assert_close(*unmapped.start(), 0.5);
    assert_close(*unmapped.end(), 1.0);
}

#[test]
fn fallible_lookup_reports_missing_segment() {
    let curve = ValueDistribution::checkpoints(&[(0.0, 0.0), (1.0, 1.0)]).unwrap();
    assert_eq!(
        curve.try_interpolate(2.0),
        Err(DistributionError::NoSegment {
            lookup: Lookup::Offset,
            input: 2.0,
        })
    );
    assert_eq!(
        curve.try_inverse(-1.0),
        Err(DistributionError::NoSegment {
            lookup: Lookup::Value,
            input: -1.0,
        })
    );
    // Closed-form variants are total.
    assert_eq!(ValueDistribution::Linear.try_interpolate(2.0), Ok(2.0));
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "no segment covers offset")]
fn infallible_lookup_outside_domain_panics_in_debug() {
    let curve = ValueDistribution::checkpoints(&[(0.0, 0.0), (1.0, 1.0)]).unwrap();
    curve.interpolate(3.0);
}

#[test]
fn piecewise_curves_are_shared() {
    let curve = ValueDistribution::from(
        PiecewiseDistribution::from_checkpoints(&[(0.0, 0.0), (1.0, 1.0)]).unwrap(),
    );
    let copy = curve.clone();
    match (&curve, &copy) {
        (ValueDistribution::Piecewise(a), ValueDistribution::Piecewise(b)) => {
            assert!(Arc::ptr_eq(a, b));
        }
        _ => panic!("expected piecewise distributions"),
    }
}
