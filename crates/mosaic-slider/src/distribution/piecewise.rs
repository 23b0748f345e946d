//! Piecewise-linear curves over the normalized track.
//!
//! A [`PiecewiseDistribution`] is an ordered run of line segments whose offset
//! ranges tile `0..=1` and whose value ranges increase monotonically. It can be
//! built two ways:
//!
//! * from checkpoints, `(offset, value)` anchors the curve must pass through.
//!   Offsets and values are normalized independently against their own
//!   min/max, so values may be given in the slider's native units;
//! * from sensitivity slices, each declaring the slope of the curve from its
//!   position up to the next slice. The result is rescaled so the curve ends
//!   at 1.
//!
//! ```
//! use mosaic_slider::PiecewiseDistribution;
//!
//! // Half the track covers 0..80, the other half 80..100.
//! let curve = PiecewiseDistribution::from_checkpoints(&[(0.0, 0.0), (0.5, 80.0), (1.0, 100.0)])?;
//! assert!((curve.interpolate(0.5)? - 0.8).abs() < 1e-6);
//! # Ok::<(), mosaic_slider::DistributionError>(())
//! ```

use super::error::{DistributionError, Lookup};
use super::linear_equation::{LinearEquation, RangedLinearEquation};
use crate::math::calc_fraction;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::ops::RangeInclusive;

/// Slope of the curve starting at `position`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivitySlice {
    pub sensitivity: f32,
    pub position: f32,
}

impl SensitivitySlice {
    pub const fn new(sensitivity: f32, position: f32) -> Self {
        Self {
            sensitivity,
            position,
        }
    }
}

type Segments = SmallVec<[RangedLinearEquation; 4]>;

#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseDistribution {
    segments: Segments,
}

impl PiecewiseDistribution {
    /// Fits one segment between each pair of neighbouring checkpoints.
    ///
    /// Checkpoints are sorted by offset first. Values must strictly increase
    /// along the sorted order.
    pub fn from_checkpoints(points: &[(f32, f32)]) -> Result<Self, DistributionError> {
        if points.len() < 2 {
            return Err(DistributionError::EmptyInput {
                count: points.len(),
            });
        }
        if let Some(&(offset, value)) = points
            .iter()
            .find(|(offset, value)| !offset.is_finite() || !value.is_finite())
        {
            return Err(DistributionError::NonFinite { offset, value });
        }

        let mut sorted = points.to_vec();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        for pair in sorted.windows(2) {
            let ((offset, value), (next_offset, next_value)) = (pair[0], pair[1]);
            if value >= next_value {
                return Err(DistributionError::DecreasingValue {
                    offset,
                    value,
                    next_offset,
                    next_value,
                });
            }
            if offset == next_offset {
                return Err(DistributionError::DuplicateOffset { offset });
            }
        }

        // Sorted with strictly increasing values, so the extremes sit at the ends.
        let (min_offset, min_value) = sorted[0];
        let (max_offset, max_value) = sorted[sorted.len() - 1];

        let segments = sorted
            .windows(2)
            .map(|pair| -> Result<RangedLinearEquation, DistributionError> {
                let x1 = calc_fraction(min_offset, max_offset, pair[0].0);
                let x2 = calc_fraction(min_offset, max_offset, pair[1].0);
                let y1 = calc_fraction(min_value, max_value, pair[0].1);
                let y2 = calc_fraction(min_value, max_value, pair[1].1);
                let equation = LinearEquation::from_two_points(x1, y1, x2, y2)?;
                Ok(RangedLinearEquation::new(equation, x1..=x2))
            })
            .collect::<Result<Segments, _>>()?;

        Ok(Self { segments })
    }

    /// Builds a curve from slices positioned on `0..=1`.
    pub fn from_slices(slices: &[SensitivitySlice]) -> Result<Self, DistributionError> {
        Self::from_slices_in(0.0..=1.0, slices)
    }

    /// Builds a curve from slices positioned on `domain`, in caller units.
    ///
    /// Positions are normalized into `0..=1` before the segments are built.
    /// An empty slice list yields the identity curve.
    pub fn from_slices_in(
        domain: RangeInclusive<f32>,
        slices: &[SensitivitySlice],
    ) -> Result<Self, DistributionError> {
        let (start, end) = (*domain.start(), *domain.end());
        if !start.is_finite() || !end.is_finite() || start >= end {
            return Err(DistributionError::InvalidDomain { start, end });
        }
        if slices.is_empty() {
            return Ok(Self::identity());
        }

        let mut anchors: SmallVec<[(f32, LinearEquation); 4]> = SmallVec::new();
        let mut previous_position: Option<f32> = None;

        for slice in slices {
            let position = slice.position;
            match previous_position {
                None if position != start => {
                    return Err(DistributionError::FirstValueNotZero {
                        position,
                        expected: start,
                    });
                }
                _ if !domain.contains(&position) => {
                    return Err(DistributionError::OutOfRange {
                        position,
                        start,
                        end,
                    });
                }
                Some(previous) if position <= previous => {
                    return Err(DistributionError::OverlappingRange { position, previous });
                }
                _ => {}
            }
            if !slice.sensitivity.is_finite() || slice.sensitivity <= 0.0 {
                return Err(DistributionError::InvalidSensitivity {
                    sensitivity: slice.sensitivity,
                    position,
                });
            }

            // Keep the curve continuous: the new line passes through the value
            // the previous line reaches at this position.
            let relative = calc_fraction(start, end, position);
            let y0 = anchors
                .last()
                .map_or(0.0, |(_, equation)| f64::from(equation.value_from_offset(relative)));
            let slope = f64::from(slice.sensitivity);
            let intercept = y0 - slope * f64::from(relative);
            anchors.push((relative, LinearEquation::new(slope, intercept)));
            previous_position = Some(position);
        }

        let total = anchors
            .last()
            .map_or(1.0, |(_, equation)| f64::from(equation.value_from_offset(1.0)));

        let segments = anchors
            .iter()
            .enumerate()
            .map(|(index, (segment_start, equation))| {
                let segment_end = anchors.get(index + 1).map_or(1.0, |(next, _)| *next);
                RangedLinearEquation::new(equation.normalized_by(total), *segment_start..=segment_end)
            })
            .collect();

        Ok(Self { segments })
    }

    /// Collects slices for [`from_slices_in`](Self::from_slices_in).
    pub fn sensitivity() -> SensitivityBuilder {
        SensitivityBuilder::new()
    }

    fn identity() -> Self {
        let mut segments = Segments::new();
        segments.push(RangedLinearEquation::new(
            LinearEquation::new(1.0, 0.0),
            0.0..=1.0,
        ));
        Self { segments }
    }

    pub fn segments(&self) -> &[RangedLinearEquation] {
        &self.segments
    }

    /// Value of the curve at `offset`.
    pub fn interpolate(&self, offset: f32) -> Result<f32, DistributionError> {
        self.segments
            .iter()
            .find(|segment| segment.contains_offset(offset))
            .map(|segment| segment.equation.value_from_offset(offset))
            .ok_or(DistributionError::NoSegment {
                lookup: Lookup::Offset,
                input: offset,
            })
    }

    /// Offset at which the curve reaches `value`.
    pub fn inverse(&self, value: f32) -> Result<f32, DistributionError> {
        self.segments
            .iter()
            .find(|segment| segment.contains_value(value))
            .map(|segment| segment.equation.offset_from_value(value))
            .ok_or(DistributionError::NoSegment {
                lookup: Lookup::Value,
                input: value,
            })
    }

    /// Evaluates the edge segment nearest to an out-of-domain `offset`.
    pub(crate) fn interpolate_nearest(&self, offset: f32) -> f32 {
        match self.edge_segment(|segment| offset < *segment.offset_range.start()) {
            Some(segment) => segment.equation.value_from_offset(offset),
            None => offset,
        }
    }

    /// Evaluates the edge segment nearest to an out-of-domain `value`.
    pub(crate) fn inverse_nearest(&self, value: f32) -> f32 {
        match self.edge_segment(|segment| value < *segment.value_range.start()) {
            Some(segment) => segment.equation.offset_from_value(value),
            None => value,
        }
    }

    fn edge_segment(
        &self,
        before_first: impl Fn(&RangedLinearEquation) -> bool,
    ) -> Option<&RangedLinearEquation> {
        let first = self.segments.first()?;
        if before_first(first) {
            Some(first)
        } else {
            self.segments.last()
        }
    }
}

/// Chainable collector of sensitivity slices.
///
/// Nothing is validated until [`build`](Self::build), which hands the whole
/// list to [`PiecewiseDistribution::from_slices_in`].
///
/// ```
/// use mosaic_slider::PiecewiseDistribution;
///
/// let curve = PiecewiseDistribution::sensitivity()
///     .slice_at(2.0, 0.0)
///     .slice_at(1.0, 0.5)
///     .slice_at(2.0, 0.8)
///     .build()?;
/// assert_eq!(curve.segments().len(), 3);
/// # Ok::<(), mosaic_slider::DistributionError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SensitivityBuilder {
    domain: RangeInclusive<f32>,
    slices: Vec<SensitivitySlice>,
}

impl Default for SensitivityBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SensitivityBuilder {
    pub fn new() -> Self {
        Self {
            domain: 0.0..=1.0,
            slices: Vec::new(),
        }
    }

    /// Declares slices against `domain` instead of `0..=1`, starting with
    /// `initial_sensitivity` at the start of the domain.
    pub fn over(domain: RangeInclusive<f32>, initial_sensitivity: f32) -> Self {
        let first = SensitivitySlice::new(initial_sensitivity, *domain.start());
        Self {
            domain,
            slices: vec![first],
        }
    }

    pub fn slice_at(mut self, sensitivity: f32, position: f32) -> Self {
        self.slices.push(SensitivitySlice::new(sensitivity, position));
        self
    }

    pub fn build(self) -> Result<PiecewiseDistribution, DistributionError> {
        PiecewiseDistribution::from_slices_in(self.domain, &self.slices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-5,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn checkpoints_in_native_units_are_normalized() {
        let curve = PiecewiseDistribution::from_checkpoints(&[
            (0.0, 0.0),
            (25.0, 25.0),
            (50.0, 75.0),
            (100.0, 100.0),
        ])
        .unwrap();

        assert_eq!(curve.segments().len(), 3);
        assert_close(curve.interpolate(0.1).unwrap(), 0.1);
        assert_close(curve.interpolate(0.4).unwrap(), 0.55);
        assert_close(curve.interpolate(0.6).unwrap(), 0.8);
        assert_close(curve.interpolate(0.75).unwrap(), 0.875);
    }

    #[test]
    fn checkpoint_inverse_looks_up_by_value() {
        let curve = PiecewiseDistribution::from_checkpoints(&[
            (0.0, 0.0),
            (0.25, 25.0),
            (0.5, 75.0),
            (1.0, 100.0),
        ])
        .unwrap();

        assert_close(curve.inverse(0.25).unwrap(), 0.25);
        assert_close(curve.inverse(0.75).unwrap(), 0.5);
        assert_close(curve.inverse(1.0).unwrap(), 1.0);
    }

    #[test]
    fn checkpoints_are_sorted_by_offset() {
        let curve =
            PiecewiseDistribution::from_checkpoints(&[(1.0, 20.0), (0.0, 0.0), (0.5, 10.0)])
                .unwrap();
        assert_eq!(*curve.segments()[0].offset_range.start(), 0.0);
        assert_close(curve.interpolate(0.5).unwrap(), 0.5);
    }

    #[test]
    fn decreasing_value_names_the_offending_pair() {
        let err = PiecewiseDistribution::from_checkpoints(&[
            (0.0, 0.0),
            (5.0, 10.0),
            (8.0, 16.0),
            (7.0, 20.0),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            DistributionError::DecreasingValue {
                offset: 7.0,
                value: 20.0,
                next_offset: 8.0,
                next_value: 16.0,
            }
        );
    }

    #[test]
    fn too_few_or_malformed_checkpoints_are_rejected() {
        assert_eq!(
            PiecewiseDistribution::from_checkpoints(&[]),
            Err(DistributionError::EmptyInput { count: 0 })
        );
        assert_eq!(
            PiecewiseDistribution::from_checkpoints(&[(0.0, 0.0)]),
            Err(DistributionError::EmptyInput { count: 1 })
        );
        assert!(matches!(
            PiecewiseDistribution::from_checkpoints(&[(0.0, 0.0), (f32::NAN, 1.0)]),
            Err(DistributionError::NonFinite { .. })
        ));
        assert_eq!(
            PiecewiseDistribution::from_checkpoints(&[(0.0, 0.0), (0.5, 1.0), (0.5, 2.0)]),
            Err(DistributionError::DuplicateOffset { offset: 0.5 })
        );
    }

    #[test]
    fn out_of_domain_lookup_has_no_segment() {
        let curve =
            PiecewiseDistribution::from_checkpoints(&[(0.0, 0.0), (0.5, 10.0), (1.0, 20.0)])
                .unwrap();
        assert_eq!(
            curve.interpolate(1.5),
            Err(DistributionError::NoSegment {
                lookup: Lookup::Offset,
                input: 1.5,
            })
        );
        assert!(curve.inverse(-0.5).is_err());
        // Edge fallback extends the nearest segment.
        assert_close(curve.interpolate_nearest(1.5), 1.5);
        assert_close(curve.inverse_nearest(-0.5), -0.5);
    }

    #[test]
    fn sensitivity_slices_are_continuous_and_normalized() {
        let curve = PiecewiseDistribution::from_slices(&[
            SensitivitySlice::new(2.0, 0.0),
            SensitivitySlice::new(1.0, 0.5),
            SensitivitySlice::new(2.0, 0.8),
        ])
        .unwrap();

        assert_close(curve.interpolate(0.0).unwrap(), 0.0);
        assert_close(curve.interpolate(0.3).unwrap(), 0.35294);
        assert_close(curve.interpolate(0.7).unwrap(), 0.70588);
        assert_close(curve.interpolate(0.9).unwrap(), 0.88235);
        assert_close(curve.interpolate(1.0).unwrap(), 1.0);
        // Boundaries agree on both neighbouring segments.
        let at_half = curve.segments()[0].equation.value_from_offset(0.5);
        assert_close(curve.segments()[1].equation.value_from_offset(0.5), at_half);
    }

    #[test]
    fn sensitivity_over_a_sub_range() {
        let curve = SensitivityBuilder::over(0.0..=200.0, 1.0)
            .slice_at(3.0, 100.0)
            .build()
            .unwrap();

        assert_eq!(curve.segments().len(), 2);
        assert_close(*curve.segments()[1].offset_range.start(), 0.5);
        // 0.5 of raw total 2.0 is reached at the first boundary.
        assert_close(curve.interpolate(0.5).unwrap(), 0.25);
        assert_close(curve.inverse(0.25).unwrap(), 0.5);
    }

    #[test]
    fn no_slices_is_identity() {
        let curve = PiecewiseDistribution::from_slices(&[]).unwrap();
        assert_close(curve.interpolate(0.42).unwrap(), 0.42);
        assert_close(curve.inverse(0.42).unwrap(), 0.42);
    }

    #[test]
    fn sensitivity_builder_errors() {
        let overlapping = PiecewiseDistribution::sensitivity()
            .slice_at(0.2, 0.0)
            .slice_at(1.0, 0.75)
            .slice_at(3.0, 0.55)
            .build();
        assert_eq!(
            overlapping,
            Err(DistributionError::OverlappingRange {
                position: 0.55,
                previous: 0.75,
            })
        );

        let late_start = PiecewiseDistribution::sensitivity()
            .slice_at(0.2, 0.3)
            .build();
        assert_eq!(
            late_start,
            Err(DistributionError::FirstValueNotZero {
                position: 0.3,
                expected: 0.0,
            })
        );

        let out_of_range = PiecewiseDistribution::sensitivity()
            .slice_at(0.2, 0.0)
            .slice_at(1.0, 1.75)
            .build();
        assert_eq!(
            out_of_range,
            Err(DistributionError::OutOfRange {
                position: 1.75,
                start: 0.0,
                end: 1.0,
            })
        );

        let flat = PiecewiseDistribution::sensitivity()
            .slice_at(1.0, 0.0)
            .slice_at(0.0, 0.5)
            .build();
        assert!(matches!(
            flat,
            Err(DistributionError::InvalidSensitivity { .. })
        ));

        assert!(matches!(
            PiecewiseDistribution::from_slices_in(1.0..=1.0, &[]),
            Err(DistributionError::InvalidDomain { .. })
        ));
    }
}
