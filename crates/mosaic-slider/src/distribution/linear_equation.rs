use super::error::DistributionError;
use crate::math::contains_with_tolerance;
use std::ops::RangeInclusive;

/// Slack allowed when matching an input against a segment's range, so values
/// that land a rounding error past a boundary still find the edge segment.
pub(crate) const SEGMENT_TOLERANCE: f32 = 1e-6;

/// Affine map `y = slope * x + intercept`.
///
/// Coefficients are kept in `f64`; fitting a line through two `f32` points
/// loses too much precision for the round trip otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearEquation {
    slope: f64,
    intercept: f64,
}

impl LinearEquation {
    pub const fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// The unique line through `(x1, y1)` and `(x2, y2)`.
    pub fn from_two_points(x1: f32, y1: f32, x2: f32, y2: f32) -> Result<Self, DistributionError> {
        if x1 == x2 {
            return Err(DistributionError::DuplicateOffset { offset: x1 });
        }
        let slope = (f64::from(y2) - f64::from(y1)) / (f64::from(x2) - f64::from(x1));
        let intercept = f64::from(y2) - slope * f64::from(x2);
        Ok(Self::new(slope, intercept))
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn value_from_offset(&self, offset: f32) -> f32 {
        (self.slope * f64::from(offset) + self.intercept) as f32
    }

    /// Inverse of [`value_from_offset`](Self::value_from_offset). Undefined
    /// for a zero slope; builders never produce one.
    pub fn offset_from_value(&self, value: f32) -> f32 {
        ((f64::from(value) - self.intercept) / self.slope) as f32
    }

    /// Same line with both coefficients divided by `divisor`.
    pub(crate) fn normalized_by(&self, divisor: f64) -> Self {
        Self::new(self.slope / divisor, self.intercept / divisor)
    }
}

/// A [`LinearEquation`] restricted to the offsets it is valid for.
#[derive(Debug, Clone, PartialEq)]
pub struct RangedLinearEquation {
    pub equation: LinearEquation,
    pub offset_range: RangeInclusive<f32>,
    /// `equation` evaluated at both ends of `offset_range`.
    pub value_range: RangeInclusive<f32>,
}

impl RangedLinearEquation {
    pub fn new(equation: LinearEquation, offset_range: RangeInclusive<f32>) -> Self {
        let value_range = equation.value_from_offset(*offset_range.start())
            ..=equation.value_from_offset(*offset_range.end());
        Self {
            equation,
            offset_range,
            value_range,
        }
    }

    pub fn contains_offset(&self, offset: f32) -> bool {
        contains_with_tolerance(&self.offset_range, offset, SEGMENT_TOLERANCE)
    }

    pub fn contains_value(&self, value: f32) -> bool {
        contains_with_tolerance(&self.value_range, value, SEGMENT_TOLERANCE)
    }
}
