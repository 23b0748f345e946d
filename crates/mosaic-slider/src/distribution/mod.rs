//! Mapping between a normalized track position and a normalized value.
//!
//! Every distribution maps track fraction to value fraction with
//! [`ValueDistribution::interpolate`] and back with
//! [`ValueDistribution::inverse`]. Both directions agree within rounding.

mod error;
mod linear_equation;
mod piecewise;

pub use error::{DistributionError, Lookup};
pub use linear_equation::{LinearEquation, RangedLinearEquation};
pub use piecewise::{PiecewiseDistribution, SensitivityBuilder, SensitivitySlice};

use std::ops::RangeInclusive;
use std::sync::Arc;

/// Curve a slider uses to place values along its track.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ValueDistribution {
    /// Identity in both directions.
    #[default]
    Linear,
    /// `a·x² + b·x + c`.
    Parabolic { a: f32, b: f32, c: f32 },
    /// Monotonic piecewise-linear curve, shared between slider states.
    Piecewise(Arc<PiecewiseDistribution>),
}

impl ValueDistribution {
    pub fn parabolic(a: f32, b: f32, c: f32) -> Self {
        if a == 0.0 {
            log::warn!("parabolic distribution with a == 0 has no quadratic term; inverse is undefined");
        }
        ValueDistribution::Parabolic { a, b, c }
    }

    /// See [`PiecewiseDistribution::from_checkpoints`].
    pub fn checkpoints(points: &[(f32, f32)]) -> Result<Self, DistributionError> {
        PiecewiseDistribution::from_checkpoints(points).map(Self::from)
    }

    /// See [`PiecewiseDistribution::from_slices`].
    pub fn sensitivity(slices: &[SensitivitySlice]) -> Result<Self, DistributionError> {
        PiecewiseDistribution::from_slices(slices).map(Self::from)
    }

    pub fn try_interpolate(&self, offset: f32) -> Result<f32, DistributionError> {
        match self {
            ValueDistribution::Linear => Ok(offset),
            ValueDistribution::Parabolic { a, b, c } => Ok(a * offset * offset + b * offset + c),
            ValueDistribution::Piecewise(curve) => curve.interpolate(offset),
        }
    }

    pub fn try_inverse(&self, value: f32) -> Result<f32, DistributionError> {
        match self {
            ValueDistribution::Linear => Ok(value),
            ValueDistribution::Parabolic { a, b, c } => Ok(parabolic_inverse(*a, *b, *c, value)),
            ValueDistribution::Piecewise(curve) => curve.inverse(value),
        }
    }

    /// Value fraction at track fraction `offset`.
    ///
    /// An input no segment covers is a caller bug. Debug builds panic; release
    /// builds log it and extend the nearest edge segment.
    pub fn interpolate(&self, offset: f32) -> f32 {
        match self.try_interpolate(offset) {
            Ok(value) => value,
            Err(err) => {
                if cfg!(debug_assertions) {
                    panic!("{err}");
                }
                log::error!("{err}");
                match self {
                    ValueDistribution::Piecewise(curve) => curve.interpolate_nearest(offset),
                    _ => offset,
                }
            }
        }
    }

    /// Track fraction at which the curve reaches `value`.
    ///
    /// Same contract as [`interpolate`](Self::interpolate).
    pub fn inverse(&self, value: f32) -> f32 {
        match self.try_inverse(value) {
            Ok(offset) => offset,
            Err(err) => {
                if cfg!(debug_assertions) {
                    panic!("{err}");
                }
                log::error!("{err}");
                match self {
                    ValueDistribution::Piecewise(curve) => curve.inverse_nearest(value),
                    _ => value,
                }
            }
        }
    }

    pub fn interpolate_range(&self, range: RangeInclusive<f32>) -> RangeInclusive<f32> {
        self.interpolate(*range.start())..=self.interpolate(*range.end())
    }

    pub fn inverse_range(&self, range: RangeInclusive<f32>) -> RangeInclusive<f32> {
        self.inverse(*range.start())..=self.inverse(*range.end())
    }
}

impl From<PiecewiseDistribution> for ValueDistribution {
    fn from(curve: PiecewiseDistribution) -> Self {
        ValueDistribution::Piecewise(Arc::new(curve))
    }
}

/// Positive root of `a·x² + b·x + (c − y) = 0`.
fn parabolic_inverse(a: f32, b: f32, c: f32, y: f32) -> f32 {
    if y == 0.0 {
        return 0.0;
    }
    let (a, b, c, y) = (f64::from(a), f64::from(b), f64::from(c), f64::from(y));
    let discriminant = b * b - 4.0 * a * (c - y);
    ((-b + discriminant.sqrt()) / (2.0 * a)) as f32
}
