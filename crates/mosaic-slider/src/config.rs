//! Declarative slider configuration.
//!
//! [`SliderConfig`] describes a slider as plain data so it can be loaded from
//! JSON (or any other serde format) and validated before a [`SliderState`] is
//! built from it:
//!
//! ```json
//! {
//!   "initial_value": 250.0,
//!   "range": { "start": 0.0, "end": 1000.0 },
//!   "disabled_range": { "start": 800.0, "end": 1000.0 },
//!   "distribution": { "kind": "checkpoints", "points": [[0.0, 0.0], [0.5, 100.0], [1.0, 1000.0]] }
//! }
//! ```

use crate::distribution::{DistributionError, PiecewiseDistribution, SensitivitySlice, ValueDistribution};
use crate::model::SliderModel;
use crate::state::SliderState;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::rc::Rc;
use thiserror::Error;

/// Default values used when a slider is declared without them.
pub struct SliderDefaults;

impl SliderDefaults {
    pub const RANGE: RangeInclusive<f32> = 0.0..=1.0;

    pub fn distribution() -> ValueDistribution {
        ValueDistribution::Linear
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("slider range {start}..={end} must be finite and not reversed")]
    InvalidRange { start: f32, end: f32 },
    #[error("disabled range {start}..={end} is outside the slider range {range_start}..={range_end}")]
    DisabledOutsideRange {
        start: f32,
        end: f32,
        range_start: f32,
        range_end: f32,
    },
    #[error("initial value {value} is not finite")]
    NonFiniteValue { value: f32 },
    #[error(transparent)]
    Distribution(#[from] DistributionError),
}

/// Serializable form of a [`ValueDistribution`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DistributionConfig {
    #[default]
    Linear,
    Parabolic {
        a: f32,
        #[serde(default)]
        b: f32,
        #[serde(default)]
        c: f32,
    },
    /// `(offset, value)` anchors.
    Checkpoints { points: Vec<(f32, f32)> },
    /// Slices positioned on `offset_range`, or on `0..=1` when absent.
    Sensitivity {
        #[serde(default)]
        offset_range: Option<RangeInclusive<f32>>,
        slices: Vec<SensitivitySlice>,
    },
}

impl DistributionConfig {
    pub fn build(&self) -> Result<ValueDistribution, DistributionError> {
        match self {
            DistributionConfig::Linear => Ok(ValueDistribution::Linear),
            DistributionConfig::Parabolic { a, b, c } => Ok(ValueDistribution::parabolic(*a, *b, *c)),
            DistributionConfig::Checkpoints { points } => ValueDistribution::checkpoints(points),
            DistributionConfig::Sensitivity {
                offset_range,
                slices,
            } => {
                let domain = offset_range.clone().unwrap_or(0.0..=1.0);
                PiecewiseDistribution::from_slices_in(domain, slices).map(ValueDistribution::from)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    pub initial_value: f32,
    pub range: RangeInclusive<f32>,
    pub disabled_range: Option<RangeInclusive<f32>>,
    pub distribution: DistributionConfig,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            initial_value: *SliderDefaults::RANGE.start(),
            range: SliderDefaults::RANGE,
            disabled_range: None,
            distribution: DistributionConfig::Linear,
        }
    }
}

impl SliderConfig {
    /// Checks the numeric fields. The distribution is checked when built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (start, end) = (*self.range.start(), *self.range.end());
        if !start.is_finite() || !end.is_finite() || start > end {
            return Err(ConfigError::InvalidRange { start, end });
        }
        if !self.initial_value.is_finite() {
            return Err(ConfigError::NonFiniteValue {
                value: self.initial_value,
            });
        }
        // An empty disabled range disables nothing and needs no bounds check.
        if let Some(disabled) = self.disabled_range.as_ref().filter(|d| !d.is_empty()) {
            if !self.range.contains(disabled.start()) || !self.range.contains(disabled.end()) {
                return Err(ConfigError::DisabledOutsideRange {
                    start: *disabled.start(),
                    end: *disabled.end(),
                    range_start: start,
                    range_end: end,
                });
            }
        }
        Ok(())
    }

    pub fn build_model(&self) -> Result<SliderModel, ConfigError> {
        self.validate()?;
        let distribution = self.distribution.build()?;
        Ok(SliderModel::new(
            self.initial_value,
            self.range.clone(),
            self.disabled_range.clone(),
            distribution,
        ))
    }

    pub fn build_state(&self) -> Result<SliderState, ConfigError> {
        Ok(SliderState::from_model(self.build_model()?, None))
    }

    pub fn build_controlled_state(
        &self,
        on_value_change: impl Fn(f32) + 'static,
    ) -> Result<SliderState, ConfigError> {
        Ok(SliderState::from_model(
            self.build_model()?,
            Some(Rc::new(on_value_change)),
        ))
    }
}
