//! Sliders with non-linear value distributions.
//!
//! A [`ValueDistribution`] decides how values are spread along the track, a
//! [`SliderModel`] converts between pixels and values, and a [`SliderState`]
//! applies presses and drag deltas under a [`DragArbiter`].
//!
//! [`DragArbiter`]: mosaic_foundation::DragArbiter

pub mod config;
pub mod distribution;
pub mod math;
pub mod model;
pub mod state;

#[cfg(test)]
mod tests;

pub use config::{ConfigError, DistributionConfig, SliderConfig, SliderDefaults};
pub use distribution::{
    DistributionError, LinearEquation, Lookup, PiecewiseDistribution, RangedLinearEquation,
    SensitivityBuilder, SensitivitySlice, ValueDistribution,
};
pub use model::{SliderModel, SliderUpdate};
pub use state::{SliderDragScope, SliderState, ValueChangeCallback};

pub mod prelude {
    pub use crate::config::{DistributionConfig, SliderConfig, SliderDefaults};
    pub use crate::distribution::{PiecewiseDistribution, SensitivitySlice, ValueDistribution};
    pub use crate::model::{SliderModel, SliderUpdate};
    pub use crate::state::SliderState;
    pub use mosaic_foundation::{DraggableState, DragScope, MutatePriority};
}
