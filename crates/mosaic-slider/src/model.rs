//! Pure slider model.
//!
//! [`SliderModel`] holds everything a slider knows and converts between pixel
//! offsets on the track and user values. Transforms never mutate; they return
//! a [`SliderUpdate`] (or a new model) and leave storing to the owner.

use crate::distribution::ValueDistribution;
use crate::math::{calc_fraction, coerce_in, fraction_to_value, lerp, value_to_fraction};
use std::ops::RangeInclusive;

/// Result of a gesture or value change: where the thumb sits and what value
/// it stands for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderUpdate {
    pub raw_offset: f32,
    pub value: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliderModel {
    range: RangeInclusive<f32>,
    disabled_range: Option<RangeInclusive<f32>>,
    distribution: ValueDistribution,
    total_width: f32,
    thumb_width: f32,
    value: f32,
    raw_offset: f32,
}

impl SliderModel {
    /// Creates an unmeasured model. An empty `disabled_range` disables nothing.
    pub fn new(
        initial_value: f32,
        range: RangeInclusive<f32>,
        disabled_range: Option<RangeInclusive<f32>>,
        distribution: ValueDistribution,
    ) -> Self {
        let mut model = Self {
            range,
            disabled_range: disabled_range.filter(|disabled| !disabled.is_empty()),
            distribution,
            total_width: 0.0,
            thumb_width: 0.0,
            value: 0.0,
            raw_offset: 0.0,
        };
        let update = model.with_value(initial_value);
        model.store(update);
        model
    }

    pub fn range(&self) -> &RangeInclusive<f32> {
        &self.range
    }

    pub fn disabled_range(&self) -> Option<&RangeInclusive<f32>> {
        self.disabled_range.as_ref()
    }

    pub fn distribution(&self) -> &ValueDistribution {
        &self.distribution
    }

    pub fn total_width(&self) -> f32 {
        self.total_width
    }

    pub fn thumb_width(&self) -> f32 {
        self.thumb_width
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn raw_offset(&self) -> f32 {
        self.raw_offset
    }

    /// Clamps `value` into the range, then pushes it out of the disabled range.
    ///
    /// A disabled range anchored at the range start pushes values up to its
    /// end; any other disabled range pushes them down to its start. NaN
    /// collapses to the range start.
    pub fn coerce_value(&self, value: f32) -> f32 {
        if value.is_nan() {
            return *self.range.start();
        }
        let value = coerce_in(value, &self.range);
        match &self.disabled_range {
            Some(disabled) if disabled.contains(&value) => {
                if disabled.start() == self.range.start() {
                    *disabled.end()
                } else {
                    *disabled.start()
                }
            }
            _ => value,
        }
    }

    /// Coerced `value` and the offset it maps to.
    pub fn with_value(&self, value: f32) -> SliderUpdate {
        let value = self.coerce_value(value);
        SliderUpdate {
            raw_offset: self.to_offset_px(value),
            value,
        }
    }

    /// Moves the raw offset by `delta`. The offset itself is not clamped; only
    /// the value derived from it is.
    pub fn apply_delta(&self, delta: f32) -> SliderUpdate {
        let raw_offset = self.raw_offset + delta;
        SliderUpdate {
            raw_offset,
            value: self.to_user_value(raw_offset),
        }
    }

    /// Where the thumb rests once a gesture lets go.
    ///
    /// Re-anchors the raw offset on the committed value, which moves it out
    /// of the disabled span and back onto the track.
    pub fn settled(&self) -> SliderUpdate {
        self.with_value(self.value)
    }

    pub fn apply_press(&self, pixel_x: f32) -> SliderUpdate {
        SliderUpdate {
            raw_offset: pixel_x,
            value: self.to_user_value(pixel_x),
        }
    }

    /// The same model measured at new dimensions.
    ///
    /// A changed track width re-anchors the raw offset: proportionally when a
    /// width was known before, from the committed value otherwise.
    pub fn with_dimensions(&self, total_width: f32, thumb_width: f32) -> Self {
        let mut next = self.clone();
        next.total_width = total_width;
        next.thumb_width = thumb_width;
        if total_width != self.total_width {
            next.raw_offset = if self.total_width > 0.0 {
                self.raw_offset * total_width / self.total_width
            } else {
                next.to_offset_px(self.value)
            };
        }
        next
    }

    /// User value at pixel `offset` on the track.
    pub fn to_user_value(&self, offset: f32) -> f32 {
        let fraction = calc_fraction(0.0, self.total_width, offset);
        let track = self.track_range();
        let scaled = lerp(*track.start(), *track.end(), fraction);
        let value_fraction = self.distribution.interpolate(scaled);
        self.coerce_value(fraction_to_value(value_fraction, &self.range))
    }

    /// Pixel offset on the track for `value`, after coercion.
    pub fn to_offset_px(&self, value: f32) -> f32 {
        self.track_fraction_of(self.coerce_value(value)) * self.total_width
    }

    /// Fraction of the track at which `value` sits. Only the slider range is
    /// applied, not the disabled range.
    pub fn track_fraction_of(&self, value: f32) -> f32 {
        let value_fraction = value_to_fraction(coerce_in(value, &self.range), &self.range);
        let track = self.track_range();
        calc_fraction(
            *track.start(),
            *track.end(),
            self.distribution.inverse(value_fraction),
        )
    }

    /// Thumb position as a fraction of the track; 0 while unmeasured.
    pub fn offset_as_fraction(&self) -> f32 {
        calc_fraction(0.0, self.total_width, self.raw_offset)
    }

    pub fn disabled_range_as_fractions(&self) -> Option<RangeInclusive<f32>> {
        self.disabled_range.as_ref().map(|disabled| {
            self.track_fraction_of(*disabled.start())..=self.track_fraction_of(*disabled.end())
        })
    }

    fn track_range(&self) -> RangeInclusive<f32> {
        self.distribution.inverse_range(0.0..=1.0)
    }

    pub(crate) fn store(&mut self, update: SliderUpdate) {
        self.raw_offset = update.raw_offset;
        self.value = update.value;
    }

    pub(crate) fn store_offset(&mut self, raw_offset: f32) {
        self.raw_offset = raw_offset;
    }

    pub(crate) fn store_value(&mut self, value: f32) {
        self.value = value;
    }
}
