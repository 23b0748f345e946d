//! Slider state shared between the host and gesture handling.
//!
//! - `SliderState`: owns a [`SliderModel`] and a [`DragArbiter`]; every press,
//!   drag delta and value change goes through here
//! - `SliderDragScope`: the [`DragScope`] handed to scoped drags
//!
//! A state is either uncontrolled (gestures commit the value directly) or
//! controlled (gestures report the value to a callback and the host decides
//! whether to feed it back through [`SliderState::set_value`]).

use crate::distribution::ValueDistribution;
use crate::model::{SliderModel, SliderUpdate};
use mosaic_foundation::{
    Acquisition, ArbiterError, DragArbiter, DragScope, DraggableState, MutatePriority,
    MutatorToken,
};
use std::cell::RefCell;
use std::ops::RangeInclusive;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SLIDER_STATE_ID: AtomicU64 = AtomicU64::new(1);

/// Receives values produced by gestures on a controlled slider.
pub type ValueChangeCallback = Rc<dyn Fn(f32)>;

/// State object for a slider.
///
/// Cloning is cheap and every clone refers to the same slider.
#[derive(Clone)]
pub struct SliderState {
    inner: Rc<SliderStateInner>,
}

struct SliderStateInner {
    /// Unique ID for debugging
    id: u64,
    model: RefCell<SliderModel>,
    arbiter: DragArbiter,
    on_value_change: Option<ValueChangeCallback>,
}

impl SliderState {
    /// Creates an uncontrolled slider.
    pub fn new(
        initial_value: f32,
        range: RangeInclusive<f32>,
        disabled_range: Option<RangeInclusive<f32>>,
        distribution: ValueDistribution,
    ) -> Self {
        Self::from_model(
            SliderModel::new(initial_value, range, disabled_range, distribution),
            None,
        )
    }

    /// Creates a controlled slider. Gestures call `on_value_change` instead
    /// of committing the value.
    pub fn controlled(
        initial_value: f32,
        range: RangeInclusive<f32>,
        disabled_range: Option<RangeInclusive<f32>>,
        distribution: ValueDistribution,
        on_value_change: impl Fn(f32) + 'static,
    ) -> Self {
        Self::from_model(
            SliderModel::new(initial_value, range, disabled_range, distribution),
            Some(Rc::new(on_value_change)),
        )
    }

    pub(crate) fn from_model(model: SliderModel, on_value_change: Option<ValueChangeCallback>) -> Self {
        let id = NEXT_SLIDER_STATE_ID.fetch_add(1, Ordering::Relaxed);
        log::debug!(
            "slider {} created: value {} in {:?}, controlled: {}",
            id,
            model.value(),
            model.range(),
            on_value_change.is_some()
        );
        Self {
            inner: Rc::new(SliderStateInner {
                id,
                model: RefCell::new(model),
                arbiter: DragArbiter::new(),
                on_value_change,
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn is_controlled(&self) -> bool {
        self.inner.on_value_change.is_some()
    }

    /// Current committed value.
    pub fn value(&self) -> f32 {
        self.inner.model.borrow().value()
    }

    /// Commits `value` after coercion, in both modes.
    ///
    /// While a drag holds the slider only the value changes; the raw offset
    /// stays where the drag put it.
    pub fn set_value(&self, value: f32) {
        let update = self.value_update(value);
        self.inner.model.borrow_mut().store(update);
    }

    pub fn range(&self) -> RangeInclusive<f32> {
        self.inner.model.borrow().range().clone()
    }

    pub fn disabled_range(&self) -> Option<RangeInclusive<f32>> {
        self.inner.model.borrow().disabled_range().cloned()
    }

    pub fn distribution(&self) -> ValueDistribution {
        self.inner.model.borrow().distribution().clone()
    }

    pub fn raw_offset(&self) -> f32 {
        self.inner.model.borrow().raw_offset()
    }

    pub fn total_width(&self) -> f32 {
        self.inner.model.borrow().total_width()
    }

    pub fn thumb_width(&self) -> f32 {
        self.inner.model.borrow().thumb_width()
    }

    /// Thumb position for the renderer, in `0..=1`.
    pub fn offset_as_fraction(&self) -> f32 {
        self.inner.model.borrow().offset_as_fraction()
    }

    /// Disabled span for the renderer, as track fractions.
    pub fn disabled_range_as_fractions(&self) -> Option<RangeInclusive<f32>> {
        self.inner.model.borrow().disabled_range_as_fractions()
    }

    pub fn coerce_value(&self, value: f32) -> f32 {
        self.inner.model.borrow().coerce_value(value)
    }

    /// Snapshot of the underlying model.
    pub fn model(&self) -> SliderModel {
        self.inner.model.borrow().clone()
    }

    /// Records the measured track and thumb widths.
    ///
    /// A new track width also rescales [`raw_offset`](Self::raw_offset) so
    /// the thumb keeps its place on the track.
    pub fn update_dimensions(&self, total_width: f32, thumb_width: f32) {
        let mut model = self.inner.model.borrow_mut();
        if model.total_width() != total_width || model.thumb_width() != thumb_width {
            log::trace!(
                "slider {} measured: track {} thumb {}",
                self.inner.id,
                total_width,
                thumb_width
            );
        }
        *model = model.with_dimensions(total_width, thumb_width);
    }

    /// Moves the thumb to a pressed pixel position and reports the value.
    ///
    /// Presses run at [`MutatePriority::UserInput`], so they interrupt a
    /// programmatic drag but not a user drag.
    pub fn handle_press(&self, pixel_x: f32) -> Result<f32, ArbiterError> {
        self.inner.arbiter.mutate(MutatePriority::UserInput, |_| {
            let update = self.inner.model.borrow().apply_press(pixel_x);
            log::trace!("slider {} press at {} -> {}", self.inner.id, pixel_x, update.value);
            let value = self.report(update);
            self.settle();
            value
        })
    }

    /// Accessibility "set progress": reports `target` unless it coerces to
    /// the current value. Returns whether anything was reported.
    pub fn set_progress(&self, target: f32) -> bool {
        let update = self.value_update(target);
        if update.value == self.value() {
            return false;
        }
        self.report(update);
        true
    }

    /// Whether a mutator currently holds the slider.
    pub fn is_dragging(&self) -> bool {
        !self.inner.arbiter.is_idle()
    }

    /// Starts a drag gesture. A queued drag becomes active once the holder
    /// ends; until then its deltas are rejected.
    pub fn begin_drag(&self, priority: MutatePriority) -> Acquisition {
        let acquisition = self.inner.arbiter.acquire(priority);
        self.watch_cancellation(acquisition.token());
        acquisition
    }

    /// Starts a drag that takes over from any holder.
    pub fn begin_drag_immediately(&self, priority: MutatePriority) -> MutatorToken {
        let token = self.inner.arbiter.acquire_immediately(priority);
        self.watch_cancellation(token);
        token
    }

    /// Applies one drag delta for `token` and returns the resulting value.
    pub fn drag_by(&self, token: MutatorToken, delta: f32) -> Result<f32, ArbiterError> {
        self.inner
            .arbiter
            .with_mutator(token, || self.apply_delta(delta))
    }

    /// Ends the drag held by `token`. Ending the active drag rests the thumb.
    ///
    /// Ending a preempted drag acknowledges the preemption and returns
    /// [`ArbiterError::Cancelled`].
    pub fn end_drag(&self, token: MutatorToken) -> Result<(), ArbiterError> {
        let was_holder = self.inner.arbiter.holder() == Some(token);
        let promoted = self.inner.arbiter.release(token)?;
        if was_holder {
            self.settle();
        }
        if let Some(next) = promoted {
            log::debug!("slider {} drag {} now active", self.inner.id, next.id());
        }
        Ok(())
    }

    pub fn arbiter(&self) -> &DragArbiter {
        &self.inner.arbiter
    }

    fn apply_delta(&self, delta: f32) -> f32 {
        let update = self.inner.model.borrow().apply_delta(delta);
        log::trace!(
            "slider {} delta {} -> offset {} value {}",
            self.inner.id,
            delta,
            update.raw_offset,
            update.value
        );
        self.report(update)
    }

    fn value_update(&self, value: f32) -> SliderUpdate {
        let model = self.inner.model.borrow();
        let update = model.with_value(value);
        if self.is_dragging() {
            SliderUpdate {
                raw_offset: model.raw_offset(),
                value: update.value,
            }
        } else {
            update
        }
    }

    /// Stores the update and notifies. The callback runs with no borrow
    /// held so it may call back into the state.
    fn report(&self, update: SliderUpdate) -> f32 {
        match &self.inner.on_value_change {
            Some(on_value_change) => {
                self.inner.model.borrow_mut().store_offset(update.raw_offset);
                on_value_change(update.value);
            }
            None => self.inner.model.borrow_mut().store(update),
        }
        update.value
    }

    /// Rests the thumb once a gesture lets go. An uncontrolled slider moves
    /// the raw offset onto its committed value; a controlled one only keeps
    /// it on the track, since the host may not have fed the value back yet.
    fn settle(&self) {
        let mut model = self.inner.model.borrow_mut();
        let raw_offset = if self.inner.on_value_change.is_some() {
            model.raw_offset().clamp(0.0, model.total_width().max(0.0))
        } else {
            model.settled().raw_offset
        };
        model.store_offset(raw_offset);
    }

    fn watch_cancellation(&self, token: MutatorToken) {
        let id = self.inner.id;
        let registered = self.inner.arbiter.on_cancel(token, move || {
            log::debug!("slider {} drag {} cancelled", id, token.id());
        });
        if let Err(err) = registered {
            log::warn!("slider {} could not watch drag {}: {}", id, token.id(), err);
        }
    }
}

impl std::fmt::Debug for SliderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let model = self.inner.model.borrow();
        f.debug_struct("SliderState")
            .field("id", &self.inner.id)
            .field("value", &model.value())
            .field("raw_offset", &model.raw_offset())
            .field("range", model.range())
            .field("controlled", &self.is_controlled())
            .field("arbiter", &self.inner.arbiter)
            .finish()
    }
}

impl PartialEq for SliderState {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// [`DragScope`] for one scoped drag on a [`SliderState`].
pub struct SliderDragScope<'a> {
    state: &'a SliderState,
    token: MutatorToken,
}

impl SliderDragScope<'_> {
    pub fn token(&self) -> MutatorToken {
        self.token
    }
}

impl DragScope for SliderDragScope<'_> {
    fn drag_by(&mut self, pixels: f32) -> Result<(), ArbiterError> {
        self.state.drag_by(self.token, pixels).map(|_| ())
    }
}

impl DraggableState for SliderState {
    /// One-shot delta outside any drag, at [`MutatePriority::Default`].
    fn dispatch_raw_delta(&self, delta: f32) -> Result<(), ArbiterError> {
        self.inner
            .arbiter
            .mutate(MutatePriority::Default, |_| {
                self.apply_delta(delta);
                self.settle();
            })
    }

    /// Runs `block` as a drag. Fails with [`ArbiterError::Busy`] if another
    /// drag of equal or higher priority is active, and with
    /// [`ArbiterError::Cancelled`] if `block` was preempted.
    fn drag(
        &self,
        priority: MutatePriority,
        block: &mut dyn FnMut(&mut dyn DragScope),
    ) -> Result<(), ArbiterError> {
        let token = self.inner.arbiter.try_acquire(priority)?;
        self.watch_cancellation(token);
        let mut scope = SliderDragScope { state: self, token };
        block(&mut scope);
        self.end_drag(token)
    }

    fn is_drag_in_progress(&self) -> bool {
        self.is_dragging()
    }
}
