//! Drag state traits.
//!
//! This is the state half of a draggable widget, shaped like Jetpack Compose's
//! `DraggableState` / `DragScope` pair. Gesture recognition lives with the
//! host; it reports signed pixel deltas (already adjusted for layout
//! direction) and implementers apply them under their [`DragArbiter`].
//!
//! [`DragArbiter`]: crate::DragArbiter

use crate::mutator::{ArbiterError, MutatePriority};

/// Receiver for the deltas of one exclusive drag span.
pub trait DragScope {
    /// Applies `pixels` of movement.
    ///
    /// Fails once the span has been preempted; the caller should stop
    /// feeding deltas at that point.
    fn drag_by(&mut self, pixels: f32) -> Result<(), ArbiterError>;
}

/// State that can be moved by drag gestures.
pub trait DraggableState {
    /// Applies a single delta outside any long-lived drag span.
    ///
    /// Implementations still go through their arbiter, so this fails while
    /// another drag holds it.
    fn dispatch_raw_delta(&self, delta: f32) -> Result<(), ArbiterError>;

    /// Runs `block` as one exclusive drag span at `priority`.
    ///
    /// Fails with `Busy` when the arbiter is held at an equal or higher
    /// priority, and with `Cancelled` when the span was preempted before
    /// `block` returned.
    fn drag(
        &self,
        priority: MutatePriority,
        block: &mut dyn FnMut(&mut dyn DragScope),
    ) -> Result<(), ArbiterError>;

    /// Whether a drag span currently holds the state.
    fn is_drag_in_progress(&self) -> bool;
}
