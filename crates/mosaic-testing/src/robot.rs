//! Robot-style gesture driver for slider tests
//!
//! The robot stands in for the host: it measures the track, presses at
//! positions and runs drags, all through the same entry points a real widget
//! would use.
//!
//! # Example
//!
//! ```
//! use mosaic_slider::{SliderState, ValueDistribution};
//! use mosaic_foundation::MutatePriority;
//! use mosaic_testing::SliderRobot;
//!
//! let state = SliderState::new(0.0, 0.0..=100.0, None, ValueDistribution::Linear);
//! let robot = SliderRobot::new(state).measured(200.0, 20.0);
//!
//! robot.press_at_fraction(0.25).unwrap();
//! robot.drag(MutatePriority::UserInput, 50.0, 5).unwrap();
//! assert!((robot.state().value() - 50.0).abs() < 1e-4);
//! ```

use mosaic_foundation::{ArbiterError, DraggableState, MutatePriority, MutatorToken, TokenStatus};
use mosaic_slider::SliderState;
use std::cell::RefCell;
use std::rc::Rc;

/// Drives a [`SliderState`] the way a widget host would.
pub struct SliderRobot {
    state: SliderState,
}

impl SliderRobot {
    pub fn new(state: SliderState) -> Self {
        Self { state }
    }

    /// Measures the track before returning the robot.
    pub fn measured(self, track_width: f32, thumb_width: f32) -> Self {
        self.measure(track_width, thumb_width);
        self
    }

    /// Simulates a layout pass.
    pub fn measure(&self, track_width: f32, thumb_width: f32) {
        self.state.update_dimensions(track_width, thumb_width);
    }

    pub fn state(&self) -> &SliderState {
        &self.state
    }

    /// Presses at pixel `x` on the track.
    pub fn press_at(&self, x: f32) -> Result<f32, ArbiterError> {
        log::trace!("robot press at {}", x);
        self.state.handle_press(x)
    }

    /// Presses at `fraction` of the measured track width.
    pub fn press_at_fraction(&self, fraction: f32) -> Result<f32, ArbiterError> {
        self.press_at(fraction * self.state.total_width())
    }

    /// Runs one scoped drag that moves `distance` pixels in `steps` equal deltas.
    ///
    /// Returns the value after the drag.
    pub fn drag(
        &self,
        priority: MutatePriority,
        distance: f32,
        steps: usize,
    ) -> Result<f32, ArbiterError> {
        let steps = steps.max(1);
        let delta = distance / steps as f32;
        let mut failure = None;
        self.state.drag(priority, &mut |scope| {
            for _ in 0..steps {
                if let Err(err) = scope.drag_by(delta) {
                    failure = Some(err);
                    break;
                }
            }
        })?;
        match failure {
            Some(err) => Err(err),
            None => Ok(self.state.value()),
        }
    }

    /// Starts a long-lived drag that stays open until
    /// [`DragGesture::finish`].
    pub fn start_drag(&self, priority: MutatePriority) -> DragGesture<'_> {
        let token = self.state.begin_drag(priority).token();
        DragGesture {
            state: &self.state,
            token,
        }
    }
}

/// An open drag gesture started by [`SliderRobot::start_drag`].
pub struct DragGesture<'a> {
    state: &'a SliderState,
    token: MutatorToken,
}

impl DragGesture<'_> {
    pub fn token(&self) -> MutatorToken {
        self.token
    }

    pub fn status(&self) -> TokenStatus {
        self.state.arbiter().status(self.token)
    }

    /// Whether this gesture's deltas currently reach the slider.
    pub fn is_active(&self) -> bool {
        self.status() == TokenStatus::Active
    }

    pub fn move_by(&self, delta: f32) -> Result<f32, ArbiterError> {
        self.state.drag_by(self.token, delta)
    }

    /// Lifts the pointer.
    pub fn finish(self) -> Result<(), ArbiterError> {
        self.state.end_drag(self.token)
    }
}

/// Records every value a controlled slider reports.
#[derive(Clone, Default)]
pub struct ValueLog {
    values: Rc<RefCell<Vec<f32>>>,
}

impl ValueLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback to pass to [`SliderState::controlled`].
    pub fn sink(&self) -> impl Fn(f32) + 'static {
        let values = self.values.clone();
        move |value| values.borrow_mut().push(value)
    }

    pub fn values(&self) -> Vec<f32> {
        self.values.borrow().clone()
    }

    pub fn last(&self) -> Option<f32> {
        self.values.borrow().last().copied()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}
