//! Scripted gesture session.

use anyhow::Result;
use mosaic_foundation::{ArbiterError, DraggableState, MutatePriority};
use mosaic_slider::SliderState;
use std::cell::Cell;

const DRAG_STEPS: usize = 5;

/// Runs press, drag, preempted drag and programmatic updates against `state`.
///
/// For a controlled slider `host_value` is the host-side value; it is written
/// back into the slider after each gesture.
pub fn replay(
    label: &str,
    state: &SliderState,
    track_width: f32,
    thumb_width: f32,
    host_value: Option<&Cell<f32>>,
) -> Result<()> {
    log::info!("== {label} slider ==");
    state.update_dimensions(track_width, thumb_width);
    report(label, "measured", state);
    if let Some(range) = state.disabled_range_as_fractions() {
        log::info!("[{label}] disabled track span {:.3}..={:.3}", range.start(), range.end());
    }

    let pressed = state.handle_press(track_width * 0.25)?;
    log::info!("[{label}] press at quarter track -> {pressed:.3}");
    sync(state, host_value);
    report(label, "press", state);

    let step = track_width * 0.3 / DRAG_STEPS as f32;
    state.drag(MutatePriority::UserInput, &mut |scope| {
        for _ in 0..DRAG_STEPS {
            if let Err(err) = scope.drag_by(step) {
                log::warn!("[{label}] drag interrupted: {err}");
                break;
            }
        }
    })?;
    sync(state, host_value);
    report(label, "drag", state);

    preempted_drag(label, state, track_width, host_value)?;

    let range = state.range();
    let midpoint = (range.start() + range.end()) / 2.0;
    state.set_value(midpoint);
    report(label, "set_value(midpoint)", state);

    let target = *range.end();
    if state.set_progress(target) {
        sync(state, host_value);
        report(label, "set_progress(end)", state);
    } else {
        log::info!("[{label}] set_progress(end) was a no-op");
    }

    Ok(())
}

/// An animation-priority drag interrupted by a user drag.
fn preempted_drag(
    label: &str,
    state: &SliderState,
    track_width: f32,
    host_value: Option<&Cell<f32>>,
) -> Result<()> {
    let animation = state.begin_drag(MutatePriority::Default).token();
    state.drag_by(animation, track_width * 0.1)?;

    let finger = state.begin_drag(MutatePriority::UserInput).token();
    match state.drag_by(animation, track_width * 0.1) {
        Err(ArbiterError::Cancelled { id }) => {
            log::info!("[{label}] animation drag {id} was preempted")
        }
        other => log::warn!("[{label}] animation drag not preempted: {other:?}"),
    }
    state.drag_by(finger, -track_width * 0.05)?;
    state.end_drag(finger)?;
    if let Err(err) = state.end_drag(animation) {
        log::debug!("[{label}] {err}");
    }

    sync(state, host_value);
    report(label, "preempted drag", state);
    Ok(())
}

fn sync(state: &SliderState, host_value: Option<&Cell<f32>>) {
    if let Some(value) = host_value {
        state.set_value(value.get());
    }
}

fn report(label: &str, step: &str, state: &SliderState) {
    log::info!(
        "[{label}] {step}: value {:.3}, thumb at {:.3}",
        state.value(),
        state.offset_as_fraction()
    );
}
