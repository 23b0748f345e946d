//! End-to-end gesture sessions driven through the slider robot.

use mosaic_foundation::{ArbiterError, MutatePriority, TokenStatus};
use mosaic_slider::{SliderConfig, SliderState, ValueDistribution};
use mosaic_testing::prelude::*;
use mosaic_testing::robot_assertions::{assert_range_approx_eq, assert_round_trip, assert_thumb_at};

fn price_filter() -> SliderState {
    // Cheap items are packed into the first half of the track.
    let config: SliderConfig = serde_json::from_str(
        r#"{
            "initial_value": 0.0,
            "range": { "start": 0.0, "end": 1000.0 },
            "disabled_range": { "start": 800.0, "end": 1000.0 },
            "distribution": {
                "kind": "checkpoints",
                "points": [[0.0, 0.0], [0.5, 100.0], [1.0, 1000.0]]
            }
        }"#,
    )
    .unwrap();
    config.build_state().unwrap()
}

#[test]
fn press_then_drag_walks_the_curve() {
    let robot = SliderRobot::new(price_filter()).measured(400.0, 24.0);

    assert_approx_eq(robot.press_at_fraction(0.25).unwrap(), 50.0, 1e-3, "quarter track");
    assert_thumb_at(robot.state(), 0.25, 1e-5);

    let value = robot.drag(MutatePriority::UserInput, 100.0, 4).unwrap();
    assert_approx_eq(value, 100.0, 1e-3, "half track");
    assert_thumb_at(robot.state(), 0.5, 1e-5);
}

#[test]
fn dragging_into_the_disabled_range_stops_at_its_start() {
    let robot = SliderRobot::new(price_filter()).measured(400.0, 24.0);

    let value = robot.drag(MutatePriority::UserInput, 390.0, 13).unwrap();
    assert_eq!(value, 800.0);

    let disabled = robot.state().disabled_range_as_fractions().unwrap();
    assert_range_approx_eq(&disabled, &((0.5 + 0.7 / 1.8)..=1.0), 1e-4, "disabled span");
    assert_thumb_at(robot.state(), 0.5 + 0.7 / 1.8, 1e-4);

    let value = robot.drag(MutatePriority::UserInput, -10.0, 1).unwrap();
    assert!(value < 800.0, "thumb stuck in the disabled span at {}", value);
}

#[test]
fn overshooting_the_track_end_does_not_leave_slack() {
    let robot = SliderRobot::new(SliderState::new(
        0.0,
        0.0..=100.0,
        None,
        ValueDistribution::Linear,
    ))
    .measured(100.0, 10.0);

    assert_eq!(robot.drag(MutatePriority::UserInput, 200.0, 4).unwrap(), 100.0);
    assert_thumb_at(robot.state(), 1.0, 1e-6);

    let value = robot.drag(MutatePriority::UserInput, -30.0, 3).unwrap();
    assert_approx_eq(value, 70.0, 1e-4, "after pulling back");
}

#[test]
fn preempting_gesture_wins() {
    let robot = SliderRobot::new(SliderState::new(
        0.0,
        0.0..=100.0,
        None,
        ValueDistribution::Linear,
    ))
    .measured(100.0, 10.0);

    let animation = robot.start_drag(MutatePriority::Default);
    animation.move_by(50.0).unwrap();

    let finger = robot.start_drag(MutatePriority::UserInput);
    assert!(finger.is_active());
    assert_eq!(animation.status(), TokenStatus::Cancelled);
    assert!(matches!(
        animation.move_by(10.0),
        Err(ArbiterError::Cancelled { .. })
    ));

    finger.move_by(20.0).unwrap();
    finger.finish().unwrap();
    assert!(animation.finish().is_err());

    assert_approx_eq(robot.state().raw_offset(), 70.0, 1e-4, "raw offset");
    assert_approx_eq(robot.state().value(), 70.0, 1e-4, "value");
}

#[test]
fn controlled_slider_only_reports() {
    let log = ValueLog::new();
    let state = SliderState::controlled(
        10.0,
        0.0..=100.0,
        None,
        ValueDistribution::Linear,
        log.sink(),
    );
    let robot = SliderRobot::new(state).measured(200.0, 20.0);

    robot.press_at(100.0).unwrap();
    robot.drag(MutatePriority::UserInput, 20.0, 2).unwrap();

    assert_eq!(log.len(), 3);
    assert_approx_eq(log.last().unwrap(), 60.0, 1e-4, "last report");
    assert_eq!(robot.state().value(), 10.0);
}

#[test]
fn parabolic_slider_round_trips() {
    let curve = ValueDistribution::parabolic(0.8, 0.2, 0.0);
    for step in 0..=10 {
        assert_round_trip(&curve, step as f32 / 10.0, 1e-4);
    }
}
