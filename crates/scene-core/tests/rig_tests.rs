use glam::{Vec2, Vec3};
use scene_core::rig::CameraRig;

const DT: f32 = 1.0 / 60.0;

#[test]
fn neutral_idle_holds_the_home_pose() {
    // No hand, no drag, no wheel: the camera starts at its resting orbit and
    // never moves off it.
    let mut rig = CameraRig::new();
    let mut pose = rig.advance(Vec2::ZERO, DT);
    for _ in 0..59 {
        pose = rig.advance(Vec2::ZERO, DT);
    }
    assert!(pose.eye.distance(Vec3::new(0.0, 4.0, 20.0)) < 1e-3);
    assert_eq!(pose.target, Vec3::new(0.0, 4.0, 0.0));
}

#[test]
fn hand_orbit_moves_the_eye() {
    let mut rig = CameraRig::new();
    let mut pose = rig.advance(Vec2::new(1.0, 0.0), DT);
    for _ in 0..600 {
        pose = rig.advance(Vec2::new(1.0, 0.0), DT);
    }
    // azimuth 1.5 rad at radius 20
    let expected = Vec3::new(1.5_f32.sin() * 20.0, 4.0, 1.5_f32.cos() * 20.0);
    assert!(
        pose.eye.distance(expected) < 0.05,
        "eye {:?} should settle near {:?}",
        pose.eye,
        expected
    );
}

#[test]
fn hand_height_raises_the_camera() {
    let mut rig = CameraRig::new();
    let mut pose = rig.advance(Vec2::new(0.0, 1.0), DT);
    for _ in 0..600 {
        pose = rig.advance(Vec2::new(0.0, 1.0), DT);
    }
    assert!((pose.eye.y - 9.0).abs() < 0.05, "4 + 1*5 = 9, got {}", pose.eye.y);
}

#[test]
fn height_offset_saturates_under_wild_drags() {
    let mut rig = CameraRig::new();
    for i in 0..20 {
        rig.begin_drag();
        rig.drag_to(0.3, (i as f32 - 10.0) * 5.0);
        rig.end_drag();
        assert!(
            rig.height_offset().abs() <= 6.0,
            "height offset {} escaped its clamp",
            rig.height_offset()
        );
    }
}

#[test]
fn radius_saturates_under_any_wheel_sequence() {
    let mut rig = CameraRig::new();
    for _ in 0..500 {
        rig.zoom(120.0);
        assert!(rig.radius() <= 40.0);
    }
    assert_eq!(rig.radius(), 40.0);
    for _ in 0..1000 {
        rig.zoom(-120.0);
        assert!(rig.radius() >= 8.0);
    }
    assert_eq!(rig.radius(), 8.0);
}

#[test]
fn wheel_rate_is_gentle() {
    let mut rig = CameraRig::new();
    rig.zoom(100.0);
    assert!((rig.radius() - 22.0).abs() < 1e-4, "100 ticks move 2 units");
}

#[test]
fn full_width_drag_orbits_a_whole_turn() {
    let mut rig = CameraRig::new();
    rig.begin_drag();
    rig.drag_to(1.0, 0.0);
    rig.end_drag();
    assert!((rig.azimuth_offset() - std::f32::consts::TAU).abs() < 1e-4);
}

#[test]
fn drag_deltas_are_relative_to_the_drag_start() {
    let mut rig = CameraRig::new();
    rig.begin_drag();
    rig.drag_to(0.25, 0.0);
    rig.drag_to(0.5, 0.0);
    rig.end_drag();
    let first = rig.azimuth_offset();
    assert!((first - std::f32::consts::PI).abs() < 1e-4);

    // A second drag composes on top of the first
    rig.begin_drag();
    rig.drag_to(-0.5, 0.0);
    rig.end_drag();
    assert!(rig.azimuth_offset().abs() < 1e-4);
}

#[test]
fn drag_without_begin_is_ignored() {
    let mut rig = CameraRig::new();
    rig.drag_to(1.0, 1.0);
    assert_eq!(rig.azimuth_offset(), 0.0);
    assert_eq!(rig.height_offset(), 0.0);
    assert!(!rig.is_dragging());
}

#[test]
fn approach_is_smooth_and_monotonic() {
    let mut rig = CameraRig::new();
    let hand = Vec2::new(1.0, 0.0);
    let goal = Vec3::new(1.5_f32.sin() * 20.0, 4.0, 1.5_f32.cos() * 20.0);
    let mut prev_dist = rig.advance(hand, DT).eye.distance(goal);
    for _ in 0..120 {
        let dist = rig.advance(hand, DT).eye.distance(goal);
        assert!(
            dist <= prev_dist + 1e-5,
            "camera should never retreat from its goal: {prev_dist} -> {dist}"
        );
        prev_dist = dist;
    }
}
