use glam::Vec2;
use rand::prelude::*;
use scene_core::expression::{
    Blink, Emotion, ExpressionState, FaceInput, Palette,
};

fn idle_input() -> FaceInput {
    FaceInput {
        mouse: Vec2::ZERO,
        pressed: false,
    }
}

fn pressed_input() -> FaceInput {
    FaceInput {
        mouse: Vec2::ZERO,
        pressed: true,
    }
}

#[test]
fn unknown_emotion_falls_back_to_neutral() {
    assert_eq!(Emotion::from_id("happy"), Emotion::Happy);
    assert_eq!(Emotion::from_id("cry"), Emotion::Cry);
    assert_eq!(Emotion::from_id("nonsense"), Emotion::Neutral);
    assert_eq!(Emotion::from_id(""), Emotion::Neutral);
}

#[test]
fn emotion_table_matches_the_design() {
    let happy = Emotion::Happy.targets();
    assert_eq!(happy.smile, 1.0);
    assert_eq!(happy.lift, 0.2);

    let cry = Emotion::Cry.targets();
    assert_eq!(cry.smile, -1.5);
    assert_eq!(cry.open, 0.2);
    assert_eq!(cry.tilt, -0.8);
    assert_eq!(cry.squint, 0.7);

    let surprised = Emotion::Surprised.targets();
    assert_eq!(surprised.open, 0.8);
    assert_eq!(surprised.lift, 1.0);
}

#[test]
fn unknown_palette_leaves_colors_unchanged() {
    assert_eq!(Palette::from_id("fire"), Some(Palette::Fire));
    assert_eq!(Palette::from_id("vaporwave"), None);
}

#[test]
fn fire_palette_leads_with_deep_red() {
    let [c1, _, _] = Palette::Fire.colors();
    assert!((c1.x - 0.8).abs() < 1e-6);
    assert!((c1.y - 0.1).abs() < 1e-6);
    assert!((c1.z - 0.1).abs() < 1e-6);
}

#[test]
fn every_palette_has_three_distinct_colors() {
    for palette in [
        Palette::Aurora,
        Palette::Fire,
        Palette::Ocean,
        Palette::Nature,
        Palette::Mystic,
    ] {
        let [a, b, c] = palette.colors();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }
}

#[test]
fn happy_press_converges_to_the_big_grin() {
    let mut state = ExpressionState::new();
    let mut rng = StdRng::seed_from_u64(1);
    let mut frame = None;
    for i in 0..60 {
        frame = Some(state.advance(
            Emotion::Happy,
            pressed_input(),
            1.0,
            i as f32 / 60.0,
            &mut rng,
        ));
    }
    let frame = frame.unwrap();
    assert!(
        (frame.smile - 1.8).abs() < 0.05,
        "smile should settle near 1.8, got {}",
        frame.smile
    );
    assert!(
        frame.openness.abs() < 0.05,
        "mouth stays closed for the grin, got {}",
        frame.openness
    );
}

#[test]
fn neutral_press_pops_the_wide_o() {
    let mut state = ExpressionState::new();
    let mut rng = StdRng::seed_from_u64(1);
    let mut openness = 0.0;
    for i in 0..120 {
        let frame = state.advance(
            Emotion::Neutral,
            pressed_input(),
            1.0,
            i as f32 / 60.0,
            &mut rng,
        );
        openness = frame.openness;
    }
    assert!(
        (openness - 1.0).abs() < 0.05,
        "wide-O openness should approach 1.0, got {openness}"
    );
}

#[test]
fn surprised_press_uses_the_same_wide_o() {
    let mut rng_a = StdRng::seed_from_u64(7);
    let mut rng_b = StdRng::seed_from_u64(7);
    let mut neutral = ExpressionState::new();
    let mut surprised = ExpressionState::new();
    for i in 0..90 {
        let t = i as f32 / 60.0;
        let a = neutral.advance(Emotion::Neutral, pressed_input(), 1.0, t, &mut rng_a);
        let b = surprised.advance(Emotion::Surprised, pressed_input(), 1.0, t, &mut rng_b);
        assert!(
            (a.openness - b.openness).abs() < 1e-5,
            "pressed neutral and surprised share the wide-O mouth"
        );
        assert!((a.smile - b.smile).abs() < 1e-5);
    }
}

#[test]
fn intensity_scales_the_expression() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut soft = ExpressionState::new();
    let mut strong = ExpressionState::new();
    for i in 0..120 {
        let t = i as f32 / 60.0;
        soft.advance(Emotion::Angry, idle_input(), 0.5, t, &mut rng);
        strong.advance(Emotion::Angry, idle_input(), 2.0, t, &mut rng);
    }
    assert!(
        strong.smile() < soft.smile(),
        "a stronger angry face frowns deeper: {} vs {}",
        strong.smile(),
        soft.smile()
    );
}

#[test]
fn intensity_is_clamped_at_ingestion() {
    let mut rng_a = StdRng::seed_from_u64(3);
    let mut rng_b = StdRng::seed_from_u64(3);
    let mut clamped = ExpressionState::new();
    let mut max = ExpressionState::new();
    for i in 0..60 {
        let t = i as f32 / 60.0;
        let a = clamped.advance(Emotion::Happy, idle_input(), 99.0, t, &mut rng_a);
        let b = max.advance(Emotion::Happy, idle_input(), 2.0, t, &mut rng_b);
        assert!((a.smile - b.smile).abs() < 1e-5);
    }
}

#[test]
fn tears_cycle_and_stay_visible_while_crying() {
    let mut state = ExpressionState::new();
    let mut rng = StdRng::seed_from_u64(4);
    let mut wrapped = false;
    let mut prev_y = 0.0_f32;
    for i in 0..200 {
        let frame = state.advance(Emotion::Cry, idle_input(), 1.0, i as f32 / 60.0, &mut rng);
        let tears = frame.tears.expect("tears visible while crying");
        assert!(tears.y <= 0.0 && tears.y >= -0.4 - 1e-6);
        assert!(tears.opacity >= 0.0, "opacity must never go negative");
        if tears.y > prev_y + 0.1 {
            wrapped = true; // the drop reset to the top of its fall
        }
        prev_y = tears.y;
    }
    assert!(wrapped, "the tear should wrap at least once in 200 frames");
}

#[test]
fn tears_vanish_and_reset_for_other_emotions() {
    let mut state = ExpressionState::new();
    let mut rng = StdRng::seed_from_u64(5);
    for i in 0..60 {
        state.advance(Emotion::Cry, idle_input(), 1.0, i as f32 / 60.0, &mut rng);
    }
    assert!(state.tear_phase() < 0.0);
    let frame = state.advance(Emotion::Happy, idle_input(), 1.0, 1.0, &mut rng);
    assert!(frame.tears.is_none());
    assert_eq!(state.tear_phase(), 0.0);
}

#[test]
fn every_blink_terminates() {
    let mut state = ExpressionState::new();
    let mut rng = StdRng::seed_from_u64(6);
    let max_blink_frames = (std::f32::consts::PI / 0.25).ceil() as usize;
    let mut blinks_seen = 0;
    let mut active_frames = 0;
    for i in 0..5000 {
        state.advance(Emotion::Neutral, idle_input(), 1.0, i as f32 / 60.0, &mut rng);
        match state.blink() {
            Blink::Active { .. } => {
                active_frames += 1;
                assert!(
                    active_frames <= max_blink_frames,
                    "a blink ran longer than {max_blink_frames} frames"
                );
            }
            Blink::Idle => {
                if active_frames > 0 {
                    blinks_seen += 1;
                }
                active_frames = 0;
            }
        }
    }
    assert!(blinks_seen > 0, "5000 frames should contain at least one blink");
}

#[test]
fn eye_scale_never_collapses_below_the_floor() {
    let mut state = ExpressionState::new();
    let mut rng = StdRng::seed_from_u64(8);
    // Crying while pressed drives squint to 0.9 * 2.0 and adds jitter.
    for i in 0..600 {
        let frame = state.advance(Emotion::Cry, pressed_input(), 2.0, i as f32 / 60.0, &mut rng);
        assert!(
            frame.eye_scale_y >= 0.1,
            "eye scale fell to {} on frame {i}",
            frame.eye_scale_y
        );
    }
}

#[test]
fn side_look_narrows_the_eyes() {
    // A stepping RNG that never rolls a blink keeps the eye scale readable
    let mut rng_a = rand::rngs::mock::StepRng::new(u64::MAX, 0);
    let mut rng_b = rand::rngs::mock::StepRng::new(u64::MAX, 0);
    let mut ahead = ExpressionState::new();
    let mut aside = ExpressionState::new();
    let side_input = FaceInput {
        mouse: Vec2::new(0.9, 0.0),
        pressed: false,
    };
    let mut ahead_scale = 1.0;
    let mut aside_scale = 1.0;
    for i in 0..120 {
        let t = i as f32 / 60.0;
        ahead_scale = ahead
            .advance(Emotion::Neutral, idle_input(), 1.0, t, &mut rng_a)
            .eye_scale_y;
        aside_scale = aside
            .advance(Emotion::Neutral, side_input, 1.0, t, &mut rng_b)
            .eye_scale_y;
    }
    assert!(
        aside_scale < ahead_scale * 0.7,
        "looking far sideways should narrow the eyes: {aside_scale} vs {ahead_scale}"
    );
}

#[test]
fn head_tracks_the_pointer_inverted_in_y() {
    let mut state = ExpressionState::new();
    let mut rng = StdRng::seed_from_u64(10);
    let input = FaceInput {
        mouse: Vec2::new(0.8, 0.6),
        pressed: false,
    };
    let mut rotation = Vec2::ZERO;
    for _ in 0..120 {
        // Fixed clock: isolate pointer tracking from the idle sway
        rotation = state.advance(Emotion::Neutral, input, 1.0, 0.0, &mut rng).head_rotation;
    }
    assert!(rotation.x < 0.0, "looking up tilts the head back (negative x)");
    assert!(rotation.y > 0.0, "looking right turns the head right");
    assert!((rotation.x - -0.18).abs() < 0.05);
}

#[test]
fn body_bobs_on_the_scaled_clock() {
    let mut state = ExpressionState::new();
    let mut rng = StdRng::seed_from_u64(11);
    let at_zero = state.advance(Emotion::Neutral, idle_input(), 1.0, 0.0, &mut rng);
    assert!(at_zero.body_y.abs() < 1e-6);
    let at_peak = state.advance(
        Emotion::Neutral,
        idle_input(),
        1.0,
        std::f32::consts::FRAC_PI_2,
        &mut rng,
    );
    assert!((at_peak.body_y - 0.15).abs() < 1e-4);
}
