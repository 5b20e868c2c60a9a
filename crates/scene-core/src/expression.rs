//! The expression driver for the face scene.
//!
//! A discrete emotion plus pointer state produce target facial parameters;
//! every parameter then eases toward its target with a fixed per-frame
//! alpha. The smoothing is deliberately framerate-coupled (no dt term) —
//! the soft, slightly laggy feel of the face depends on it.

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::constants::{
    BLINK_PHASE_STEP, BLINK_START_PROBABILITY, EXPRESSION_ALPHA, EYE_JITTER_AMPLITUDE,
    EYE_MIN_SCALE_Y, EYE_SCALE_ALPHA, EYE_SIDE_LOOK_LIMIT, HEAD_ROTATION_ALPHA,
    TEAR_FALL_PER_FRAME, TEAR_RESET_Y, TEAR_START_Y,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emotion {
    Neutral,
    Happy,
    Surprised,
    Angry,
    Suspicious,
    Sad,
    Cry,
}

/// Resting targets for one emotion, before intensity and pointer modulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmotionTargets {
    pub smile: f32,
    pub open: f32,
    pub tilt: f32,
    pub lift: f32,
    pub squint: f32,
}

impl Emotion {
    /// Unknown ids fall back to neutral rather than failing.
    pub fn from_id(id: &str) -> Self {
        match id {
            "happy" => Self::Happy,
            "surprised" => Self::Surprised,
            "angry" => Self::Angry,
            "suspicious" => Self::Suspicious,
            "sad" => Self::Sad,
            "cry" => Self::Cry,
            _ => Self::Neutral,
        }
    }

    pub fn targets(self) -> EmotionTargets {
        match self {
            Self::Neutral => EmotionTargets { smile: 0.0, open: 0.0, tilt: 0.0, lift: 0.0, squint: 0.0 },
            Self::Happy => EmotionTargets { smile: 1.0, open: 0.0, tilt: 0.0, lift: 0.2, squint: 0.0 },
            Self::Surprised => EmotionTargets { smile: 0.0, open: 0.8, tilt: 0.0, lift: 1.0, squint: 0.0 },
            Self::Angry => EmotionTargets { smile: -0.8, open: 0.0, tilt: 0.5, lift: -0.1, squint: 0.5 },
            Self::Suspicious => EmotionTargets { smile: -0.2, open: 0.0, tilt: 0.5, lift: 0.0, squint: 0.8 },
            Self::Sad => EmotionTargets { smile: -1.0, open: 0.0, tilt: -0.5, lift: 0.2, squint: 0.2 },
            Self::Cry => EmotionTargets { smile: -1.5, open: 0.2, tilt: -0.8, lift: 0.3, squint: 0.7 },
        }
    }

    fn jitters(self) -> bool {
        matches!(self, Self::Angry | Self::Cry)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Palette {
    Aurora,
    Fire,
    Ocean,
    Nature,
    Mystic,
}

impl Palette {
    /// Unknown ids yield `None`; the current colours stay untouched.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "aurora" => Some(Self::Aurora),
            "fire" => Some(Self::Fire),
            "ocean" => Some(Self::Ocean),
            "nature" => Some(Self::Nature),
            "mystic" => Some(Self::Mystic),
            _ => None,
        }
    }

    pub fn colors(self) -> [Vec3; 3] {
        match self {
            Self::Aurora => [
                Vec3::new(0.1, 0.2, 0.6),
                Vec3::new(0.4, 0.1, 0.7),
                Vec3::new(0.0, 0.6, 0.8),
            ],
            Self::Fire => [
                Vec3::new(0.8, 0.1, 0.1),
                Vec3::new(0.9, 0.4, 0.0),
                Vec3::new(1.0, 0.8, 0.2),
            ],
            Self::Ocean => [
                Vec3::new(0.0, 0.1, 0.3),
                Vec3::new(0.0, 0.4, 0.6),
                Vec3::new(0.0, 0.9, 0.7),
            ],
            Self::Nature => [
                Vec3::new(0.1, 0.3, 0.1),
                Vec3::new(0.3, 0.6, 0.2),
                Vec3::new(0.8, 0.9, 0.3),
            ],
            Self::Mystic => [
                Vec3::new(0.2, 0.0, 0.3),
                Vec3::new(0.8, 0.0, 0.6),
                Vec3::new(1.0, 0.6, 0.9),
            ],
        }
    }
}

/// Continuous pointer signals feeding the driver.
#[derive(Clone, Copy, Debug, Default)]
pub struct FaceInput {
    /// NDC pointer position, y up-positive.
    pub mouse: Vec2,
    pub pressed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Blink {
    Idle,
    Active { phase: f32 },
}

/// Tear position/opacity for one frame; both tears share it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TearFrame {
    /// Offset below the eye line; [`TEAR_RESET_Y`], 0].
    pub y: f32,
    pub opacity: f32,
}

/// Snapshot handed to the renderer each frame.
#[derive(Clone, Copy, Debug)]
pub struct FaceFrame {
    pub openness: f32,
    pub smile: f32,
    pub brow_tilt: f32,
    pub brow_lift: f32,
    pub eye_scale_y: f32,
    pub tears: Option<TearFrame>,
    pub head_rotation: Vec2,
    pub body_y: f32,
}

pub struct ExpressionState {
    openness: f32,
    smile: f32,
    brow_tilt: f32,
    brow_lift: f32,
    squint: f32,
    tear_phase: f32,
    blink: Blink,
    eye_scale: f32,
    head_rotation: Vec2,
}

impl Default for ExpressionState {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionState {
    /// Happy resting face.
    pub fn new() -> Self {
        Self {
            openness: 0.0,
            smile: 1.0,
            brow_tilt: 0.0,
            brow_lift: 0.0,
            squint: 0.0,
            tear_phase: 0.0,
            blink: Blink::Idle,
            eye_scale: 1.0,
            head_rotation: Vec2::ZERO,
        }
    }

    pub fn blink(&self) -> Blink {
        self.blink
    }

    pub fn tear_phase(&self) -> f32 {
        self.tear_phase
    }

    pub fn smile(&self) -> f32 {
        self.smile
    }

    pub fn openness(&self) -> f32 {
        self.openness
    }

    /// One frame of the driver. `time` is the scene clock already scaled by
    /// the user speed control.
    pub fn advance(
        &mut self,
        emotion: Emotion,
        input: FaceInput,
        intensity: f32,
        time: f32,
        rng: &mut impl Rng,
    ) -> FaceFrame {
        let intensity = intensity.clamp(0.0, 2.0);
        let row = emotion.targets();

        let mut target_open = row.open;
        let mut target_smile = row.smile * intensity + input.mouse.y * 0.2;
        let target_tilt = row.tilt * intensity;
        let mut target_lift = row.lift * intensity + input.mouse.y * 0.1;
        let mut target_squint = row.squint * intensity;

        if input.pressed {
            match emotion {
                Emotion::Happy => {
                    target_smile = 1.8 * intensity;
                    target_open = 0.0;
                    target_lift += 0.2 * intensity;
                }
                Emotion::Angry => {
                    target_smile = -1.5 * intensity;
                    target_open = 0.0;
                    target_squint = 0.9 * intensity;
                }
                Emotion::Sad | Emotion::Cry => {
                    target_smile = -1.8 * intensity;
                    target_open = 0.4;
                    target_squint = 0.9 * intensity;
                }
                Emotion::Suspicious => {
                    target_smile = 0.0;
                    target_open = 0.0;
                    target_squint = 1.0 * intensity;
                }
                // Neutral and surprised pop to a wide "O".
                _ => {
                    target_open = 1.0;
                    target_smile = 0.0;
                    target_lift += 0.5;
                }
            }
        }

        self.openness += (target_open - self.openness) * EXPRESSION_ALPHA;
        self.smile += (target_smile - self.smile) * EXPRESSION_ALPHA;
        self.brow_tilt += (target_tilt - self.brow_tilt) * EXPRESSION_ALPHA;
        self.brow_lift += (target_lift - self.brow_lift) * EXPRESSION_ALPHA;
        self.squint += (target_squint - self.squint) * EXPRESSION_ALPHA;

        let tears = self.advance_tears(emotion);
        let eye_scale_y = self.advance_eyes(emotion, input, rng);

        let head_target = Vec2::new(
            -input.mouse.y * 0.3,
            input.mouse.x * 0.5 + (time * 0.5).sin() * 0.1,
        );
        self.head_rotation += (head_target - self.head_rotation) * HEAD_ROTATION_ALPHA;

        FaceFrame {
            openness: self.openness,
            smile: self.smile,
            brow_tilt: self.brow_tilt,
            brow_lift: self.brow_lift,
            eye_scale_y,
            tears,
            head_rotation: self.head_rotation,
            body_y: time.sin() * 0.15,
        }
    }

    fn advance_tears(&mut self, emotion: Emotion) -> Option<TearFrame> {
        if emotion != Emotion::Cry {
            self.tear_phase = 0.0;
            return None;
        }
        self.tear_phase -= TEAR_FALL_PER_FRAME;
        if self.tear_phase < TEAR_RESET_Y {
            self.tear_phase = TEAR_START_Y;
        }
        Some(TearFrame {
            y: self.tear_phase,
            opacity: (1.0 + 2.5 * self.tear_phase).max(0.0),
        })
    }

    fn advance_eyes(&mut self, emotion: Emotion, input: FaceInput, rng: &mut impl Rng) -> f32 {
        if matches!(self.blink, Blink::Idle) && rng.gen_bool(BLINK_START_PROBABILITY) {
            self.blink = Blink::Active { phase: 0.0 };
        }

        let mut target = 1.0 - 0.7 * self.squint;
        if input.mouse.x.abs() > EYE_SIDE_LOOK_LIMIT {
            target *= 0.5;
        }
        if let Blink::Active { phase } = &mut self.blink {
            *phase += BLINK_PHASE_STEP;
            target *= phase.cos().abs();
            if *phase >= std::f32::consts::PI {
                self.blink = Blink::Idle;
            }
        }

        self.eye_scale += (target - self.eye_scale) * EYE_SCALE_ALPHA;

        let jitter = if emotion.jitters() {
            (rng.gen::<f32>() - 0.5) * EYE_JITTER_AMPLITUDE
        } else {
            0.0
        };
        (self.eye_scale + jitter).max(EYE_MIN_SCALE_Y)
    }
}
