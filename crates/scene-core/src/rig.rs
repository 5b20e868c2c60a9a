//! Tree-scene camera: hand-driven orbit with user drag/zoom offsets on top.

use glam::{Vec2, Vec3};

use crate::constants::{
    CAMERA_BASE_HEIGHT, CAMERA_DRAG_HEIGHT_GAIN, CAMERA_HAND_AZIMUTH_GAIN,
    CAMERA_HAND_HEIGHT_GAIN, CAMERA_HEIGHT_OFFSET_LIMIT, CAMERA_RADIUS_DEFAULT,
    CAMERA_RADIUS_MAX, CAMERA_RADIUS_MIN, CAMERA_SMOOTH_RATE, CAMERA_WHEEL_RATE,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
}

#[derive(Clone, Copy, Debug)]
struct DragStart {
    azimuth: f32,
    height: f32,
}

pub struct CameraRig {
    azimuth_offset: f32,
    height_offset: f32,
    radius: f32,
    smoothed_eye: Vec3,
    drag: Option<DragStart>,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraRig {
    pub fn new() -> Self {
        Self {
            azimuth_offset: 0.0,
            height_offset: 0.0,
            radius: CAMERA_RADIUS_DEFAULT,
            smoothed_eye: Vec3::new(0.0, CAMERA_BASE_HEIGHT, CAMERA_RADIUS_DEFAULT),
            drag: None,
        }
    }

    pub fn begin_drag(&mut self) {
        self.drag = Some(DragStart {
            azimuth: self.azimuth_offset,
            height: self.height_offset,
        });
    }

    /// Apply a drag delta normalised by the window size. A full-width drag
    /// orbits a whole turn; the height offset saturates.
    pub fn drag_to(&mut self, dx: f32, dy: f32) {
        let Some(start) = self.drag else { return };
        self.azimuth_offset = start.azimuth + dx * std::f32::consts::TAU;
        self.height_offset = (start.height + dy * CAMERA_DRAG_HEIGHT_GAIN)
            .clamp(-CAMERA_HEIGHT_OFFSET_LIMIT, CAMERA_HEIGHT_OFFSET_LIMIT);
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn zoom(&mut self, wheel_delta_y: f32) {
        self.radius = (self.radius + wheel_delta_y * CAMERA_WHEEL_RATE)
            .clamp(CAMERA_RADIUS_MIN, CAMERA_RADIUS_MAX);
    }

    pub fn azimuth_offset(&self) -> f32 {
        self.azimuth_offset
    }

    pub fn height_offset(&self) -> f32 {
        self.height_offset
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Advance the smoothed eye toward the pose implied by the hand hint and
    /// the user offsets; the look-at point never moves.
    pub fn advance(&mut self, hand: Vec2, dt: f32) -> CameraPose {
        let azimuth = hand.x * CAMERA_HAND_AZIMUTH_GAIN + self.azimuth_offset;
        let height = CAMERA_BASE_HEIGHT + hand.y * CAMERA_HAND_HEIGHT_GAIN + self.height_offset;
        let desired = Vec3::new(
            azimuth.sin() * self.radius,
            height,
            azimuth.cos() * self.radius,
        );
        let alpha = (CAMERA_SMOOTH_RATE * dt).clamp(0.0, 1.0);
        self.smoothed_eye += (desired - self.smoothed_eye) * alpha;
        CameraPose {
            eye: self.smoothed_eye,
            target: Vec3::new(0.0, CAMERA_BASE_HEIGHT, 0.0),
        }
    }
}
