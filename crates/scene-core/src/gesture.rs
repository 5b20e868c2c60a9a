//! Hand-observation pipeline: landmark keypoints in, store writes out.
//!
//! The detector itself is an external collaborator; this module only sees
//! its output, a list of hands each carrying 21 keypoints in video-pixel
//! space. The spread between the wrist and the five fingertips becomes the
//! formation progress (closed fist = formed tree), and the wrist position
//! becomes the camera orbit hint in NDC.

use glam::Vec2;
use smallvec::SmallVec;

use crate::constants::{SPREAD_FLOOR_PX, SPREAD_RANGE_PX};
use crate::store::Store;

/// Landmark indices used by the mapper: wrist plus the five fingertips.
pub const WRIST: usize = 0;
pub const FINGERTIPS: [usize; 5] = [4, 8, 12, 16, 20];

/// Keypoints expected per hand from the landmark model.
pub const KEYPOINTS_PER_HAND: usize = 21;

/// One detected hand, keypoints in video-pixel coordinates (y down).
#[derive(Clone, Debug, Default)]
pub struct HandObservation {
    pub keypoints: Vec<Vec2>,
}

/// Mean wrist-to-fingertip distance in pixels, or `None` when the
/// observation is malformed (fewer keypoints than the model promises).
pub fn hand_spread(obs: &HandObservation) -> Option<f32> {
    if obs.keypoints.len() < KEYPOINTS_PER_HAND {
        return None;
    }
    let wrist = obs.keypoints[WRIST];
    let tips: SmallVec<[Vec2; 5]> = FINGERTIPS.iter().map(|&i| obs.keypoints[i]).collect();
    let total: f32 = tips.iter().map(|tip| tip.distance(wrist)).sum();
    Some(total / tips.len() as f32)
}

/// Normalise a spread to formation progress. The mapping is inverted on
/// purpose: a closed hand (small spread) forms the tree, an open hand
/// releases it into chaos.
#[inline]
pub fn spread_to_progress(spread_px: f32) -> f32 {
    let open = ((spread_px - SPREAD_FLOOR_PX) / SPREAD_RANGE_PX).clamp(0.0, 1.0);
    1.0 - open
}

/// Map the wrist from video pixels to NDC: x right-positive, y up-positive.
/// The video y axis points down, hence the inversion.
#[inline]
pub fn wrist_to_ndc(wrist: Vec2, video_width: f32, video_height: f32) -> Vec2 {
    Vec2::new(
        (wrist.x / video_width) * 2.0 - 1.0,
        -(wrist.y / video_height) * 2.0 + 1.0,
    )
}

/// Folds detector output into the store, one call per detection tick.
#[derive(Default)]
pub struct GestureMapper;

impl GestureMapper {
    /// Process one detector result. An empty list (or a malformed first
    /// hand) releases control: detected goes false and the tree auto-reforms.
    pub fn process(
        &mut self,
        store: &mut Store,
        hands: &[HandObservation],
        video_width: f32,
        video_height: f32,
    ) {
        let spread = hands.first().and_then(hand_spread);
        let Some(spread) = spread else {
            store.set_hand_detected(false);
            store.set_formation_progress(1.0);
            return;
        };

        let hand = &hands[0];
        store.set_formation_progress(spread_to_progress(spread));
        store.set_hand_detected(true);

        let ndc = wrist_to_ndc(hand.keypoints[WRIST], video_width, video_height);
        store.set_hand_position(ndc.x, ndc.y);
    }
}
