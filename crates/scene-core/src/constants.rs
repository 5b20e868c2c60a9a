// Shared tuning constants for both scenes.

// Tree cone dimensions (world units)
pub const TREE_HEIGHT: f32 = 12.0;
pub const TREE_BASE_RADIUS: f32 = 5.0;
pub const TREE_Y_OFFSET: f32 = -4.0;

// Foliage point field
pub const FOLIAGE_COUNT: usize = 15_000;
pub const FOLIAGE_CHAOS_RADIUS: f32 = 20.0;
pub const FOLIAGE_WEIGHT: f32 = 2.0;

// Eased progress above which instances stop tumbling and settle
pub const STABILIZE_THRESHOLD: f32 = 0.9;

// Hand spread normalisation window (pixels in the video frame).
// Spread below the floor reads as a closed fist, above floor+range as open.
pub const SPREAD_FLOOR_PX: f32 = 50.0;
pub const SPREAD_RANGE_PX: f32 = 100.0;

// Per-frame smoothing factors (intentionally framerate-coupled; the soft
// feel depends on it)
pub const EXPRESSION_ALPHA: f32 = 0.1;
pub const EYE_SCALE_ALPHA: f32 = 0.2;
pub const HEAD_ROTATION_ALPHA: f32 = 0.1;

// Eye behaviour
pub const EYE_MIN_SCALE_Y: f32 = 0.1;
pub const EYE_SIDE_LOOK_LIMIT: f32 = 0.7;
pub const EYE_JITTER_AMPLITUDE: f32 = 0.05;
pub const BLINK_START_PROBABILITY: f64 = 0.005;
pub const BLINK_PHASE_STEP: f32 = 0.25;

// Tear cycle (world units per frame / y extents)
pub const TEAR_FALL_PER_FRAME: f32 = 0.008;
pub const TEAR_RESET_Y: f32 = -0.4;
pub const TEAR_START_Y: f32 = -0.02;

// Tree camera rig
pub const CAMERA_BASE_HEIGHT: f32 = 4.0;
pub const CAMERA_HAND_AZIMUTH_GAIN: f32 = 1.5;
pub const CAMERA_HAND_HEIGHT_GAIN: f32 = 5.0;
pub const CAMERA_HEIGHT_OFFSET_LIMIT: f32 = 6.0;
pub const CAMERA_RADIUS_MIN: f32 = 8.0;
pub const CAMERA_RADIUS_MAX: f32 = 40.0;
pub const CAMERA_RADIUS_DEFAULT: f32 = 20.0;
pub const CAMERA_WHEEL_RATE: f32 = 0.02;
pub const CAMERA_SMOOTH_RATE: f32 = 2.0;
pub const CAMERA_DRAG_HEIGHT_GAIN: f32 = 8.0;

// Webcam request size
pub const VIDEO_WIDTH: u32 = 640;
pub const VIDEO_HEIGHT: u32 = 480;

// Face scene ambient dust
pub const DUST_COUNT: usize = 200;
pub const DUST_EXTENT: f32 = 10.0;
