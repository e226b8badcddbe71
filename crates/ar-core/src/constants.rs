// Shared tuning constants for gesture classification and AR placement.
// Screen-space values are in normalized device units ([-1, 1] across the
// width, aspect-corrected vertically); world-space values are in meters.

// Gesture classification
pub const DEADZONE_SIZE: f32 = 0.05; // displacement needed before a gesture commits

// Swirl (one-finger rotate)
pub const SWIRL_DURATION_MS: f32 = 100.0;
pub const SWIRL_DEFAULT_SCALE: f32 = 1.0; // radians of model rotation per radian of finger sweep

// Swipe (two-finger tumble)
pub const SWIPE_DURATION_MS: f32 = 100.0;
pub const SWIPE_RADIANS_PER_UNIT: f32 = std::f32::consts::PI; // full screen width = one turn

// Pinch scale
pub const SCALE_DURATION_MS: f32 = 100.0;
pub const SCALE_SENSITIVITY: f32 = 1.5;
pub const MIN_SCALE: f32 = 0.2;
pub const MAX_SCALE: f32 = 5.0;
pub const SCALE_LABEL_FADE_MS: f32 = 300.0;
pub const SCALE_LABEL_OFFSET: f32 = 0.1; // label height above the model top

// Floor/wall drag
pub const TRANSLATE_DURATION_MS: f32 = 80.0;
pub const TRANSLATE_HOVER_LIFT: f32 = 0.05; // model lift while dragging on the floor
pub const TRANSLATE_LIFT_MS: f32 = 150.0;
pub const TRANSLATE_BOUNCE_MS: f32 = 600.0;
pub const FLOOR_HIT_MIN_UP: f32 = 0.75; // pose Y-axis alignment with world up for floors
pub const WALL_HIT_MAX_UP: f32 = 0.25; // ... and the upper bound for walls
pub const PLANE_RAISE_THRESHOLD: f32 = 0.10; // drag plane only moves for hits this far above it

// Hover placement
pub const HOVER_DEFAULT_DISTANCE: f32 = 1.5;
pub const HOVER_MIN_DISTANCE: f32 = 0.5;
pub const HOVER_MAX_DISTANCE: f32 = 5.0;
pub const HOVER_FOLLOW_MS: f32 = 200.0;

// Placement entrance and indicators
pub const SCALE_IN_START: f32 = 0.01;
pub const SCALE_IN_DURATION_MS: f32 = 500.0;
pub const RETICLE_SPIN_MS: f32 = 2000.0;
pub const SHADOW_OPACITY: f32 = 0.5;

// WebXR session setup
pub const HIT_TEST_SOURCE_TIMEOUT_MS: u32 = 5000;
pub const XR_PIXEL_RATIO: f32 = 1.0;

// Orbit camera
pub const ORBIT_DURATION_MS: f32 = 150.0;
pub const ORBIT_DEGREES_PER_UNIT: f32 = 180.0; // full canvas width drag = half turn
pub const ORBIT_MIN_PITCH_DEG: f32 = -85.0;
pub const ORBIT_MAX_PITCH_DEG: f32 = 85.0;
pub const ORBIT_MIN_DISTANCE: f32 = 0.5;
pub const ORBIT_MAX_DISTANCE: f32 = 50.0;
pub const ORBIT_ZOOM_STEP: f32 = 0.1; // relative distance change per wheel notch
pub const CAMERA_FOVY_DEG: f32 = 45.0;
pub const CAMERA_ZNEAR: f32 = 0.01;
pub const CAMERA_ZFAR: f32 = 100.0;
