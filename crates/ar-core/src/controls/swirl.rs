use super::{ControlKind, GestureControl};
use crate::constants::{SWIRL_DEFAULT_SCALE, SWIRL_DURATION_MS};
use crate::easing::Easing;
use crate::geometry::signed_angle;
use crate::gesture::{Gesture, GestureSet};
use crate::input::InputFrame;
use crate::motion::Motion;
use glam::{Quat, Vec2, Vec3};

// Finger positions closer than this to the projected model centre give an
// unstable angle and are skipped.
const MIN_RADIUS: f32 = 1e-3;

/// One-finger rotation about a fixed axis.
///
/// The rotation follows the angle the finger sweeps around the model's
/// projected centre rather than the raw finger delta, so the model turns
/// under the finger like a dial.
#[derive(Debug, Clone)]
pub struct SwirlControl {
    enabled: bool,
    active: bool,
    axis: Vec3,
    /// Orientation the axis is expressed in; identity for world axes.
    frame: Quat,
    scale: f32,
    angle: Motion,
    prev: Option<Vec2>,
}

impl SwirlControl {
    pub fn new(axis: Vec3) -> Self {
        Self {
            enabled: true,
            active: false,
            axis: axis.normalize_or_zero(),
            frame: Quat::IDENTITY,
            scale: SWIRL_DEFAULT_SCALE,
            angle: Motion::new(0.0, SWIRL_DURATION_MS, Easing::EaseOutQuad),
            prev: None,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn axis(&self) -> Vec3 {
        self.axis
    }

    pub fn set_axis(&mut self, axis: Vec3) {
        self.axis = axis.normalize_or_zero();
    }

    /// Set the parent orientation the local axis turns with, such as a wall.
    pub fn set_frame(&mut self, frame: Quat) {
        self.frame = frame;
    }

    pub fn world_axis(&self) -> Vec3 {
        self.frame * self.axis
    }

    /// Accumulated angle in radians.
    pub fn angle(&self) -> f32 {
        self.angle.value()
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_axis_angle(self.axis, self.angle.value())
    }

    pub fn reset(&mut self) {
        self.set_angle(0.0);
    }

    /// Jump to `angle` radians without easing.
    pub fn set_angle(&mut self, angle: f32) {
        self.angle.reset(angle);
        self.prev = None;
    }

    fn finger_vector(input: &InputFrame) -> Option<Vec2> {
        let v = input.corrected(0)? - input.model_center_on_screen();
        (v.length() > MIN_RADIUS).then_some(v)
    }
}

impl GestureControl for SwirlControl {
    fn kind(&self) -> ControlKind {
        ControlKind::Swirl
    }

    fn gestures(&self) -> GestureSet {
        GestureSet::ONE_FINGER
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.deactivate();
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn activate(&mut self, _gesture: Gesture) {
        if self.enabled {
            self.active = true;
        }
    }

    fn set_initial_pos(&mut self, input: &InputFrame) {
        self.prev = Self::finger_vector(input);
    }

    fn process(&mut self, input: &InputFrame) {
        if !self.active {
            return;
        }
        let Some(cur) = Self::finger_vector(input) else {
            return;
        };
        if let Some(prev) = self.prev {
            // Seen from the far side of the axis a clockwise sweep is positive.
            let facing = if input.camera.forward().dot(self.world_axis()) > 0.0 {
                -1.0
            } else {
                1.0
            };
            let delta = signed_angle(prev, cur) * self.scale * facing;
            self.angle.set_end_delta(delta);
        }
        self.prev = Some(cur);
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.prev = None;
    }

    fn update(&mut self, dt_ms: f32) {
        self.angle.update(dt_ms);
    }
}
