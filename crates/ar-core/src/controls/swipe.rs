use super::{ControlKind, GestureControl};
use crate::constants::{SWIPE_DURATION_MS, SWIPE_RADIANS_PER_UNIT};
use crate::easing::Easing;
use crate::gesture::{Gesture, GestureSet};
use crate::input::InputFrame;
use crate::motion::Motion;
use glam::{Quat, Vec2, Vec3};

/// Two-finger tumble about a vertical and a horizontal local axis.
///
/// A horizontal swipe turns the model about `vertical_axis`, a vertical
/// swipe about `horizontal_axis`. The committed gesture picks which of the
/// two a session drives; both accumulate across sessions.
#[derive(Debug, Clone)]
pub struct SwipeControl {
    enabled: bool,
    active: bool,
    committed: Gesture,
    vertical_axis: Vec3,
    horizontal_axis: Vec3,
    radians_per_unit: f32,
    yaw: Motion,
    pitch: Motion,
    prev: Option<Vec2>,
}

impl Default for SwipeControl {
    fn default() -> Self {
        Self::new(Vec3::Y, Vec3::X)
    }
}

impl SwipeControl {
    pub fn new(vertical_axis: Vec3, horizontal_axis: Vec3) -> Self {
        Self {
            enabled: true,
            active: false,
            committed: Gesture::None,
            vertical_axis: vertical_axis.normalize_or_zero(),
            horizontal_axis: horizontal_axis.normalize_or_zero(),
            radians_per_unit: SWIPE_RADIANS_PER_UNIT,
            yaw: Motion::new(0.0, SWIPE_DURATION_MS, Easing::EaseOutQuad),
            pitch: Motion::new(0.0, SWIPE_DURATION_MS, Easing::EaseOutQuad),
            prev: None,
        }
    }

    pub fn set_radians_per_unit(&mut self, radians: f32) {
        self.radians_per_unit = radians;
    }

    pub fn yaw(&self) -> f32 {
        self.yaw.value()
    }

    pub fn pitch(&self) -> f32 {
        self.pitch.value()
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_axis_angle(self.vertical_axis, self.yaw.value())
            * Quat::from_axis_angle(self.horizontal_axis, self.pitch.value())
    }

    pub fn reset(&mut self) {
        self.yaw.reset(0.0);
        self.pitch.reset(0.0);
        self.prev = None;
    }

    fn midpoint(input: &InputFrame) -> Option<Vec2> {
        let a = input.corrected(0)?;
        let b = input.corrected(1)?;
        Some((a + b) * 0.5 - input.model_center_on_screen())
    }
}

impl GestureControl for SwipeControl {
    fn kind(&self) -> ControlKind {
        ControlKind::Swipe
    }

    fn gestures(&self) -> GestureSet {
        GestureSet::TWO_FINGER_SWIPE
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

    fn activate(&mut self, gesture: Gesture) {
        if self.enabled && self.accepts(gesture) {
            self.active = true;
            self.committed = gesture;
        }
    }

    fn set_initial_pos(&mut self, input: &InputFrame) {
        self.prev = Self::midpoint(input);
    }

    fn process(&mut self, input: &InputFrame) {
        if !self.active {
            return;
        }
        let Some(cur) = Self::midpoint(input) else {
            return;
        };
        if let Some(prev) = self.prev {
            let d = cur - prev;
            match self.committed {
                Gesture::TwoFingerHorizontal => {
                    self.yaw.set_end_delta(d.x * self.radians_per_unit);
                }
                Gesture::TwoFingerVertical => {
                    self.pitch.set_end_delta(-d.y * self.radians_per_unit);
                }
                _ => {}
            }
        }
        self.prev = Some(cur);
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.committed = Gesture::None;
        self.prev = None;
    }

    fn update(&mut self, dt_ms: f32) {
        self.yaw.update(dt_ms);
        self.pitch.update(dt_ms);
    }
}
