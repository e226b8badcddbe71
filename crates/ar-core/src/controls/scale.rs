use super::{ControlKind, GestureControl};
use crate::constants::{
    MAX_SCALE, MIN_SCALE, SCALE_DURATION_MS, SCALE_LABEL_FADE_MS, SCALE_LABEL_OFFSET,
    SCALE_SENSITIVITY,
};
use crate::easing::Easing;
use crate::geometry::billboard_rotation;
use crate::gesture::{Gesture, GestureSet};
use crate::input::InputFrame;
use crate::motion::{Motion, Range};
use glam::{Quat, Vec3};

/// Floating percentage label shown while pinching.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleLabel {
    pub text: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub opacity: f32,
}

impl Default for ScaleLabel {
    fn default() -> Self {
        Self {
            text: "100%".to_string(),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            opacity: 0.0,
        }
    }
}

/// Pinch scaling. Successive finger-distance changes, not the absolute
/// distance, feed the scale motion so re-gripping never jumps.
#[derive(Debug, Clone)]
pub struct ScaleControl {
    enabled: bool,
    active: bool,
    sensitivity: f32,
    scale: Motion,
    opacity: Motion,
    prev_distance: Option<f32>,
    label: ScaleLabel,
}

impl Default for ScaleControl {
    fn default() -> Self {
        Self::new(MIN_SCALE, MAX_SCALE)
    }
}

impl ScaleControl {
    pub fn new(min: f32, max: f32) -> Self {
        Self {
            enabled: true,
            active: false,
            sensitivity: SCALE_SENSITIVITY,
            scale: Motion::new(1.0, SCALE_DURATION_MS, Easing::EaseOutQuad)
                .with_range(Range::new(min, max)),
            opacity: Motion::new(0.0, SCALE_LABEL_FADE_MS, Easing::Linear)
                .with_range(Range::new(0.0, 1.0)),
            prev_distance: None,
            label: ScaleLabel::default(),
        }
    }

    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.sensitivity = sensitivity;
    }

    pub fn set_range(&mut self, min: f32, max: f32) {
        self.scale.set_range(Range::new(min, max));
    }

    pub fn range(&self) -> Range {
        self.scale.range()
    }

    pub fn value(&self) -> f32 {
        self.scale.value()
    }

    pub fn reset(&mut self, value: f32) {
        self.scale.reset(value);
        self.opacity.reset(0.0);
        self.prev_distance = None;
        self.label = ScaleLabel::default();
    }

    pub fn label(&self) -> &ScaleLabel {
        &self.label
    }

    /// Place the label above `model_top` and turn it towards `camera`.
    pub fn update_label(&mut self, model_top: Vec3, camera: Vec3) {
        let position = model_top + Vec3::Y * SCALE_LABEL_OFFSET;
        self.label.position = position;
        self.label.rotation = billboard_rotation(position, camera);
        self.label.text = format!("{:.0}%", self.scale.value() * 100.0);
        self.label.opacity = self.opacity.value();
    }

    fn finger_distance(input: &InputFrame) -> Option<f32> {
        Some(input.corrected(0)?.distance(input.corrected(1)?))
    }
}

impl GestureControl for ScaleControl {
    fn kind(&self) -> ControlKind {
        ControlKind::Scale
    }

    fn gestures(&self) -> GestureSet {
        GestureSet::PINCH
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
            self.opacity.set_end(1.0);
        }
    }

    fn set_initial_pos(&mut self, input: &InputFrame) {
        self.prev_distance = Self::finger_distance(input);
    }

    fn process(&mut self, input: &InputFrame) {
        if !self.active {
            return;
        }
        let Some(distance) = Self::finger_distance(input) else {
            return;
        };
        if let Some(prev) = self.prev_distance {
            self.scale.set_end_delta((distance - prev) * self.sensitivity);
        }
        self.prev_distance = Some(distance);
    }

    fn deactivate(&mut self) {
        if self.active {
            self.opacity.set_end(0.0);
        }
        self.active = false;
        self.prev_distance = None;
    }

    fn update(&mut self, dt_ms: f32) {
        self.scale.update(dt_ms);
        self.opacity.update(dt_ms);
        self.label.opacity = self.opacity.value();
    }
}
