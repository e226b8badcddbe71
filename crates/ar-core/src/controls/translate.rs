use super::{ControlKind, GestureControl};
use crate::constants::{
    PLANE_RAISE_THRESHOLD, TRANSLATE_BOUNCE_MS, TRANSLATE_DURATION_MS, TRANSLATE_HOVER_LIFT,
    TRANSLATE_LIFT_MS,
};
use crate::easing::Easing;
use crate::geometry::{Anchor, Plane};
use crate::gesture::{Gesture, GestureSet};
use crate::input::{InputFrame, TouchSample};
use crate::motion::{Motion, Motion3};
use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranslateState {
    #[default]
    Waiting,
    Translating,
    Bouncing,
}

/// One-finger drag of the model across its floor or wall.
///
/// The finger ray is projected onto a drag plane. Confident hit-test
/// samples can lift that plane (onto a table, say) but only when they land
/// at least `PLANE_RAISE_THRESHOLD` above it; lower or unconfident samples
/// never move it. Frames without a usable hit fall back to intersecting the
/// finger ray with the current plane.
#[derive(Debug, Clone)]
pub struct TranslateControl {
    enabled: bool,
    active: bool,
    state: TranslateState,
    vertical: bool,
    plane: Plane,
    grab_offset: Vec3,
    position: Motion3,
    hover: Motion,
}

impl Default for TranslateControl {
    fn default() -> Self {
        Self::new(&Anchor::floor(Vec3::ZERO))
    }
}

impl TranslateControl {
    pub fn new(anchor: &Anchor) -> Self {
        Self {
            enabled: true,
            active: false,
            state: TranslateState::Waiting,
            vertical: anchor.vertical,
            plane: anchor.plane(),
            grab_offset: Vec3::ZERO,
            position: Motion3::new(anchor.position, TRANSLATE_DURATION_MS, Easing::EaseOutQuad),
            hover: Motion::new(0.0, TRANSLATE_LIFT_MS, Easing::EaseOutCubic),
        }
    }

    /// Re-root on a new anchor, dropping any drag in progress.
    pub fn reset(&mut self, anchor: &Anchor) {
        self.active = false;
        self.state = TranslateState::Waiting;
        self.vertical = anchor.vertical;
        self.plane = anchor.plane();
        self.grab_offset = Vec3::ZERO;
        self.position.reset(anchor.position);
        self.hover.reset(0.0);
    }

    pub fn state(&self) -> TranslateState {
        self.state
    }

    pub fn is_vertical(&self) -> bool {
        self.vertical
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }

    /// Model base on the drag plane.
    pub fn position(&self) -> Vec3 {
        self.position.value()
    }

    /// Lift above the surface while dragging.
    pub fn hover_height(&self) -> f32 {
        self.hover.value()
    }

    /// Position including the lift along the surface normal.
    pub fn world_position(&self) -> Vec3 {
        self.position.value() + self.plane.normal * self.hover.value()
    }

    /// Where the model base should go for this touch, updating the drag plane
    /// from a confident hit when it rises far enough.
    fn drag_target(&mut self, touch: &TouchSample) -> Option<Vec3> {
        if let Some(hit) = touch.hit.filter(|h| h.is_confident(self.vertical)) {
            let p = hit.position();
            let rise = self.plane.signed_distance(p);
            if rise >= PLANE_RAISE_THRESHOLD {
                log::trace!("[translate] drag plane raised by {:.3}", rise);
                self.plane = Plane::new(self.plane.normal, p);
            }
            if rise > -PLANE_RAISE_THRESHOLD {
                return Some(self.plane.project(p));
            }
        }
        self.plane.intersect(&touch.ray)
    }

    fn in_plane(&self, v: Vec3) -> Vec3 {
        v - self.plane.normal * self.plane.normal.dot(v)
    }
}

impl GestureControl for TranslateControl {
    fn kind(&self) -> ControlKind {
        ControlKind::Translate
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
        if !self.enabled {
            return;
        }
        self.active = true;
        self.state = TranslateState::Translating;
        if !self.vertical {
            self.hover.set_easing(Easing::EaseOutCubic);
            self.hover.set_duration(TRANSLATE_LIFT_MS);
            self.hover.set_end(TRANSLATE_HOVER_LIFT);
        }
    }

    fn set_initial_pos(&mut self, input: &InputFrame) {
        let base = self.position.end();
        self.plane = Plane::new(self.plane.normal, base);
        self.grab_offset = input
            .touches
            .first()
            .and_then(|t| self.plane.intersect(&t.ray))
            .map(|p| self.in_plane(base - p))
            .unwrap_or(Vec3::ZERO);
    }

    fn process(&mut self, input: &InputFrame) {
        if !self.active {
            return;
        }
        let Some(touch) = input.touches.first() else {
            return;
        };
        if let Some(target) = self.drag_target(touch) {
            self.position.set_end(target + self.grab_offset);
        }
    }

    fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if self.vertical {
            self.state = TranslateState::Waiting;
        } else {
            self.state = TranslateState::Bouncing;
            self.hover.set_easing(Easing::EaseOutBounce);
            self.hover.set_duration(TRANSLATE_BOUNCE_MS);
            self.hover.set_end(0.0);
        }
    }

    fn update(&mut self, dt_ms: f32) {
        self.position.update(dt_ms);
        self.hover.update(dt_ms);
        if self.state == TranslateState::Bouncing && !self.hover.is_active() {
            self.state = TranslateState::Waiting;
        }
    }
}
