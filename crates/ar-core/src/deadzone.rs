//! Classifies nascent touch input into a committed gesture.
//!
//! Input stays "in the deadzone" until a tested gesture's displacement from
//! the baseline exceeds `size`. The first gesture to do so is latched and
//! returned by every later `check` until `cleanup`.

use crate::constants::DEADZONE_SIZE;
use crate::geometry::apply_screen_aspect;
use crate::gesture::{Gesture, GestureSet};
use glam::Vec2;
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeadzoneState {
    #[default]
    Waiting,
    InDeadzone,
    OutOfDeadzone,
}

#[derive(Debug, Clone)]
pub struct DeadzoneChecker {
    size: f32,
    aspect: f32,
    state: DeadzoneState,
    testing: GestureSet,
    detected: Gesture,
    last_finger_count: usize,
    prev_one_finger: Vec2,
    prev_two_finger: Vec2,
    initial_two_finger_distance: f32,
}

impl Default for DeadzoneChecker {
    fn default() -> Self {
        Self::new(DEADZONE_SIZE)
    }
}

impl DeadzoneChecker {
    pub fn new(size: f32) -> Self {
        Self {
            size: size.abs(),
            aspect: 1.0,
            state: DeadzoneState::Waiting,
            testing: GestureSet::EMPTY,
            detected: Gesture::None,
            last_finger_count: 0,
            prev_one_finger: Vec2::ZERO,
            prev_two_finger: Vec2::ZERO,
            initial_two_finger_distance: 0.0,
        }
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }
    #[inline]
    pub fn state(&self) -> DeadzoneState {
        self.state
    }
    #[inline]
    pub fn detected(&self) -> Gesture {
        self.detected
    }
    #[inline]
    pub fn testing_gestures(&self) -> GestureSet {
        self.testing
    }
    #[inline]
    pub fn last_finger_count(&self) -> usize {
        self.last_finger_count
    }

    /// `aspect` is viewport height / width.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn add_testing_gestures(&mut self, gestures: impl Into<GestureSet>) {
        self.testing |= gestures.into();
    }

    pub fn clear_testing_gestures(&mut self) {
        self.testing = GestureSet::EMPTY;
    }

    /// Record baselines for the one- and two-finger cases and enter the
    /// deadzone.
    pub fn set_first_input(&mut self, coords: &[Vec2]) {
        let corrected: SmallVec<[Vec2; 2]> = coords
            .iter()
            .take(2)
            .map(|c| apply_screen_aspect(*c, self.aspect))
            .collect();
        if let Some(first) = corrected.first() {
            self.prev_one_finger = *first;
        }
        if corrected.len() >= 2 {
            self.prev_two_finger = (corrected[0] + corrected[1]) * 0.5;
            self.initial_two_finger_distance = corrected[0].distance(corrected[1]);
        }
        self.last_finger_count = coords.len();
        self.state = DeadzoneState::InDeadzone;
    }

    /// Classify `coords` against the baseline. Returns `Gesture::None` while
    /// still inside the deadzone, or when the finger count changed (which
    /// re-baselines).
    pub fn check(&mut self, coords: &[Vec2]) -> Gesture {
        match self.state {
            DeadzoneState::OutOfDeadzone => return self.detected,
            DeadzoneState::Waiting => {
                self.set_first_input(coords);
                return Gesture::None;
            }
            DeadzoneState::InDeadzone => {}
        }

        if coords.len() != self.last_finger_count {
            self.set_first_input(coords);
            return Gesture::None;
        }

        let gesture = match coords.len() {
            1 => self.classify_one_finger(coords[0]),
            2 => self.classify_two_finger(coords[0], coords[1]),
            _ => Gesture::None,
        };

        if !gesture.is_none() {
            log::debug!("[deadzone] committed {:?}", gesture);
            self.detected = gesture;
            self.state = DeadzoneState::OutOfDeadzone;
        }
        gesture
    }

    /// Forget the current gesture session. Testing gestures and aspect are
    /// configuration and survive.
    pub fn cleanup(&mut self) {
        self.state = DeadzoneState::Waiting;
        self.detected = Gesture::None;
        self.last_finger_count = 0;
        self.prev_one_finger = Vec2::ZERO;
        self.prev_two_finger = Vec2::ZERO;
        self.initial_two_finger_distance = 0.0;
    }

    fn classify_one_finger(&self, coord: Vec2) -> Gesture {
        let d = apply_screen_aspect(coord, self.aspect) - self.prev_one_finger;
        self.classify_direction(
            d,
            Gesture::OneFingerHorizontal,
            Gesture::OneFingerVertical,
        )
    }

    fn classify_two_finger(&self, a: Vec2, b: Vec2) -> Gesture {
        let a = apply_screen_aspect(a, self.aspect);
        let b = apply_screen_aspect(b, self.aspect);
        let mid = (a + b) * 0.5;
        let direction = self.classify_direction(
            mid - self.prev_two_finger,
            Gesture::TwoFingerHorizontal,
            Gesture::TwoFingerVertical,
        );
        if !direction.is_none() {
            return direction;
        }
        let spread = (a.distance(b) - self.initial_two_finger_distance).abs();
        if self.testing.contains(Gesture::Pinch) && spread > self.size {
            return Gesture::Pinch;
        }
        Gesture::None
    }

    fn classify_direction(&self, d: Vec2, horizontal: Gesture, vertical: Gesture) -> Gesture {
        let (ax, ay) = (d.x.abs(), d.y.abs());
        if self.testing.contains(horizontal) && ax >= ay && ax > self.size {
            return horizontal;
        }
        if self.testing.contains(vertical) && ay > ax && ay > self.size {
            return vertical;
        }
        Gesture::None
    }
}
