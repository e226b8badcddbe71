//! Composite controllers that arbitrate gesture controls during an AR
//! session and own the model transform.
//!
//! Per frame a controller (a) gathers the touches of the render context,
//! (b) while in the deadzone asks the checker for a gesture and activates
//! exactly one matching control, or (c) once past the deadzone forwards the
//! frame to every control, then advances all motions and writes the
//! composed transform to the scene.

mod floor;
mod hover;

pub use floor::FloorPlacementController;
pub use hover::HoverPlacementController;

use crate::constants::{DEADZONE_SIZE, MAX_SCALE, MIN_SCALE, SWIRL_DEFAULT_SCALE};
use crate::controls::{ControlKind, GestureControl};
use crate::deadzone::{DeadzoneChecker, DeadzoneState};
use crate::geometry::Anchor;
use crate::gesture::Gesture;
use crate::input::InputFrame;
use crate::scene::{ArScene, RenderContext};
use glam::{Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

/// Knobs shared by both placement controllers.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementOptions {
    pub deadzone_size: f32,
    pub scale_enabled: bool,
    pub min_scale: f32,
    pub max_scale: f32,
    pub swirl_scale: f32,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            deadzone_size: DEADZONE_SIZE,
            scale_enabled: true,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            swirl_scale: SWIRL_DEFAULT_SCALE,
        }
    }
}

pub trait PlacementController {
    /// Root the model on `anchor` and add indicator meshes to the scene.
    fn init(&mut self, anchor: Anchor, ctx: &RenderContext, scene: &mut dyn ArScene);

    /// Begin the scale-up entrance animation.
    fn start_entrance(&mut self);

    fn update(&mut self, ctx: &RenderContext, scene: &mut dyn ArScene);

    fn set_enabled(&mut self, enabled: bool);

    /// Release every control and forget the current gesture.
    fn deactivate_all(&mut self);

    fn transform(&self) -> ModelTransform;

    fn anchor(&self) -> Option<Anchor>;

    fn active_control(&self) -> Option<ControlKind>;
}

/// Result of feeding one frame to the arbiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArbiterStep {
    Idle,
    /// First frame of a new gesture session; baselines were recorded.
    Started,
    Waiting,
    Committed(Option<ControlKind>),
    Processing,
    Released,
}

/// Deadzone-driven routing shared by the placement controllers.
#[derive(Debug, Clone)]
pub(crate) struct GestureArbiter {
    pub(crate) deadzone: DeadzoneChecker,
    committed_fingers: usize,
    active: Option<ControlKind>,
}

impl GestureArbiter {
    pub(crate) fn new(deadzone_size: f32) -> Self {
        Self {
            deadzone: DeadzoneChecker::new(deadzone_size),
            committed_fingers: 0,
            active: None,
        }
    }

    pub(crate) fn active(&self) -> Option<ControlKind> {
        self.active
    }

    /// Re-derive the gestures worth testing from the enabled controls.
    pub(crate) fn refresh_testing(&mut self, controls: &[&dyn GestureControl]) {
        self.deadzone.clear_testing_gestures();
        for c in controls.iter().filter(|c| c.is_enabled()) {
            self.deadzone.add_testing_gestures(c.gestures());
        }
    }

    pub(crate) fn release(&mut self, controls: &mut [&mut dyn GestureControl]) {
        for c in controls.iter_mut() {
            c.deactivate();
        }
        self.deadzone.cleanup();
        self.committed_fingers = 0;
        self.active = None;
    }

    pub(crate) fn step(
        &mut self,
        input: &InputFrame,
        controls: &mut [&mut dyn GestureControl],
        choose: impl FnOnce(Gesture) -> Option<ControlKind>,
    ) -> ArbiterStep {
        let coords = input.coords();
        if coords.is_empty() {
            if self.deadzone.state() == DeadzoneState::Waiting {
                return ArbiterStep::Idle;
            }
            self.release(controls);
            return ArbiterStep::Released;
        }

        match self.deadzone.state() {
            DeadzoneState::Waiting => {
                self.deadzone.set_first_input(&coords);
                ArbiterStep::Started
            }
            DeadzoneState::InDeadzone => {
                let rebaselined = coords.len() != self.deadzone.last_finger_count();
                let gesture = self.deadzone.check(&coords);
                if rebaselined {
                    return ArbiterStep::Started;
                }
                if gesture.is_none() {
                    return ArbiterStep::Waiting;
                }
                self.committed_fingers = coords.len();
                let kind = choose(gesture);
                if let Some(kind) = kind {
                    for c in controls.iter_mut().filter(|c| c.kind() == kind) {
                        c.activate(gesture);
                        c.set_initial_pos(input);
                    }
                    log::debug!("[placement] {:?} routed to {:?}", gesture, kind);
                }
                self.active = kind;
                ArbiterStep::Committed(kind)
            }
            DeadzoneState::OutOfDeadzone => {
                if coords.len() != self.committed_fingers {
                    // A finger joined or left; start a fresh gesture session.
                    self.release(controls);
                    self.deadzone.set_first_input(&coords);
                    return ArbiterStep::Started;
                }
                for c in controls.iter_mut() {
                    c.process(input);
                }
                ArbiterStep::Processing
            }
        }
    }
}
