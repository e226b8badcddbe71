//! Single-purpose gesture handlers driven by a placement controller.
//!
//! Each control moves through `disabled -> enabled -> active -> enabled`.
//! Only the placement controller activates a control, and only after the
//! deadzone checker committed to a gesture the control accepts. `process`
//! is a no-op on inactive controls, so the controller can forward every
//! frame to all of them.

mod scale;
mod swipe;
mod swirl;
mod translate;

pub use scale::{ScaleControl, ScaleLabel};
pub use swipe::SwipeControl;
pub use swirl::SwirlControl;
pub use translate::{TranslateControl, TranslateState};

use crate::gesture::{Gesture, GestureSet};
use crate::input::InputFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Swirl,
    Swipe,
    Scale,
    Translate,
}

pub trait GestureControl {
    fn kind(&self) -> ControlKind;

    /// Gestures that may route input to this control.
    fn gestures(&self) -> GestureSet;

    fn accepts(&self, gesture: Gesture) -> bool {
        self.gestures().contains(gesture)
    }

    fn is_enabled(&self) -> bool;

    /// Disabling an active control deactivates it.
    fn set_enabled(&mut self, enabled: bool);

    fn is_active(&self) -> bool;

    /// Start routing input here. Ignored while disabled.
    fn activate(&mut self, gesture: Gesture);

    /// Seed delta tracking from the frame that committed the gesture.
    fn set_initial_pos(&mut self, input: &InputFrame);

    fn process(&mut self, input: &InputFrame);

    fn deactivate(&mut self);

    /// Advance internal motions by `dt_ms`.
    fn update(&mut self, dt_ms: f32);
}
