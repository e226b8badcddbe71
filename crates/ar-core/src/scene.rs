//! Boundary to the rendering engine's scene graph.
//!
//! Placement controllers write the model transform only through `ArScene`;
//! they never touch engine objects directly.

use crate::geometry::{Aabb, CameraFrame};
use crate::input::{TouchSample, Touches};
use glam::{Quat, Vec2, Vec3};

/// On-screen helper meshes owned by a placement session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneObject {
    /// Ring marking the current surface hit before placement.
    Reticle,
    /// Contact shadow under a floor-placed model.
    Shadow,
    /// Billboarded percentage label shown while pinching.
    ScaleLabel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPose {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
    pub opacity: f32,
    pub text: Option<String>,
}

impl IndicatorPose {
    pub fn hidden() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
            opacity: 0.0,
            text: None,
        }
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

pub trait ArScene {
    fn set_root_position(&mut self, position: Vec3);
    fn set_model_rotation(&mut self, rotation: Quat);
    fn set_model_scale(&mut self, scale: f32);
    fn set_wall_rotation(&mut self, rotation: Quat);
    fn add(&mut self, objects: &[SceneObject]);
    fn set_indicator(&mut self, object: SceneObject, pose: &IndicatorPose);

    /// Whether the model asset has finished loading.
    fn model_loaded(&self) -> bool;

    /// Model bounds in its local frame at unit scale.
    fn model_bounds(&self) -> Aabb;

    /// Draw the scene from `camera`.
    fn render(&mut self, camera: &CameraFrame);
}

/// Per-frame input supplied by the session driver to a placement controller.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Seconds since the previous frame.
    pub delta: f32,
    pub camera: CameraFrame,
    /// Viewport size in pixels.
    pub size: Vec2,
    /// Placement targets a wall instead of the floor.
    pub vertical: bool,
    pub touches: Touches,
}

impl RenderContext {
    pub fn new(camera: CameraFrame, size: Vec2) -> Self {
        Self {
            delta: 0.0,
            camera,
            size,
            vertical: false,
            touches: Touches::new(),
        }
    }

    pub fn with_delta(mut self, delta: f32) -> Self {
        self.delta = delta;
        self
    }

    pub fn with_touches(mut self, touches: impl IntoIterator<Item = TouchSample>) -> Self {
        self.touches = touches.into_iter().collect();
        self
    }

    /// Viewport height / width, 1 for a degenerate viewport.
    pub fn aspect(&self) -> f32 {
        if self.size.x > 0.0 && self.size.y > 0.0 {
            self.size.y / self.size.x
        } else {
            1.0
        }
    }

    #[inline]
    pub fn delta_ms(&self) -> f32 {
        self.delta * 1000.0
    }
}
