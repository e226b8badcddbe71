//! Per-touch input samples handed from the session driver to controls.

use crate::geometry::{apply_screen_aspect, CameraFrame, HitPose, Ray};
use glam::{Vec2, Vec3};
use smallvec::SmallVec;

/// Map a transient input's gamepad axes to normalized screen coordinates.
/// Gamepad Y grows downwards, screen Y grows upwards.
#[inline]
pub fn coord_from_gamepad_axes(axes: [f32; 2]) -> Vec2 {
    Vec2::new(axes[0], -axes[1])
}

/// One active touch: its screen coordinate, the world ray through it and the
/// hit-test result along that ray for this frame, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSample {
    pub coord: Vec2,
    pub ray: Ray,
    pub hit: Option<HitPose>,
}

impl TouchSample {
    pub fn new(coord: Vec2, ray: Ray) -> Self {
        Self {
            coord,
            ray,
            hit: None,
        }
    }

    pub fn with_hit(mut self, hit: Option<HitPose>) -> Self {
        self.hit = hit;
        self
    }

    /// Sample whose ray is derived from the camera; handy for hosts without
    /// per-input rays.
    pub fn from_camera(coord: Vec2, camera: &CameraFrame) -> Self {
        Self::new(coord, camera.ray(coord))
    }
}

pub type Touches = SmallVec<[TouchSample; 2]>;

/// What a gesture control sees on one frame.
#[derive(Debug, Clone, Copy)]
pub struct InputFrame<'a> {
    pub touches: &'a [TouchSample],
    pub camera: &'a CameraFrame,
    /// Viewport height / width.
    pub aspect: f32,
    /// World-space centre of the placed model.
    pub model_center: Vec3,
}

impl<'a> InputFrame<'a> {
    pub fn finger_count(&self) -> usize {
        self.touches.len()
    }

    pub fn coords(&self) -> SmallVec<[Vec2; 2]> {
        self.touches.iter().map(|t| t.coord).collect()
    }

    /// Aspect-corrected coordinate of touch `i`.
    pub fn corrected(&self, i: usize) -> Option<Vec2> {
        self.touches
            .get(i)
            .map(|t| apply_screen_aspect(t.coord, self.aspect))
    }

    /// Aspect-corrected screen position of the model centre.
    pub fn model_center_on_screen(&self) -> Vec2 {
        let p = self.camera.project(self.model_center).unwrap_or(Vec2::ZERO);
        apply_screen_aspect(p, self.aspect)
    }
}
