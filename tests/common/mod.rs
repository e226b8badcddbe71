// Shared fakes for host-side placement and session tests.

#![allow(dead_code)]

use ar_core::geometry::{Aabb, CameraFrame};
use ar_core::input::TouchSample;
use ar_core::scene::{ArScene, IndicatorPose, RenderContext, SceneObject};
use glam::{Quat, Vec2, Vec3};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// What the fake scene has been told so far.
#[derive(Debug, Clone)]
pub struct SceneLog {
    pub root: Vec3,
    pub rotation: Quat,
    pub scale: f32,
    pub wall: Quat,
    pub added: Vec<SceneObject>,
    pub indicators: HashMap<SceneObject, IndicatorPose>,
    pub loaded: bool,
    pub bounds: Aabb,
    pub renders: usize,
}

impl Default for SceneLog {
    fn default() -> Self {
        Self {
            root: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
            wall: Quat::IDENTITY,
            added: Vec::new(),
            indicators: HashMap::new(),
            loaded: true,
            bounds: Aabb::default(),
            renders: 0,
        }
    }
}

impl SceneLog {
    pub fn indicator(&self, object: SceneObject) -> Option<&IndicatorPose> {
        self.indicators.get(&object)
    }
}

/// Scene whose log stays readable after it is boxed into a session.
#[derive(Clone, Default)]
pub struct FakeScene {
    pub log: Rc<RefCell<SceneLog>>,
}

impl FakeScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SceneLog {
        self.log.borrow().clone()
    }
}

impl ArScene for FakeScene {
    fn set_root_position(&mut self, position: Vec3) {
        self.log.borrow_mut().root = position;
    }
    fn set_model_rotation(&mut self, rotation: Quat) {
        self.log.borrow_mut().rotation = rotation;
    }
    fn set_model_scale(&mut self, scale: f32) {
        self.log.borrow_mut().scale = scale;
    }
    fn set_wall_rotation(&mut self, rotation: Quat) {
        self.log.borrow_mut().wall = rotation;
    }
    fn add(&mut self, objects: &[SceneObject]) {
        self.log.borrow_mut().added.extend_from_slice(objects);
    }
    fn set_indicator(&mut self, object: SceneObject, pose: &IndicatorPose) {
        self.log.borrow_mut().indicators.insert(object, pose.clone());
    }
    fn model_loaded(&self) -> bool {
        self.log.borrow().loaded
    }
    fn model_bounds(&self) -> Aabb {
        self.log.borrow().bounds
    }
    fn render(&mut self, _camera: &CameraFrame) {
        self.log.borrow_mut().renders += 1;
    }
}

pub const FRAME_SEC: f32 = 0.016;

/// Camera a couple of metres back from the origin, looking at it.
pub fn room_camera() -> CameraFrame {
    CameraFrame::look_at(
        Vec3::new(0.0, 2.0, 4.0),
        Vec3::ZERO,
        Vec3::Y,
        45f32.to_radians(),
        1.0,
    )
}

pub fn context(camera: CameraFrame, coords: &[Vec2]) -> RenderContext {
    RenderContext::new(camera, Vec2::new(1000.0, 1000.0))
        .with_delta(FRAME_SEC)
        .with_touches(coords.iter().map(|c| TouchSample::from_camera(*c, &camera)))
}
