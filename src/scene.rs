//! `ArScene` backed by the host page's rendering engine.
//!
//! The host object implements `setRootPosition`, `setModelRotation`,
//! `setModelScale`, `setWallRotation`, `addObject`, `setIndicator`,
//! `modelLoaded`, `modelBounds` and `render`.

use crate::host::{call, call_quiet, f32_array};
use ar_core::geometry::{Aabb, CameraFrame};
use ar_core::scene::{ArScene, IndicatorPose, SceneObject};
use glam::{Quat, Vec3};
use js_sys::{Object, Reflect};
use wasm_bindgen::JsValue;

#[derive(Clone)]
pub struct JsScene {
    host: JsValue,
}

impl JsScene {
    pub fn new(host: JsValue) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &JsValue {
        &self.host
    }
}

fn object_name(object: SceneObject) -> &'static str {
    match object {
        SceneObject::Reticle => "reticle",
        SceneObject::Shadow => "shadow",
        SceneObject::ScaleLabel => "scale-label",
    }
}

fn vec3(v: Vec3) -> JsValue {
    f32_array(&v.to_array())
}

fn quat(q: Quat) -> JsValue {
    f32_array(&q.to_array())
}

fn indicator_object(pose: &IndicatorPose) -> Result<JsValue, JsValue> {
    let obj = Object::new();
    Reflect::set(&obj, &"position".into(), &vec3(pose.position))?;
    Reflect::set(&obj, &"rotation".into(), &quat(pose.rotation))?;
    Reflect::set(&obj, &"scale".into(), &JsValue::from_f64(pose.scale as f64))?;
    Reflect::set(&obj, &"opacity".into(), &JsValue::from_f64(pose.opacity as f64))?;
    if let Some(text) = &pose.text {
        Reflect::set(&obj, &"text".into(), &JsValue::from_str(text))?;
    }
    Ok(obj.into())
}

impl ArScene for JsScene {
    fn set_root_position(&mut self, position: Vec3) {
        call_quiet(&self.host, "setRootPosition", &[vec3(position)]);
    }

    fn set_model_rotation(&mut self, rotation: Quat) {
        call_quiet(&self.host, "setModelRotation", &[quat(rotation)]);
    }

    fn set_model_scale(&mut self, scale: f32) {
        call_quiet(&self.host, "setModelScale", &[JsValue::from_f64(scale as f64)]);
    }

    fn set_wall_rotation(&mut self, rotation: Quat) {
        call_quiet(&self.host, "setWallRotation", &[quat(rotation)]);
    }

    fn add(&mut self, objects: &[SceneObject]) {
        for object in objects {
            if let Err(e) = call(&self.host, "addObject", &[object_name(*object).into()]) {
                log::warn!("[scene] {}", e);
            }
        }
    }

    fn set_indicator(&mut self, object: SceneObject, pose: &IndicatorPose) {
        match indicator_object(pose) {
            Ok(obj) => call_quiet(&self.host, "setIndicator", &[object_name(object).into(), obj]),
            Err(e) => log::trace!("[scene] indicator: {:?}", e),
        }
    }

    fn model_loaded(&self) -> bool {
        call(&self.host, "modelLoaded", &[])
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    fn model_bounds(&self) -> Aabb {
        let values: Vec<f32> = call(&self.host, "modelBounds", &[])
            .map(|v| js_sys::Float32Array::new(&v).to_vec())
            .unwrap_or_default();
        match values.as_slice() {
            [x0, y0, z0, x1, y1, z1] => Aabb::new(Vec3::new(*x0, *y0, *z0), Vec3::new(*x1, *y1, *z1)),
            _ => {
                log::warn!("[scene] modelBounds unavailable, using a unit box");
                Aabb::default()
            }
        }
    }

    fn render(&mut self, camera: &CameraFrame) {
        call_quiet(
            &self.host,
            "render",
            &[
                f32_array(&camera.view.to_cols_array()),
                f32_array(&camera.projection.to_cols_array()),
            ],
        );
    }
}
