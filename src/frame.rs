//! Animation-frame loop for the non-AR viewer.

use crate::constants::MAX_FRAME_DELTA_SEC;
use crate::scene::JsScene;
use ar_core::camera::OrbitCamera;
use ar_core::scene::ArScene;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub canvas: web::HtmlCanvasElement,
    pub camera: Rc<RefCell<OrbitCamera>>,
    pub scene: JsScene,
    /// The XR frame loop draws while an AR session presents.
    pub presenting: Rc<Cell<bool>>,
    pub last_instant: Instant,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant)
            .as_secs_f32()
            .min(MAX_FRAME_DELTA_SEC);
        self.last_instant = now;
        if self.presenting.get() {
            return;
        }

        let aspect = self.canvas.width().max(1) as f32 / self.canvas.height().max(1) as f32;
        let frame = {
            let mut camera = self.camera.borrow_mut();
            camera.update(dt_sec * 1000.0);
            camera.camera_frame(aspect)
        };
        self.scene.render(&frame);
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
