//! `XrPlatform` over the browser's WebXR Device API.
//!
//! Owns the `XRSession`, its reference space, both hit-test sources and the
//! XR animation-frame callback. Each frame is sampled into a `FrameData`
//! before anything else runs, so the whole frame sees one hit-test sample.

use crate::constants::{
    MAX_FRAME_DELTA_SEC, TRANSIENT_INPUT_PROFILE, XR_OPTIONAL_FEATURES, XR_REQUIRED_FEATURES,
};
use crate::host::{call, call_quiet};
use crate::input::touch_coord;
use ar_core::error::SessionError;
use ar_core::geometry::{CameraFrame, HitPose};
use ar_core::input::{TouchSample, Touches};
use ar_core::session::{FrameData, SessionKind, XrPlatform};
use async_trait::async_trait;
use glam::Mat4;
use js_sys::{Array, Promise, Reflect};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

type FrameCallback = Box<dyn FnMut(FrameData)>;
type RafClosure = Closure<dyn FnMut(f64, web::XrFrame)>;

fn request_failed(e: JsValue) -> SessionError {
    SessionError::RequestFailed(format!("{:?}", e))
}

fn hit_test_failed(e: JsValue) -> SessionError {
    SessionError::HitTestUnavailable(format!("{:?}", e))
}

fn mat4(m: &[f32]) -> Option<Mat4> {
    (m.len() >= 16).then(|| Mat4::from_cols_slice(m))
}

fn features(list: &[&str]) -> JsValue {
    list.iter()
        .map(|f| JsValue::from_str(f))
        .collect::<Array>()
        .into()
}

fn xr_system() -> Option<web::XrSystem> {
    let navigator = web::window()?.navigator();
    let xr = Reflect::get(&navigator, &"xr".into()).ok()?;
    if xr.is_undefined() || xr.is_null() {
        return None;
    }
    xr.dyn_into().ok()
}

#[derive(Default)]
struct XrState {
    session: RefCell<Option<web::XrSession>>,
    local_space: RefCell<Option<web::XrReferenceSpace>>,
    hit_source: RefCell<Option<web::XrHitTestSource>>,
    transient_source: RefCell<Option<web::XrTransientInputHitTestSource>>,
    frame_callback: RefCell<Option<FrameCallback>>,
    raf: RefCell<Option<RafClosure>>,
    raf_handle: Cell<Option<u32>>,
    running: Cell<bool>,
    last_time: Cell<Option<f64>>,
    end_callback: RefCell<Option<Box<dyn FnMut()>>>,
    end_closure: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl XrState {
    fn session(&self) -> Option<web::XrSession> {
        self.session.borrow().clone()
    }

    fn sample(&self, time: f64, frame: &web::XrFrame) -> Option<FrameData> {
        let local = self.local_space.borrow().clone()?;
        let pose = frame.get_viewer_pose(&local)?;
        let view: web::XrView = pose.views().get(0).dyn_into().ok()?;
        let camera = CameraFrame::new(
            mat4(&view.transform().inverse().matrix())?,
            mat4(&view.projection_matrix())?,
        );
        let delta = match self.last_time.replace(Some(time)) {
            Some(prev) => (((time - prev) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DELTA_SEC),
            None => 0.0,
        };

        let viewer_hits = self
            .hit_source
            .borrow()
            .as_ref()
            .map(|source| {
                frame
                    .get_hit_test_results(source)
                    .iter()
                    .filter_map(|r| r.dyn_into::<web::XrHitTestResult>().ok())
                    .filter_map(|r| r.get_pose(&local))
                    .filter_map(|p| HitPose::from_cols_slice(&p.transform().matrix()))
                    .collect()
            })
            .unwrap_or_default();

        let mut touches = Touches::new();
        if let Some(source) = self.transient_source.borrow().as_ref() {
            for result in frame.get_hit_test_results_for_transient_input(source).iter() {
                let Ok(result) = result.dyn_into::<web::XrTransientInputHitTestResult>() else {
                    continue;
                };
                let Some(gamepad) = result.input_source().gamepad() else {
                    continue;
                };
                let axes: Vec<f64> = gamepad.axes().iter().filter_map(|a| a.as_f64()).collect();
                let Some(coord) = touch_coord(&axes) else {
                    continue;
                };
                let hit = result
                    .results()
                    .iter()
                    .filter_map(|r| r.dyn_into::<web::XrHitTestResult>().ok())
                    .find_map(|r| r.get_pose(&local))
                    .and_then(|p| HitPose::from_cols_slice(&p.transform().matrix()));
                touches.push(TouchSample::from_camera(coord, &camera).with_hit(hit));
            }
        } else {
            log::trace!("[xr] transient input source not ready");
        }

        Some(FrameData {
            delta,
            camera,
            size: crate::dom::viewport_size(),
            viewer_hits,
            touches,
        })
    }

    fn cancel_sources(&self) {
        if let Some(source) = self.hit_source.borrow_mut().take() {
            _ = source.cancel();
        }
        if let Some(source) = self.transient_source.borrow_mut().take() {
            _ = source.cancel();
        }
    }

    fn session_ended(&self, host: &JsValue) {
        log::info!("[xr] session ended");
        let callback = self.end_callback.borrow_mut().take();
        if let Some(mut callback) = callback {
            callback();
        }
        self.cancel_sources();
        self.running.set(false);
        self.raf_handle.set(None);
        self.raf.borrow_mut().take();
        self.frame_callback.borrow_mut().take();
        self.local_space.borrow_mut().take();
        self.session.borrow_mut().take();
        call_quiet(host, "onXrSessionEnd", &[]);
    }
}

pub struct WebXrPlatform {
    host: JsValue,
    overlay_root: Option<web::Element>,
    state: Rc<XrState>,
}

impl WebXrPlatform {
    pub fn new(host: JsValue, overlay_root: Option<web::Element>) -> Self {
        Self {
            host,
            overlay_root,
            state: Rc::new(XrState::default()),
        }
    }

    fn session_init(&self) -> web::XrSessionInit {
        let init = web::XrSessionInit::new();
        init.set_required_features(&features(XR_REQUIRED_FEATURES));
        init.set_optional_features(&features(XR_OPTIONAL_FEATURES));
        if let Some(root) = &self.overlay_root {
            let overlay = js_sys::Object::new();
            _ = Reflect::set(&overlay, &"root".into(), root);
            _ = Reflect::set(&init, &"domOverlay".into(), &overlay);
        }
        init
    }

    fn watch_end(&self, session: &web::XrSession) {
        let state = Rc::downgrade(&self.state);
        let host = self.host.clone();
        let on_end = Closure::wrap(Box::new(move || {
            if let Some(state) = state.upgrade() {
                state.session_ended(&host);
            }
        }) as Box<dyn FnMut()>);
        session.set_onend(Some(on_end.as_ref().unchecked_ref()));
        *self.state.end_closure.borrow_mut() = Some(on_end);
    }
}

#[async_trait(?Send)]
impl XrPlatform for WebXrPlatform {
    async fn is_ar_supported(&self) -> bool {
        let Some(xr) = xr_system() else {
            return false;
        };
        match JsFuture::from(xr.is_session_supported(web::XrSessionMode::ImmersiveAr)).await {
            Ok(v) => v.as_bool().unwrap_or(false),
            Err(e) => {
                log::debug!("[xr] isSessionSupported rejected: {:?}", e);
                false
            }
        }
    }

    async fn request_session(&self) -> Result<(), SessionError> {
        let xr = xr_system().ok_or(SessionError::Unsupported(SessionKind::WebXr))?;
        let init = self.session_init();
        let session: web::XrSession = JsFuture::from(
            xr.request_session_with_options(web::XrSessionMode::ImmersiveAr, &init),
        )
        .await
        .map_err(request_failed)?
        .dyn_into()
        .map_err(request_failed)?;

        let space = JsFuture::from(session.request_reference_space(web::XrReferenceSpaceType::Local))
            .await
            .and_then(|v| v.dyn_into::<web::XrReferenceSpace>());
        let local = match space {
            Ok(local) => local,
            Err(e) => {
                _ = session.end();
                return Err(request_failed(e));
            }
        };

        self.watch_end(&session);
        if let Err(e) = call(&self.host, "onXrSessionStart", &[session.clone().into()]) {
            log::warn!("[xr] {}", e);
        }
        *self.state.local_space.borrow_mut() = Some(local);
        *self.state.session.borrow_mut() = Some(session);
        Ok(())
    }

    async fn request_hit_test_source(&self) -> Result<(), SessionError> {
        let session = self
            .state
            .session()
            .ok_or_else(|| SessionError::HitTestUnavailable("no session".into()))?;
        let viewer: web::XrReferenceSpace =
            JsFuture::from(session.request_reference_space(web::XrReferenceSpaceType::Viewer))
                .await
                .map_err(hit_test_failed)?
                .dyn_into()
                .map_err(hit_test_failed)?;
        let options = web::XrHitTestOptionsInit::new(&viewer);
        let source: web::XrHitTestSource =
            JsFuture::from(session.request_hit_test_source(&options))
                .await
                .map_err(hit_test_failed)?
                .dyn_into()
                .map_err(hit_test_failed)?;
        *self.state.hit_source.borrow_mut() = Some(source);
        log::debug!("[xr] viewer hit-test source ready");
        Ok(())
    }

    fn request_transient_hit_test_source(&self) {
        let Some(session) = self.state.session() else {
            return;
        };
        let state = Rc::downgrade(&self.state);
        spawn_local(async move {
            let options = web::XrTransientInputHitTestOptionsInit::new(TRANSIENT_INPUT_PROFILE);
            let source = JsFuture::from(session.request_hit_test_source_for_transient_input(&options))
                .await
                .and_then(|v| v.dyn_into::<web::XrTransientInputHitTestSource>());
            match (source, state.upgrade()) {
                (Ok(source), Some(state)) if state.running.get() => {
                    log::debug!("[xr] transient input hit-test source ready");
                    *state.transient_source.borrow_mut() = Some(source);
                }
                (Ok(source), _) => {
                    _ = source.cancel();
                }
                (Err(e), _) => log::warn!("[xr] transient input hit-test unavailable: {:?}", e),
            }
        });
    }

    async fn sleep(&self, ms: u32) {
        let promise = Promise::new(&mut |resolve, _reject| {
            if let Some(w) = web::window() {
                _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32);
            }
        });
        _ = JsFuture::from(promise).await;
    }

    fn install_frame_loop(&self, callback: Box<dyn FnMut(FrameData)>) {
        *self.state.frame_callback.borrow_mut() = Some(callback);
        self.state.last_time.set(None);
        self.state.running.set(true);
        let Some(session) = self.state.session() else {
            log::warn!("[xr] frame loop installed without a session");
            return;
        };

        let state = Rc::downgrade(&self.state);
        let closure = Closure::wrap(Box::new(move |time: f64, frame: web::XrFrame| {
            let Some(state) = state.upgrade() else {
                return;
            };
            if !state.running.get() {
                return;
            }
            let next = state
                .raf
                .borrow()
                .as_ref()
                .map(|c| frame.session().request_animation_frame(c.as_ref().unchecked_ref()));
            state.raf_handle.set(next);
            if let Some(data) = state.sample(time, &frame) {
                if let Some(callback) = state.frame_callback.borrow_mut().as_mut() {
                    callback(data);
                }
            }
        }) as Box<dyn FnMut(f64, web::XrFrame)>);
        let handle = session.request_animation_frame(closure.as_ref().unchecked_ref());
        self.state.raf_handle.set(Some(handle));
        *self.state.raf.borrow_mut() = Some(closure);
    }

    fn clear_frame_loop(&self) {
        // The closure itself is dropped once the session has ended.
        self.state.running.set(false);
        if let (Some(session), Some(handle)) = (self.state.session(), self.state.raf_handle.take()) {
            session.cancel_animation_frame(handle);
        }
        if let Ok(mut callback) = self.state.frame_callback.try_borrow_mut() {
            callback.take();
        }
    }

    fn pixel_ratio(&self) -> f32 {
        call(&self.host, "getPixelRatio", &[])
            .ok()
            .and_then(|v| v.as_f64())
            .or_else(|| web::window().map(|w| w.device_pixel_ratio()))
            .unwrap_or(1.0) as f32
    }

    fn set_pixel_ratio(&self, ratio: f32) {
        call_quiet(&self.host, "setPixelRatio", &[JsValue::from_f64(ratio as f64)]);
    }

    fn cancel_hit_test_sources(&self) {
        self.state.cancel_sources();
    }

    fn end_session(&self) {
        if let Some(session) = self.state.session() {
            _ = session.end();
        }
    }

    fn on_session_end(&self, callback: Box<dyn FnMut()>) {
        *self.state.end_callback.borrow_mut() = Some(callback);
    }
}
