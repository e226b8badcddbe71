#![cfg(target_arch = "wasm32")]
use ar_core::device::DeviceProfile;
use ar_core::session::{ManagerSlot, QuickLookSession, SceneViewerSession, WebXrSession};
use ar_core::{
    ArConfig, ArManager, ArScale, ArSession, OrbitCamera, Placement, Pose, SessionEvent,
    SessionKind,
};
use constants::*;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod host;
mod input;
mod launcher;
mod overlay;
mod scene;
mod xr;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("ar-viewer-web starting");
    Ok(())
}

fn read_config(el: &web::Element) -> ArConfig {
    let mut config = ArConfig::new(dom::attribute(el, SRC_ATTR).unwrap_or_default());
    if let Some(modes) = dom::attribute(el, AR_MODES_ATTR) {
        config = config.with_modes(&modes);
    }
    if let Some(placement) = dom::attribute(el, AR_PLACEMENT_ATTR) {
        match placement.parse::<Placement>() {
            Ok(p) => config = config.with_placement(p),
            Err(e) => log::warn!("[config] {}", e),
        }
    }
    if let Some(scale) = dom::attribute(el, AR_SCALE_ATTR) {
        match scale.parse::<ArScale>() {
            Ok(s) => config = config.with_scale(s),
            Err(e) => log::warn!("[config] {}", e),
        }
    }
    if let Some(src) = dom::attribute(el, IOS_SRC_ATTR) {
        config = config.with_ios_src(src);
    }
    if let Some(title) = dom::attribute(el, TITLE_ATTR) {
        config = config.with_title(title);
    }
    if let Some(link) = dom::attribute(el, LINK_ATTR) {
        config = config.with_link(link);
    }
    log::debug!("[config] {:?}", config);
    config
}

fn device_profile() -> DeviceProfile {
    web::window()
        .map(|w| {
            let navigator = w.navigator();
            DeviceProfile::from_user_agent(
                &navigator.user_agent().unwrap_or_default(),
                navigator.max_touch_points().max(0) as u32,
            )
        })
        .unwrap_or_default()
}

fn build_manager(config: &ArConfig, scene: scene::JsScene, overlay_root: web::Element) -> ArManager {
    let device = device_profile();
    let launcher = Rc::new(launcher::BrowserLauncher);
    let platform = Rc::new(xr::WebXrPlatform::new(scene.host().clone(), Some(overlay_root)));
    let candidates: Vec<Box<dyn ArSession>> = vec![
        Box::new(WebXrSession::new(platform, Box::new(scene), config)),
        Box::new(SceneViewerSession::new(launcher.clone(), device, config.clone())),
        Box::new(QuickLookSession::new(launcher, device, config.clone())),
    ];
    ArManager::new(&config.modes, candidates)
}

/// Handle the host page keeps for one viewer element.
#[wasm_bindgen]
pub struct ArViewer {
    element: web::Element,
    manager: Rc<ManagerSlot>,
    camera: Rc<RefCell<OrbitCamera>>,
    presenting: Rc<Cell<bool>>,
}

#[wasm_bindgen]
impl ArViewer {
    /// `element_id` carries the AR attributes and receives `ar-status`;
    /// `canvas_id` is the render canvas; `host` is the engine object.
    #[wasm_bindgen(constructor)]
    pub fn new(element_id: &str, canvas_id: &str, host: JsValue) -> Result<ArViewer, JsValue> {
        Self::attach(element_id, canvas_id, host).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = canActivateAR)]
    pub fn can_activate_ar(&self) -> js_sys::Promise {
        let slot = self.manager.clone();
        future_to_promise(async move {
            let Some(manager) = slot.take() else {
                return Ok(JsValue::FALSE);
            };
            let available = manager.is_available().await;
            slot.restore(manager);
            Ok(JsValue::from_bool(available))
        })
    }

    /// Resolves with the entered session kind; rejects when none started.
    #[wasm_bindgen(js_name = activateAR)]
    pub fn activate_ar(&self) -> js_sys::Promise {
        let slot = self.manager.clone();
        future_to_promise(async move {
            let mut manager = slot
                .take()
                .ok_or_else(|| JsValue::from_str("an AR request is already in progress"))?;
            let result = manager.enter().await;
            slot.restore(manager);
            result
                .map(|kind| JsValue::from_str(kind.as_str()))
                .map_err(|e| JsValue::from_str(&e.to_string()))
        })
    }

    /// Ends the active session. While another call holds the manager the
    /// exit is deferred until it is returned.
    #[wasm_bindgen(js_name = exitAR)]
    pub fn exit_ar(&self) {
        self.manager.exit();
        if self.manager.is_exit_pending() {
            log::debug!("[ar] exit deferred while a request is pending");
        }
    }

    #[wasm_bindgen(getter, js_name = arStatus)]
    pub fn ar_status(&self) -> String {
        overlay::status(&self.element).unwrap_or_else(|| STATUS_NOT_PRESENTING.to_string())
    }

    #[wasm_bindgen(getter, js_name = isPresenting)]
    pub fn is_presenting(&self) -> bool {
        self.presenting.get()
    }

    /// Animate the orbit camera to a pose, angles in degrees.
    #[wasm_bindgen(js_name = setCameraOrbit)]
    pub fn set_camera_orbit(&self, yaw: f32, pitch: f32, distance: f32) {
        let mut camera = self.camera.borrow_mut();
        let pivot = camera.target_pose().pivot;
        camera.set_pose(Pose {
            yaw,
            pitch,
            distance,
            pivot,
        });
    }

    #[wasm_bindgen(js_name = jumpCameraToGoal)]
    pub fn jump_camera_to_goal(&self) {
        let mut camera = self.camera.borrow_mut();
        let goal = camera.target_pose();
        camera.jump_to(goal);
    }

    #[wasm_bindgen(js_name = resetCamera)]
    pub fn reset_camera(&self) {
        self.camera.borrow_mut().reset();
    }
}

impl ArViewer {
    fn attach(element_id: &str, canvas_id: &str, host: JsValue) -> anyhow::Result<Self> {
        let element = dom::element_by_id(element_id)?;
        let canvas = dom::canvas_by_id(canvas_id)?;
        dom::wire_canvas_resize(&canvas);

        let config = read_config(&element);
        let scene = scene::JsScene::new(host);
        let camera = Rc::new(RefCell::new(OrbitCamera::new(Pose::default())));
        let presenting = Rc::new(Cell::new(false));

        let manager = build_manager(&config, scene.clone(), element.clone());
        {
            let element = element.clone();
            let presenting = presenting.clone();
            let camera = camera.clone();
            manager.on_event(move |event| {
                presenting.set(matches!(event, SessionEvent::Entered(SessionKind::WebXr)));
                if let SessionEvent::Ended(_) = event {
                    camera.borrow_mut().reset();
                }
                overlay::apply_event(&element, event);
            });
        }
        overlay::set_status(&element, STATUS_NOT_PRESENTING);

        events::wire_orbit_handlers(events::OrbitWiring {
            canvas: canvas.clone(),
            camera: camera.clone(),
            pointer: Rc::new(RefCell::new(input::PointerState::default())),
            presenting: presenting.clone(),
        });
        frame::start_loop(Rc::new(RefCell::new(frame::FrameContext {
            canvas,
            camera: camera.clone(),
            scene,
            presenting: presenting.clone(),
            last_instant: Instant::now(),
        })));

        log::info!(
            "[ar] viewer attached to #{} (modes: {:?})",
            element_id,
            config.modes
        );
        Ok(Self {
            element,
            manager: Rc::new(ManagerSlot::new(manager)),
            camera,
            presenting,
        })
    }
}
