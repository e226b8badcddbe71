//! In-page WebXR session logic, independent of the browser bindings.
//!
//! The frame loop runs in two phases. Before placement it waits for the
//! model, then commits the first confident viewer hit as the anchor. After
//! placement every frame goes to the placement controller. Both phases end
//! with a draw.

use super::{ArSession, EventSink, SessionEvent, SessionKind, SessionPhase};
use crate::config::{ArConfig, Placement};
use crate::constants::{
    HIT_TEST_SOURCE_TIMEOUT_MS, HOVER_DEFAULT_DISTANCE, RETICLE_SPIN_MS, XR_PIXEL_RATIO,
};
use crate::easing::Easing;
use crate::error::SessionError;
use crate::geometry::{Anchor, CameraFrame, HitPose};
use crate::input::Touches;
use crate::motion::Motion;
use crate::placement::{
    FloorPlacementController, HoverPlacementController, PlacementController, PlacementOptions,
};
use crate::scene::{ArScene, IndicatorPose, RenderContext, SceneObject};
use async_trait::async_trait;
use futures::future::{select, Either};
use glam::{Quat, Vec2};
use std::cell::RefCell;
use std::f32::consts::TAU;
use std::rc::{Rc, Weak};

/// Everything the platform samples for one XR frame.
#[derive(Debug, Clone)]
pub struct FrameData {
    /// Seconds since the previous frame.
    pub delta: f32,
    pub camera: CameraFrame,
    pub size: Vec2,
    /// Results of the viewer-ray hit-test source, best first.
    pub viewer_hits: Vec<HitPose>,
    pub touches: Touches,
}

/// The browser surface a WebXR session needs. Platform handles (session,
/// reference space, hit-test sources) stay behind this trait.
#[async_trait(?Send)]
pub trait XrPlatform {
    async fn is_ar_supported(&self) -> bool;
    async fn request_session(&self) -> Result<(), SessionError>;
    async fn request_hit_test_source(&self) -> Result<(), SessionError>;

    /// Start the transient-input source request without waiting for it.
    /// Frames carry no touches until it resolves.
    fn request_transient_hit_test_source(&self);

    async fn sleep(&self, ms: u32);

    fn install_frame_loop(&self, callback: Box<dyn FnMut(FrameData)>);
    fn clear_frame_loop(&self);

    fn pixel_ratio(&self) -> f32;
    fn set_pixel_ratio(&self, ratio: f32);

    fn cancel_hit_test_sources(&self);
    fn end_session(&self);

    /// Called when the platform ends the session, whoever initiated it.
    fn on_session_end(&self, callback: Box<dyn FnMut()>);
}

struct XrShared {
    phase: SessionPhase,
    placed: bool,
    placement: Placement,
    controller: Box<dyn PlacementController>,
    scene: Box<dyn ArScene>,
    saved_pixel_ratio: Option<f32>,
    reticle_spin: Motion,
    reticle_added: bool,
    events: Option<EventSink>,
}

impl XrShared {
    fn is_running(&self) -> bool {
        matches!(self.phase, SessionPhase::Requesting | SessionPhase::Active)
    }

    fn on_frame(&mut self, frame: FrameData) {
        if !self.is_running() {
            return;
        }
        let vertical = self.placement.is_vertical();
        let mut ctx = RenderContext::new(frame.camera, frame.size)
            .with_delta(frame.delta)
            .with_touches(frame.touches);
        ctx.vertical = vertical;

        if self.placed {
            self.controller.update(&ctx, self.scene.as_mut());
        } else {
            self.search(&ctx, &frame.viewer_hits);
        }
        self.scene.render(&ctx.camera);
    }

    fn search(&mut self, ctx: &RenderContext, hits: &[HitPose]) {
        self.reticle_spin.update(ctx.delta_ms());
        let vertical = ctx.vertical;
        let confident = hits.iter().find(|h| h.is_confident(vertical));

        if self.scene.model_loaded() {
            let anchor = match self.placement {
                Placement::Hover => Some(Anchor::floor(
                    ctx.camera.position() + ctx.camera.forward() * HOVER_DEFAULT_DISTANCE,
                )),
                _ => confident.map(|hit| Anchor::from_hit(hit, vertical)),
            };
            if let Some(anchor) = anchor {
                self.place(anchor, ctx);
                return;
            }
        }

        let pose = match hits.first() {
            Some(hit) if self.placement != Placement::Hover => {
                let rest = Anchor::from_hit(hit, vertical);
                IndicatorPose {
                    position: hit.position(),
                    rotation: rest.rotation
                        * Quat::from_axis_angle(rest.normal(), self.reticle_spin.value()),
                    scale: 1.0,
                    opacity: if confident.is_some() { 1.0 } else { 0.5 },
                    text: None,
                }
            }
            _ => IndicatorPose::hidden(),
        };
        self.scene.set_indicator(SceneObject::Reticle, &pose);
    }

    fn place(&mut self, anchor: Anchor, ctx: &RenderContext) {
        log::info!(
            "[xr] placed at ({:.2},{:.2},{:.2})",
            anchor.position.x,
            anchor.position.y,
            anchor.position.z
        );
        self.scene
            .set_indicator(SceneObject::Reticle, &IndicatorPose::hidden());
        self.controller.init(anchor, ctx, self.scene.as_mut());
        self.controller.start_entrance();
        self.placed = true;
    }
}

/// Undo everything `enter` installed. Safe to call repeatedly; only the first
/// call after a successful start reports `Ended`.
fn teardown<P: XrPlatform + ?Sized>(platform: &P, shared: &RefCell<XrShared>) {
    let (sink, entered) = {
        let mut s = shared.borrow_mut();
        if !s.is_running() {
            return;
        }
        let entered = s.phase == SessionPhase::Active;
        s.phase = SessionPhase::Ending;
        platform.cancel_hit_test_sources();
        platform.clear_frame_loop();
        if let Some(ratio) = s.saved_pixel_ratio.take() {
            platform.set_pixel_ratio(ratio);
        }
        s.controller.deactivate_all();
        s.controller.set_enabled(false);
        s.scene
            .set_indicator(SceneObject::Reticle, &IndicatorPose::hidden());
        s.placed = false;
        s.phase = SessionPhase::Idle;
        (s.events.clone(), entered)
    };
    log::info!("[xr] session torn down");
    if entered {
        if let Some(sink) = sink {
            sink(SessionEvent::Ended(SessionKind::WebXr));
        }
    }
}

pub struct WebXrSession<P: XrPlatform + 'static> {
    platform: Rc<P>,
    shared: Rc<RefCell<XrShared>>,
    options: PlacementOptions,
}

impl<P: XrPlatform + 'static> WebXrSession<P> {
    pub fn new(platform: Rc<P>, scene: Box<dyn ArScene>, config: &ArConfig) -> Self {
        let options = config.to_placement_options();
        let shared = XrShared {
            phase: SessionPhase::Idle,
            placed: false,
            placement: config.placement,
            controller: Self::controller_for(config.placement, &options),
            scene,
            saved_pixel_ratio: None,
            reticle_spin: Motion::new(0.0, RETICLE_SPIN_MS, Easing::Linear).looping(true),
            reticle_added: false,
            events: None,
        };
        Self {
            platform,
            shared: Rc::new(RefCell::new(shared)),
            options,
        }
    }

    fn controller_for(
        placement: Placement,
        options: &PlacementOptions,
    ) -> Box<dyn PlacementController> {
        match placement {
            Placement::Hover => Box::new(HoverPlacementController::new(options)),
            Placement::Floor | Placement::Wall => Box::new(FloorPlacementController::new(options)),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.shared.borrow().phase
    }

    pub fn is_placed(&self) -> bool {
        self.shared.borrow().placed
    }

    /// Run `f` against the placement controller, e.g. to read the transform.
    pub fn with_controller<R>(&self, f: impl FnOnce(&dyn PlacementController) -> R) -> R {
        f(self.shared.borrow().controller.as_ref())
    }

    fn install(&self) {
        let mut s = self.shared.borrow_mut();
        s.saved_pixel_ratio = Some(self.platform.pixel_ratio());
        self.platform.set_pixel_ratio(XR_PIXEL_RATIO);
        s.placed = false;
        s.reticle_spin.play(0.0, TAU);
        s.controller = Self::controller_for(s.placement, &self.options);
        if !s.reticle_added {
            s.scene.add(&[SceneObject::Reticle]);
            s.reticle_added = true;
        }
        drop(s);

        let platform = Rc::downgrade(&self.platform);
        let shared = Rc::downgrade(&self.shared);
        self.platform.on_session_end(Box::new(move || {
            if let (Some(p), Some(s)) = (platform.upgrade(), shared.upgrade()) {
                teardown(p.as_ref(), &s);
            }
        }));

        self.platform.request_transient_hit_test_source();

        let shared: Weak<RefCell<XrShared>> = Rc::downgrade(&self.shared);
        self.platform.install_frame_loop(Box::new(move |frame| {
            if let Some(s) = shared.upgrade() {
                s.borrow_mut().on_frame(frame);
            }
        }));
    }

    fn abort(&self, error: &SessionError) {
        log::error!("[xr] aborting session: {}", error);
        teardown(self.platform.as_ref(), &self.shared);
        self.platform.end_session();
    }
}

#[async_trait(?Send)]
impl<P: XrPlatform + 'static> ArSession for WebXrSession<P> {
    fn kind(&self) -> SessionKind {
        SessionKind::WebXr
    }

    async fn is_available(&self) -> bool {
        self.platform.is_ar_supported().await
    }

    async fn enter(&mut self) -> Result<(), SessionError> {
        if self.phase() != SessionPhase::Idle {
            return Err(SessionError::AlreadyActive);
        }
        self.shared.borrow_mut().phase = SessionPhase::Requesting;
        log::info!("[xr] requesting immersive-ar session");
        if let Err(e) = self.platform.request_session().await {
            self.shared.borrow_mut().phase = SessionPhase::Idle;
            return Err(e);
        }

        self.install();

        let source = select(
            self.platform.request_hit_test_source(),
            self.platform.sleep(HIT_TEST_SOURCE_TIMEOUT_MS),
        )
        .await;
        let result = match source {
            Either::Left((result, _)) => result,
            Either::Right(_) => Err(SessionError::HitTestTimeout(HIT_TEST_SOURCE_TIMEOUT_MS)),
        };
        if let Err(e) = result {
            self.abort(&e);
            return Err(e);
        }

        let mut s = self.shared.borrow_mut();
        if s.phase != SessionPhase::Requesting {
            // Ended by the platform while the source was pending.
            return Err(SessionError::RequestFailed("session ended during setup".into()));
        }
        s.phase = SessionPhase::Active;
        log::info!("[xr] session active");
        Ok(())
    }

    fn exit(&mut self) {
        teardown(self.platform.as_ref(), &self.shared);
        self.platform.end_session();
    }

    fn is_active(&self) -> bool {
        self.phase() == SessionPhase::Active
    }

    fn set_event_sink(&mut self, sink: EventSink) {
        self.shared.borrow_mut().events = Some(sink);
    }
}
