use super::{GestureArbiter, ModelTransform, PlacementController, PlacementOptions};
use crate::constants::{
    HOVER_DEFAULT_DISTANCE, HOVER_FOLLOW_MS, HOVER_MAX_DISTANCE, HOVER_MIN_DISTANCE,
    SCALE_IN_DURATION_MS, SCALE_IN_START,
};
use crate::controls::{ControlKind, GestureControl, ScaleControl, SwipeControl, SwirlControl};
use crate::easing::Easing;
use crate::geometry::{Aabb, Anchor, CameraFrame};
use crate::gesture::Gesture;
use crate::input::InputFrame;
use crate::motion::{Motion, Motion3};
use crate::scene::{ArScene, IndicatorPose, RenderContext, SceneObject};
use glam::{Quat, Vec3};

/// Placement where the model floats a fixed distance along the view ray and
/// follows the camera. One finger swirls, two fingers tumble, a pinch scales.
#[derive(Debug, Clone)]
pub struct HoverPlacementController {
    arbiter: GestureArbiter,
    swirl: SwirlControl,
    swipe: SwipeControl,
    scale: ScaleControl,
    anchor: Option<Anchor>,
    distance: f32,
    position: Motion3,
    entrance: Motion,
    bounds: Aabb,
    indicators_added: bool,
}

impl Default for HoverPlacementController {
    fn default() -> Self {
        Self::new(&PlacementOptions::default())
    }
}

impl HoverPlacementController {
    pub fn new(options: &PlacementOptions) -> Self {
        let mut scale = ScaleControl::new(options.min_scale, options.max_scale);
        scale.set_enabled(options.scale_enabled);
        let mut c = Self {
            arbiter: GestureArbiter::new(options.deadzone_size),
            swirl: SwirlControl::new(Vec3::Y).with_scale(options.swirl_scale),
            swipe: SwipeControl::default(),
            scale,
            anchor: None,
            distance: HOVER_DEFAULT_DISTANCE,
            position: Motion3::new(Vec3::ZERO, HOVER_FOLLOW_MS, Easing::EaseOutQuad),
            entrance: Motion::new(1.0, SCALE_IN_DURATION_MS, Easing::EaseOutCubic),
            bounds: Aabb::default(),
            indicators_added: false,
        };
        c.refresh_testing();
        c
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn swirl(&self) -> &SwirlControl {
        &self.swirl
    }
    pub fn swipe(&self) -> &SwipeControl {
        &self.swipe
    }
    pub fn scale(&self) -> &ScaleControl {
        &self.scale
    }

    pub fn set_control_enabled(&mut self, kind: ControlKind, enabled: bool) {
        match kind {
            ControlKind::Swirl => self.swirl.set_enabled(enabled),
            ControlKind::Swipe => self.swipe.set_enabled(enabled),
            ControlKind::Scale => self.scale.set_enabled(enabled),
            ControlKind::Translate => {}
        }
        self.refresh_testing();
    }

    fn refresh_testing(&mut self) {
        let controls: [&dyn GestureControl; 3] = [&self.swirl, &self.swipe, &self.scale];
        self.arbiter.refresh_testing(&controls);
    }

    fn follow_target(&self, camera: &CameraFrame) -> Vec3 {
        camera.position() + camera.forward() * self.distance
    }

    fn current_scale(&self) -> f32 {
        self.scale.value() * self.entrance.value()
    }

    fn model_center(&self) -> Vec3 {
        self.position.value() + self.bounds.center() * self.current_scale()
    }

    fn choose(gesture: Gesture, swirl: bool, swipe: bool, scale: bool) -> Option<ControlKind> {
        match gesture {
            Gesture::OneFingerHorizontal | Gesture::OneFingerVertical if swirl => {
                Some(ControlKind::Swirl)
            }
            Gesture::TwoFingerHorizontal | Gesture::TwoFingerVertical if swipe => {
                Some(ControlKind::Swipe)
            }
            Gesture::Pinch if scale => Some(ControlKind::Scale),
            _ => None,
        }
    }

    fn apply(&mut self, ctx: &RenderContext, scene: &mut dyn ArScene) {
        let transform = self.transform();
        scene.set_root_position(transform.position);
        scene.set_model_rotation(transform.rotation);
        scene.set_model_scale(transform.scale);

        let center = self.model_center();
        let top = center + Vec3::Y * self.bounds.size().y * 0.5 * transform.scale;
        self.scale.update_label(top, ctx.camera.position());
        let label = self.scale.label();
        scene.set_indicator(
            SceneObject::ScaleLabel,
            &IndicatorPose {
                position: label.position,
                rotation: label.rotation,
                scale: 1.0,
                opacity: label.opacity,
                text: Some(label.text.clone()),
            },
        );
    }
}

impl PlacementController for HoverPlacementController {
    fn init(&mut self, anchor: Anchor, ctx: &RenderContext, scene: &mut dyn ArScene) {
        self.deactivate_all();
        let d = anchor.position.distance(ctx.camera.position());
        self.distance = if d.is_finite() && d > 0.0 {
            d.clamp(HOVER_MIN_DISTANCE, HOVER_MAX_DISTANCE)
        } else {
            HOVER_DEFAULT_DISTANCE
        };
        log::info!("[placement] hover at {:.2}m", self.distance);
        self.anchor = Some(anchor);
        self.position.reset(self.follow_target(&ctx.camera));
        self.swirl.reset();
        self.swipe.reset();
        self.scale.reset(1.0);
        self.entrance.reset(1.0);
        self.bounds = scene.model_bounds();
        self.arbiter.deadzone.set_aspect(ctx.aspect());
        if !self.indicators_added {
            scene.add(&[SceneObject::ScaleLabel]);
            self.indicators_added = true;
        }
        scene.set_wall_rotation(Quat::IDENTITY);
        self.apply(ctx, scene);
    }

    fn start_entrance(&mut self) {
        self.entrance.play(SCALE_IN_START, 1.0);
    }

    fn update(&mut self, ctx: &RenderContext, scene: &mut dyn ArScene) {
        if self.anchor.is_none() {
            return;
        }
        let target = self.follow_target(&ctx.camera);
        if target.distance_squared(self.position.end()) > 1e-8 {
            self.position.set_end(target);
        }

        let aspect = ctx.aspect();
        self.arbiter.deadzone.set_aspect(aspect);
        let (swirl_on, swipe_on, scale_on) = (
            self.swirl.is_enabled(),
            self.swipe.is_enabled(),
            self.scale.is_enabled(),
        );
        let input = InputFrame {
            touches: &ctx.touches,
            camera: &ctx.camera,
            aspect,
            model_center: self.model_center(),
        };
        {
            let Self {
                arbiter,
                swirl,
                swipe,
                scale,
                ..
            } = self;
            let mut controls: [&mut dyn GestureControl; 3] = [swirl, swipe, scale];
            arbiter.step(&input, &mut controls, |g| {
                Self::choose(g, swirl_on, swipe_on, scale_on)
            });
        }

        let dt = ctx.delta_ms();
        self.position.update(dt);
        self.swirl.update(dt);
        self.swipe.update(dt);
        self.scale.update(dt);
        self.entrance.update(dt);

        self.apply(ctx, scene);
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.swirl.set_enabled(enabled);
        self.swipe.set_enabled(enabled);
        self.scale.set_enabled(enabled);
        self.refresh_testing();
    }

    fn deactivate_all(&mut self) {
        let Self {
            arbiter,
            swirl,
            swipe,
            scale,
            ..
        } = self;
        let mut controls: [&mut dyn GestureControl; 3] = [swirl, swipe, scale];
        arbiter.release(&mut controls);
    }

    fn transform(&self) -> ModelTransform {
        ModelTransform {
            position: self.position.value(),
            rotation: self.swirl.rotation() * self.swipe.rotation(),
            scale: self.current_scale(),
        }
    }

    fn anchor(&self) -> Option<Anchor> {
        self.anchor
    }

    fn active_control(&self) -> Option<ControlKind> {
        self.arbiter.active()
    }
}
