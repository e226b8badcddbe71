use super::{ArbiterStep, GestureArbiter, ModelTransform, PlacementController, PlacementOptions};
use crate::constants::{
    SCALE_IN_DURATION_MS, SCALE_IN_START, SHADOW_OPACITY, TRANSLATE_HOVER_LIFT,
};
use crate::controls::{ControlKind, GestureControl, ScaleControl, SwirlControl, TranslateControl};
use crate::easing::Easing;
use crate::geometry::{Aabb, Anchor, Ray};
use crate::gesture::Gesture;
use crate::input::InputFrame;
use crate::motion::Motion;
use crate::scene::{ArScene, IndicatorPose, RenderContext, SceneObject};
use glam::{Mat4, Quat, Vec3};

/// Placement rooted on a floor (or wall) anchor.
///
/// One finger either drags the model (when the touch started over it) or
/// swirls it about the surface normal; a pinch scales it.
#[derive(Debug, Clone)]
pub struct FloorPlacementController {
    arbiter: GestureArbiter,
    swirl: SwirlControl,
    scale: ScaleControl,
    translate: TranslateControl,
    anchor: Option<Anchor>,
    entrance: Motion,
    bounds: Aabb,
    touch_on_model: bool,
    indicators_added: bool,
}

impl Default for FloorPlacementController {
    fn default() -> Self {
        Self::new(&PlacementOptions::default())
    }
}

impl FloorPlacementController {
    pub fn new(options: &PlacementOptions) -> Self {
        let mut scale = ScaleControl::new(options.min_scale, options.max_scale);
        scale.set_enabled(options.scale_enabled);
        let mut c = Self {
            arbiter: GestureArbiter::new(options.deadzone_size),
            swirl: SwirlControl::new(Vec3::Y).with_scale(options.swirl_scale),
            scale,
            translate: TranslateControl::default(),
            anchor: None,
            entrance: Motion::new(1.0, SCALE_IN_DURATION_MS, Easing::EaseOutCubic),
            bounds: Aabb::default(),
            touch_on_model: false,
            indicators_added: false,
        };
        c.refresh_testing();
        c
    }

    pub fn swirl(&self) -> &SwirlControl {
        &self.swirl
    }
    pub fn scale(&self) -> &ScaleControl {
        &self.scale
    }
    pub fn translate(&self) -> &TranslateControl {
        &self.translate
    }

    pub fn swirl_mut(&mut self) -> &mut SwirlControl {
        &mut self.swirl
    }

    /// Toggle one control and keep the deadzone's tested gestures in sync.
    pub fn set_control_enabled(&mut self, kind: ControlKind, enabled: bool) {
        match kind {
            ControlKind::Swirl => self.swirl.set_enabled(enabled),
            ControlKind::Scale => self.scale.set_enabled(enabled),
            ControlKind::Translate => self.translate.set_enabled(enabled),
            ControlKind::Swipe => {}
        }
        self.refresh_testing();
    }

    /// Whether the current gesture session began with a finger over the model.
    pub fn touch_started_on_model(&self) -> bool {
        self.touch_on_model
    }

    fn refresh_testing(&mut self) {
        let controls: [&dyn GestureControl; 3] = [&self.swirl, &self.scale, &self.translate];
        self.arbiter.refresh_testing(&controls);
    }

    fn current_scale(&self) -> f32 {
        self.scale.value() * self.entrance.value()
    }

    fn anchor_rotation(&self) -> Quat {
        self.anchor.map(|a| a.rotation).unwrap_or_default()
    }

    /// World orientation of the model: the swirl applied under the anchor.
    fn world_rotation(&self) -> Quat {
        self.anchor_rotation() * self.swirl.rotation()
    }

    fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.current_scale()),
            self.world_rotation(),
            self.translate.world_position(),
        )
    }

    fn world_bounds(&self) -> Aabb {
        self.bounds.transformed(&self.model_matrix())
    }

    fn model_center(&self) -> Vec3 {
        self.model_matrix().transform_point3(self.bounds.center())
    }

    /// Tests the ray against the model's own box, so a spun model is hit
    /// where its mesh actually is.
    fn hits_model(&self, ray: &Ray) -> bool {
        let to_local = self.model_matrix().inverse();
        let local = Ray::new(
            to_local.transform_point3(ray.origin),
            to_local.transform_vector3(ray.direction),
        );
        self.bounds.intersect(&local).is_some()
    }

    fn choose(
        gesture: Gesture,
        on_model: bool,
        swirl_enabled: bool,
        translate_enabled: bool,
        scale_enabled: bool,
    ) -> Option<ControlKind> {
        match gesture {
            Gesture::OneFingerHorizontal | Gesture::OneFingerVertical => {
                if on_model && translate_enabled {
                    Some(ControlKind::Translate)
                } else if swirl_enabled {
                    Some(ControlKind::Swirl)
                } else if translate_enabled {
                    Some(ControlKind::Translate)
                } else {
                    None
                }
            }
            Gesture::Pinch if scale_enabled => Some(ControlKind::Scale),
            _ => None,
        }
    }

    fn apply(&mut self, ctx: &RenderContext, scene: &mut dyn ArScene) {
        let transform = self.transform();
        scene.set_root_position(transform.position);
        scene.set_model_rotation(transform.rotation);
        scene.set_model_scale(transform.scale);

        let vertical = self.translate.is_vertical();
        let lift = (self.translate.hover_height() / TRANSLATE_HOVER_LIFT).clamp(0.0, 1.0);
        let footprint = self.bounds.size();
        let shadow = IndicatorPose {
            position: self.translate.position(),
            rotation: self.world_rotation(),
            scale: footprint.x.max(footprint.z) * transform.scale,
            opacity: if vertical {
                0.0
            } else {
                SHADOW_OPACITY * (1.0 - 0.5 * lift)
            },
            text: None,
        };
        scene.set_indicator(SceneObject::Shadow, &shadow);

        let top = self.world_bounds().max.y;
        let center = self.model_center();
        self.scale
            .update_label(Vec3::new(center.x, top, center.z), ctx.camera.position());
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

impl PlacementController for FloorPlacementController {
    fn init(&mut self, anchor: Anchor, ctx: &RenderContext, scene: &mut dyn ArScene) {
        log::info!(
            "[placement] floor anchor at ({:.2},{:.2},{:.2}) vertical={}",
            anchor.position.x,
            anchor.position.y,
            anchor.position.z,
            anchor.vertical
        );
        self.deactivate_all();
        self.anchor = Some(anchor);
        self.translate.reset(&anchor);
        // On a wall the model spins about the wall normal, which is local +Z
        // under the wall rotation.
        self.swirl
            .set_axis(if anchor.vertical { Vec3::Z } else { Vec3::Y });
        self.swirl.set_frame(anchor.rotation);
        self.swirl.reset();
        self.scale.reset(1.0);
        self.entrance.reset(1.0);
        self.bounds = scene.model_bounds();
        self.arbiter.deadzone.set_aspect(ctx.aspect());
        if !self.indicators_added {
            scene.add(&[SceneObject::Shadow, SceneObject::ScaleLabel]);
            self.indicators_added = true;
        }
        scene.set_wall_rotation(anchor.rotation);
        self.apply(ctx, scene);
    }

    fn start_entrance(&mut self) {
        self.entrance.play(SCALE_IN_START, 1.0);
    }

    fn update(&mut self, ctx: &RenderContext, scene: &mut dyn ArScene) {
        if self.anchor.is_none() {
            return;
        }
        let aspect = ctx.aspect();
        self.arbiter.deadzone.set_aspect(aspect);

        let on_model = self.touch_on_model;
        let swirl_enabled = self.swirl.is_enabled();
        let translate_enabled = self.translate.is_enabled();
        let scale_enabled = self.scale.is_enabled();
        let model_center = self.model_center();
        let input = InputFrame {
            touches: &ctx.touches,
            camera: &ctx.camera,
            aspect,
            model_center,
        };

        let step = {
            let Self {
                arbiter,
                swirl,
                scale,
                translate,
                ..
            } = self;
            let mut controls: [&mut dyn GestureControl; 3] = [translate, swirl, scale];
            arbiter.step(&input, &mut controls, |g| {
                Self::choose(g, on_model, swirl_enabled, translate_enabled, scale_enabled)
            })
        };
        if step == ArbiterStep::Started {
            self.touch_on_model = ctx
                .touches
                .first()
                .map(|t| self.hits_model(&t.ray))
                .unwrap_or(false);
        }

        let dt = ctx.delta_ms();
        self.swirl.update(dt);
        self.scale.update(dt);
        self.translate.update(dt);
        self.entrance.update(dt);

        self.apply(ctx, scene);
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.swirl.set_enabled(enabled);
        self.translate.set_enabled(enabled);
        self.scale.set_enabled(enabled);
        self.refresh_testing();
    }

    fn deactivate_all(&mut self) {
        let Self {
            arbiter,
            swirl,
            scale,
            translate,
            ..
        } = self;
        let mut controls: [&mut dyn GestureControl; 3] = [translate, swirl, scale];
        arbiter.release(&mut controls);
        self.touch_on_model = false;
    }

    fn transform(&self) -> ModelTransform {
        ModelTransform {
            position: self.translate.world_position(),
            rotation: self.swirl.rotation(),
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
