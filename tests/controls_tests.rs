// Host-side tests for the single-purpose gesture controls.

use ar_core::controls::{
    ControlKind, GestureControl, ScaleControl, SwipeControl, SwirlControl, TranslateControl,
    TranslateState,
};
use ar_core::geometry::{Anchor, CameraFrame, HitPose};
use ar_core::gesture::Gesture;
use ar_core::input::{InputFrame, TouchSample};
use glam::{Vec2, Vec3};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

const EPS: f32 = 1e-4;

fn top_down_camera() -> CameraFrame {
    // Screen right is +X, screen up is -Z.
    CameraFrame::look_at(
        Vec3::new(0.0, 5.0, 0.0),
        Vec3::ZERO,
        Vec3::NEG_Z,
        60f32.to_radians(),
        1.0,
    )
}

fn bottom_up_camera() -> CameraFrame {
    CameraFrame::look_at(
        Vec3::new(0.0, -5.0, 0.0),
        Vec3::ZERO,
        Vec3::NEG_Z,
        60f32.to_radians(),
        1.0,
    )
}

fn oblique_camera() -> CameraFrame {
    CameraFrame::look_at(
        Vec3::new(0.0, 2.0, 2.0),
        Vec3::ZERO,
        Vec3::Y,
        60f32.to_radians(),
        1.0,
    )
}

fn touches(camera: &CameraFrame, coords: &[(f32, f32)]) -> Vec<TouchSample> {
    coords
        .iter()
        .map(|&(x, y)| TouchSample::from_camera(Vec2::new(x, y), camera))
        .collect()
}

fn input<'a>(camera: &'a CameraFrame, touches: &'a [TouchSample]) -> InputFrame<'a> {
    InputFrame {
        touches,
        camera,
        aspect: 1.0,
        model_center: Vec3::ZERO,
    }
}

/// Seed on `from`, move to `to`, and let the motion settle.
fn swirl_drag(swirl: &mut SwirlControl, camera: &CameraFrame, from: (f32, f32), to: (f32, f32)) {
    swirl.activate(Gesture::OneFingerHorizontal);
    let start = touches(camera, &[from]);
    swirl.set_initial_pos(&input(camera, &start));
    let end = touches(camera, &[to]);
    swirl.process(&input(camera, &end));
    swirl.deactivate();
    swirl.update(1000.0);
}

// Clockwise quarter-sweeps around the screen centre, one per cardinal side.
const CLOCKWISE: [((f32, f32), (f32, f32)); 4] = [
    ((0.0, 1.0), (1.0, 1.0)),
    ((1.0, 0.0), (1.0, -1.0)),
    ((0.0, -1.0), (-1.0, -1.0)),
    ((-1.0, 0.0), (-1.0, 1.0)),
];

#[test]
fn swirl_clockwise_drag_turns_negative_yaw() {
    let camera = top_down_camera();
    for (scale, expected) in [(1.0, -FRAC_PI_4), (2.0, -FRAC_PI_2)] {
        for (from, to) in CLOCKWISE {
            let mut swirl = SwirlControl::new(Vec3::Y).with_scale(scale);
            swirl_drag(&mut swirl, &camera, from, to);
            assert!(
                (swirl.angle() - expected).abs() < EPS,
                "scale {scale} {from:?}->{to:?}: {}",
                swirl.angle()
            );
        }
    }
}

#[test]
fn swirl_counter_clockwise_drag_turns_positive_yaw() {
    let camera = top_down_camera();
    for (from, to) in CLOCKWISE {
        let mut swirl = SwirlControl::new(Vec3::Y);
        swirl_drag(&mut swirl, &camera, to, from);
        assert!((swirl.angle() - FRAC_PI_4).abs() < EPS, "{to:?}->{from:?}");
    }
}

#[test]
fn swirl_from_below_flips_direction() {
    let camera = bottom_up_camera();
    let mut swirl = SwirlControl::new(Vec3::Y);
    swirl_drag(&mut swirl, &camera, (0.0, 1.0), (1.0, 1.0));
    assert!((swirl.angle() - FRAC_PI_4).abs() < EPS);
}

#[test]
fn swirl_rotation_is_about_its_axis() {
    let camera = top_down_camera();
    let mut swirl = SwirlControl::new(Vec3::Y);
    swirl_drag(&mut swirl, &camera, (0.0, 1.0), (1.0, 1.0));
    let (axis, angle) = swirl.rotation().to_axis_angle();
    // glam normalizes to a positive angle, so the axis flips instead.
    assert!((axis.dot(Vec3::Y).abs() - 1.0).abs() < EPS);
    assert!((angle - FRAC_PI_4).abs() < EPS);
}

#[test]
fn swirl_accumulates_across_drags() {
    let camera = top_down_camera();
    let mut swirl = SwirlControl::new(Vec3::Y);
    swirl_drag(&mut swirl, &camera, (0.0, 1.0), (1.0, 1.0));
    swirl_drag(&mut swirl, &camera, (1.0, 0.0), (1.0, -1.0));
    assert!((swirl.angle() + FRAC_PI_2).abs() < EPS);
}

#[test]
fn swirl_ignores_input_while_inactive_or_disabled() {
    let camera = top_down_camera();
    let moved = touches(&camera, &[(1.0, 1.0)]);

    let mut swirl = SwirlControl::new(Vec3::Y);
    swirl.process(&input(&camera, &moved));
    swirl.update(1000.0);
    assert_eq!(swirl.angle(), 0.0);

    swirl.set_enabled(false);
    swirl.activate(Gesture::OneFingerHorizontal);
    assert!(!swirl.is_active());
}

#[test]
fn swirl_skips_finger_on_the_centre() {
    let camera = top_down_camera();
    let mut swirl = SwirlControl::new(Vec3::Y);
    swirl.activate(Gesture::OneFingerHorizontal);
    let centre = touches(&camera, &[(0.0, 0.0)]);
    swirl.set_initial_pos(&input(&camera, &centre));
    let moved = touches(&camera, &[(1.0, 1.0)]);
    swirl.process(&input(&camera, &moved));
    swirl.update(1000.0);
    assert_eq!(swirl.angle(), 0.0);
}

fn floor_hit(x: f32, y: f32, z: f32) -> HitPose {
    HitPose::from_position_normal(Vec3::new(x, y, z), Vec3::Y)
}

/// Translate on a floor anchor at the origin, grabbed through the middle of
/// the screen.
fn grabbed_translate(camera: &CameraFrame) -> TranslateControl {
    let mut translate = TranslateControl::new(&Anchor::floor(Vec3::ZERO));
    translate.activate(Gesture::OneFingerHorizontal);
    let grab = touches(camera, &[(0.0, 0.0)]);
    translate.set_initial_pos(&input(camera, &grab));
    translate
}

fn drag_with_hit(translate: &mut TranslateControl, camera: &CameraFrame, hit: Option<HitPose>) {
    let t = [TouchSample::from_camera(Vec2::ZERO, camera).with_hit(hit)];
    translate.process(&input(camera, &t));
}

#[test]
fn small_rises_do_not_move_the_drag_plane() {
    let camera = oblique_camera();
    let mut translate = grabbed_translate(&camera);
    for y in [0.02, 0.05, 0.09] {
        drag_with_hit(&mut translate, &camera, Some(floor_hit(0.3, y, 0.0)));
        assert!(translate.plane().offset().abs() < EPS, "rise {y}");
    }
    translate.update(1000.0);
    let p = translate.position();
    assert!((p - Vec3::new(0.3, 0.0, 0.0)).length() < 1e-3, "{p:?}");
}

#[test]
fn rise_of_ten_centimetres_raises_the_drag_plane() {
    let camera = oblique_camera();
    let mut translate = grabbed_translate(&camera);
    drag_with_hit(&mut translate, &camera, Some(floor_hit(0.3, 0.12, 0.0)));
    assert!((translate.plane().offset() - 0.12).abs() < EPS);

    // Lower samples afterwards never sink it again.
    drag_with_hit(&mut translate, &camera, Some(floor_hit(0.3, 0.05, 0.0)));
    assert!((translate.plane().offset() - 0.12).abs() < EPS);
    drag_with_hit(&mut translate, &camera, Some(floor_hit(0.3, 0.0, 0.0)));
    assert!((translate.plane().offset() - 0.12).abs() < EPS);

    translate.update(1000.0);
    assert!((translate.position().y - 0.12).abs() < 1e-3);
}

#[test]
fn unconfident_hits_fall_back_to_the_finger_ray() {
    let camera = oblique_camera();
    let mut translate = grabbed_translate(&camera);
    let tilted = HitPose::from_position_normal(
        Vec3::new(0.5, 0.5, 0.0),
        Vec3::new(1.0, 1.0, 0.0).normalize(),
    );
    assert!(!tilted.is_floor());
    drag_with_hit(&mut translate, &camera, Some(tilted));
    assert!(translate.plane().offset().abs() < EPS);

    // The centre ray meets the floor at the origin, which is where we grabbed.
    translate.update(1000.0);
    assert!(translate.position().length() < 1e-3);
}

#[test]
fn missing_hits_still_drag_along_the_plane() {
    let camera = oblique_camera();
    let mut translate = grabbed_translate(&camera);
    let t = touches(&camera, &[(0.5, 0.0)]);
    translate.process(&input(&camera, &t));
    translate.update(1000.0);
    let p = translate.position();
    assert!(p.x > 0.1, "{p:?}");
    assert!(p.y.abs() < EPS);
}

#[test]
fn floor_translate_lifts_then_bounces_back() {
    let camera = oblique_camera();
    let mut translate = grabbed_translate(&camera);
    assert_eq!(translate.state(), TranslateState::Translating);
    translate.update(1000.0);
    assert!((translate.hover_height() - 0.05).abs() < EPS);
    assert!((translate.world_position().y - 0.05).abs() < EPS);

    translate.deactivate();
    assert_eq!(translate.state(), TranslateState::Bouncing);
    translate.update(300.0);
    assert_eq!(translate.state(), TranslateState::Bouncing);
    translate.update(400.0);
    assert_eq!(translate.state(), TranslateState::Waiting);
    assert_eq!(translate.hover_height(), 0.0);
}

#[test]
fn wall_translate_skips_the_bounce() {
    let hit = HitPose::from_position_normal(Vec3::new(0.0, 1.0, -2.0), Vec3::Z);
    let anchor = Anchor::from_hit(&hit, true);
    let mut translate = TranslateControl::new(&anchor);
    assert!(translate.is_vertical());

    translate.activate(Gesture::OneFingerVertical);
    assert_eq!(translate.state(), TranslateState::Translating);
    translate.update(1000.0);
    assert_eq!(translate.hover_height(), 0.0);

    translate.deactivate();
    assert_eq!(translate.state(), TranslateState::Waiting);
}

#[test]
fn scale_follows_pinch_and_clamps() {
    let camera = oblique_camera();
    let mut scale = ScaleControl::new(0.5, 2.0);
    assert_eq!(scale.kind(), ControlKind::Scale);
    scale.activate(Gesture::Pinch);

    let start = touches(&camera, &[(-0.1, 0.0), (0.1, 0.0)]);
    scale.set_initial_pos(&input(&camera, &start));
    let wide = touches(&camera, &[(-0.5, 0.0), (0.5, 0.0)]);
    scale.process(&input(&camera, &wide));
    scale.update(1000.0);
    assert!((scale.value() - 2.0).abs() < EPS);

    scale.update_label(Vec3::ONE, Vec3::new(0.0, 1.0, 3.0));
    assert_eq!(scale.label().text, "200%");
    assert!((scale.label().opacity - 1.0).abs() < EPS);

    // Re-grip wide, then pinch right in.
    let regrip = touches(&camera, &[(-0.9, 0.0), (0.9, 0.0)]);
    scale.set_initial_pos(&input(&camera, &regrip));
    let narrow = touches(&camera, &[(-0.01, 0.0), (0.01, 0.0)]);
    scale.process(&input(&camera, &narrow));
    scale.update(1000.0);
    assert!((scale.value() - 0.5).abs() < EPS);
    scale.update_label(Vec3::ONE, Vec3::new(0.0, 1.0, 3.0));
    assert_eq!(scale.label().text, "50%");
}

#[test]
fn scale_small_pinch_applies_sensitivity() {
    let camera = oblique_camera();
    let mut scale = ScaleControl::default();
    scale.activate(Gesture::Pinch);
    let start = touches(&camera, &[(-0.1, 0.0), (0.1, 0.0)]);
    scale.set_initial_pos(&input(&camera, &start));
    let wider = touches(&camera, &[(-0.2, 0.0), (0.2, 0.0)]);
    scale.process(&input(&camera, &wider));
    scale.update(1000.0);
    // 0.2 of extra spread at 1.5x sensitivity.
    assert!((scale.value() - 1.3).abs() < EPS);
}

#[test]
fn scale_label_fades_after_release() {
    let mut scale = ScaleControl::default();
    scale.activate(Gesture::Pinch);
    scale.update(1000.0);
    assert!((scale.label().opacity - 1.0).abs() < EPS);
    scale.deactivate();
    scale.update(1000.0);
    assert_eq!(scale.label().opacity, 0.0);
}

#[test]
fn disabled_scale_never_activates() {
    let mut scale = ScaleControl::default();
    scale.set_enabled(false);
    scale.activate(Gesture::Pinch);
    assert!(!scale.is_active());
    assert!(!scale.is_enabled());
}

#[test]
fn swipe_horizontal_turns_about_vertical_axis() {
    let camera = top_down_camera();
    let mut swipe = SwipeControl::default();
    swipe.activate(Gesture::TwoFingerHorizontal);
    assert!(swipe.is_active());
    let start = touches(&camera, &[(-0.3, 0.5), (-0.1, 0.5)]);
    swipe.set_initial_pos(&input(&camera, &start));
    let moved = touches(&camera, &[(0.2, 0.5), (0.4, 0.5)]);
    swipe.process(&input(&camera, &moved));
    swipe.update(1000.0);
    assert!((swipe.yaw() - 0.5 * PI).abs() < EPS);
    assert_eq!(swipe.pitch(), 0.0);
}

#[test]
fn swipe_rejects_one_finger_gestures() {
    let mut swipe = SwipeControl::default();
    swipe.activate(Gesture::OneFingerHorizontal);
    assert!(!swipe.is_active());
    assert!(!swipe.accepts(Gesture::Pinch));
}
