// Host-side tests for the floor and hover placement controllers.

mod common;

use ar_core::controls::{ControlKind, GestureControl};
use ar_core::geometry::{Aabb, Anchor, CameraFrame, HitPose};
use ar_core::placement::{
    FloorPlacementController, HoverPlacementController, PlacementController, PlacementOptions,
};
use ar_core::scene::SceneObject;
use common::{context, room_camera, FakeScene};
use glam::{Vec2, Vec3};

fn placed_floor(scene: &mut FakeScene) -> FloorPlacementController {
    let mut ctr = FloorPlacementController::default();
    ctr.init(Anchor::floor(Vec3::ZERO), &context(room_camera(), &[]), scene);
    ctr
}

fn run(ctr: &mut dyn PlacementController, scene: &mut FakeScene, camera: CameraFrame, coords: &[Vec2]) {
    ctr.update(&context(camera, coords), scene);
}

/// Lift every finger and let all motions settle.
fn settle(ctr: &mut dyn PlacementController, scene: &mut FakeScene, camera: CameraFrame) {
    for _ in 0..100 {
        run(ctr, scene, camera, &[]);
    }
}

#[test]
fn drag_off_model_rotates_without_translating() {
    let mut scene = FakeScene::new();
    let mut ctr = placed_floor(&mut scene);
    let camera = room_camera();

    // Top right of the screen is well clear of the model.
    let path = [0.80, 0.82, 0.86, 0.90].map(|x| Vec2::new(x, 0.8));
    for (i, p) in path.iter().enumerate() {
        run(&mut ctr, &mut scene, camera, &[*p]);
        if i == 0 {
            assert!(!ctr.touch_started_on_model());
        }
    }
    assert_eq!(ctr.active_control(), Some(ControlKind::Swirl));

    settle(&mut ctr, &mut scene, camera);
    assert_eq!(ctr.active_control(), None);

    let t = ctr.transform();
    let (yaw, _, _) = t.rotation.to_euler(glam::EulerRot::YXZ);
    assert!(yaw.abs() > 1e-4, "yaw {yaw}");
    // Finger swept clockwise above the model as seen from above.
    assert!(ctr.swirl().angle() < 0.0);
    assert_eq!(t.position, Vec3::ZERO);
    assert_eq!(scene.snapshot().root, Vec3::ZERO);
}

#[test]
fn small_drags_inside_deadzone_change_nothing() {
    let mut scene = FakeScene::new();
    let mut ctr = placed_floor(&mut scene);
    let camera = room_camera();
    for x in [0.80, 0.81, 0.82, 0.83] {
        run(&mut ctr, &mut scene, camera, &[Vec2::new(x, 0.8)]);
    }
    assert_eq!(ctr.active_control(), None);
    settle(&mut ctr, &mut scene, camera);
    assert_eq!(ctr.transform().rotation, glam::Quat::IDENTITY);
}

#[test]
fn drag_starting_on_model_translates() {
    let mut scene = FakeScene::new();
    let mut ctr = placed_floor(&mut scene);
    let camera = room_camera();
    let on_model = camera.project(Vec3::new(0.0, 0.5, 0.0)).unwrap();

    for dx in [0.0, 0.02, 0.08, 0.15] {
        run(&mut ctr, &mut scene, camera, &[on_model + Vec2::new(dx, 0.0)]);
    }
    assert!(ctr.touch_started_on_model());
    assert_eq!(ctr.active_control(), Some(ControlKind::Translate));

    settle(&mut ctr, &mut scene, camera);
    let t = ctr.transform();
    assert!(t.position.x > 0.05, "{:?}", t.position);
    assert!(t.position.y.abs() < 1e-3);
    assert_eq!(t.rotation, glam::Quat::IDENTITY);
}

#[test]
fn confident_raised_hit_lifts_dragged_model() {
    let mut scene = FakeScene::new();
    let mut ctr = placed_floor(&mut scene);
    let camera = room_camera();
    let on_model = camera.project(Vec3::new(0.0, 0.5, 0.0)).unwrap();
    let table = HitPose::from_position_normal(Vec3::new(0.4, 0.7, 0.0), Vec3::Y);

    for dx in [0.0, 0.02, 0.08] {
        run(&mut ctr, &mut scene, camera, &[on_model + Vec2::new(dx, 0.0)]);
    }
    let mut ctx = context(camera, &[on_model + Vec2::new(0.2, 0.0)]);
    ctx.touches[0].hit = Some(table);
    ctr.update(&ctx, &mut scene);
    assert!((ctr.translate().plane().offset() - 0.7).abs() < 1e-4);

    settle(&mut ctr, &mut scene, camera);
    assert!((ctr.transform().position.y - 0.7).abs() < 1e-3);
}

#[test]
fn extra_finger_after_commit_releases_controls() {
    let mut scene = FakeScene::new();
    let mut ctr = placed_floor(&mut scene);
    let camera = room_camera();
    for x in [0.80, 0.82, 0.86] {
        run(&mut ctr, &mut scene, camera, &[Vec2::new(x, 0.8)]);
    }
    assert_eq!(ctr.active_control(), Some(ControlKind::Swirl));
    assert!(ctr.swirl().is_active());

    run(
        &mut ctr,
        &mut scene,
        camera,
        &[Vec2::new(0.88, 0.8), Vec2::new(-0.5, -0.5)],
    );
    assert_eq!(ctr.active_control(), None);
    assert!(!ctr.swirl().is_active());
}

#[test]
fn pinch_scales_model_and_shows_label() {
    let mut scene = FakeScene::new();
    let mut ctr = placed_floor(&mut scene);
    let camera = room_camera();
    for spread in [0.2, 0.22, 0.3, 0.5] {
        run(
            &mut ctr,
            &mut scene,
            camera,
            &[Vec2::new(-spread, -0.6), Vec2::new(spread, -0.6)],
        );
    }
    assert_eq!(ctr.active_control(), Some(ControlKind::Scale));
    for _ in 0..30 {
        run(
            &mut ctr,
            &mut scene,
            camera,
            &[Vec2::new(-0.5, -0.6), Vec2::new(0.5, -0.6)],
        );
    }
    assert!(ctr.transform().scale > 1.2);
    let label = scene.snapshot().indicator(SceneObject::ScaleLabel).cloned().unwrap();
    assert!(label.opacity > 0.5);
    assert_ne!(label.text.as_deref(), Some("100%"));

    settle(&mut ctr, &mut scene, camera);
    let label = scene.snapshot().indicator(SceneObject::ScaleLabel).cloned().unwrap();
    assert_eq!(label.opacity, 0.0);
}

#[test]
fn fixed_scale_ignores_pinch() {
    let options = PlacementOptions {
        scale_enabled: false,
        ..PlacementOptions::default()
    };
    let mut scene = FakeScene::new();
    let mut ctr = FloorPlacementController::new(&options);
    let camera = room_camera();
    ctr.init(Anchor::floor(Vec3::ZERO), &context(camera, &[]), &mut scene);
    for spread in [0.2, 0.3, 0.5, 0.8] {
        run(
            &mut ctr,
            &mut scene,
            camera,
            &[Vec2::new(-spread, -0.6), Vec2::new(spread, -0.6)],
        );
    }
    assert_eq!(ctr.active_control(), None);
    settle(&mut ctr, &mut scene, camera);
    assert_eq!(ctr.transform().scale, 1.0);
}

#[test]
fn entrance_scales_in_from_small() {
    let mut scene = FakeScene::new();
    let mut ctr = placed_floor(&mut scene);
    let camera = room_camera();
    ctr.start_entrance();
    assert!(ctr.transform().scale < 0.05);
    run(&mut ctr, &mut scene, camera, &[]);
    let early = ctr.transform().scale;
    assert!(early > 0.01 && early < 1.0);
    settle(&mut ctr, &mut scene, camera);
    assert!((ctr.transform().scale - 1.0).abs() < 1e-6);
}

#[test]
fn indicators_are_added_once() {
    let mut scene = FakeScene::new();
    let mut ctr = placed_floor(&mut scene);
    ctr.init(
        Anchor::floor(Vec3::new(1.0, 0.0, 0.0)),
        &context(room_camera(), &[]),
        &mut scene,
    );
    let log = scene.snapshot();
    assert_eq!(log.added, vec![SceneObject::Shadow, SceneObject::ScaleLabel]);
    assert_eq!(log.root, Vec3::new(1.0, 0.0, 0.0));
    assert!(log.indicator(SceneObject::Shadow).unwrap().is_visible());
}

#[test]
fn wall_anchor_faces_out_and_hides_shadow() {
    let mut scene = FakeScene::new();
    let mut ctr = FloorPlacementController::default();
    let hit = HitPose::from_position_normal(Vec3::new(0.0, 1.0, -2.0), Vec3::X);
    let anchor = Anchor::from_hit(&hit, true);
    ctr.init(anchor, &context(room_camera(), &[]), &mut scene);

    assert_eq!(ctr.swirl().axis(), Vec3::Z);
    assert!((anchor.normal() - Vec3::X).length() < 1e-5);
    let log = scene.snapshot();
    assert_eq!(log.wall, anchor.rotation);
    assert!(!log.indicator(SceneObject::Shadow).unwrap().is_visible());
}

#[test]
fn wall_swirl_turns_clockwise_with_the_finger_on_every_wall() {
    for normal in [Vec3::Z, Vec3::NEG_Z, Vec3::X, Vec3::NEG_X] {
        let mut scene = FakeScene::new();
        let mut ctr = FloorPlacementController::default();
        let spot = Vec3::new(0.0, 1.0, 0.0);
        let hit = HitPose::from_position_normal(spot, normal);
        let anchor = Anchor::from_hit(&hit, true);
        // Facing the wall from 5 m out.
        let camera = CameraFrame::look_at(spot + normal * 5.0, spot, Vec3::Y, 45f32.to_radians(), 1.0);
        ctr.init(anchor, &context(camera, &[]), &mut scene);
        assert!((ctr.swirl().world_axis() - normal).length() < 1e-5, "{normal}");

        // Rightwards above the model: clockwise on screen.
        for x in [-0.3, -0.28, -0.2, -0.1, 0.0, 0.1, 0.2] {
            run(&mut ctr, &mut scene, camera, &[Vec2::new(x, 0.9)]);
        }
        assert!(!ctr.touch_started_on_model(), "{normal}");
        assert_eq!(ctr.active_control(), Some(ControlKind::Swirl), "{normal}");
        settle(&mut ctr, &mut scene, camera);

        let angle = ctr.swirl().angle();
        assert!(angle < -0.1, "{normal}: {angle}");
        // The same sweep gives the same turn whichever way the wall faces.
        let (axis, world_angle) = (anchor.rotation * ctr.transform().rotation * anchor.rotation.inverse())
            .to_axis_angle();
        assert!((axis * world_angle - normal * angle).length() < 1e-3, "{normal}");
    }
}

#[test]
fn touch_on_model_follows_the_spun_model() {
    let mut scene = FakeScene::new();
    // A 2 m bar lying along X.
    scene.log.borrow_mut().bounds =
        Aabb::from_center_half_extents(Vec3::new(0.0, 0.1, 0.0), Vec3::new(1.0, 0.1, 0.1));
    let mut ctr = placed_floor(&mut scene);
    let camera = room_camera();
    ctr.swirl_mut().set_angle(-std::f32::consts::FRAC_PI_2);

    // Now it lies along Z, so its near end is on the mesh.
    let near_end = camera.project(Vec3::new(0.0, 0.1, 0.8)).unwrap();
    run(&mut ctr, &mut scene, camera, &[near_end]);
    assert!(ctr.touch_started_on_model());
    settle(&mut ctr, &mut scene, camera);

    // Where the unspun bar used to be is now bare floor.
    let old_end = camera.project(Vec3::new(0.8, 0.1, 0.0)).unwrap();
    run(&mut ctr, &mut scene, camera, &[old_end]);
    assert!(!ctr.touch_started_on_model());
}

#[test]
fn disabling_releases_and_blocks_gestures() {
    let mut scene = FakeScene::new();
    let mut ctr = placed_floor(&mut scene);
    let camera = room_camera();
    for x in [0.80, 0.82, 0.86] {
        run(&mut ctr, &mut scene, camera, &[Vec2::new(x, 0.8)]);
    }
    ctr.set_enabled(false);
    ctr.deactivate_all();
    assert_eq!(ctr.active_control(), None);
    for x in [0.80, 0.85, 0.95, 1.0] {
        run(&mut ctr, &mut scene, camera, &[Vec2::new(x, 0.8)]);
    }
    assert_eq!(ctr.active_control(), None);
}

fn forward_camera(eye: Vec3) -> CameraFrame {
    CameraFrame::look_at(eye, eye + Vec3::NEG_Z, Vec3::Y, 45f32.to_radians(), 1.0)
}

#[test]
fn hover_distance_is_clamped() {
    let eye = Vec3::new(0.0, 1.6, 0.0);
    let camera = forward_camera(eye);
    let mut scene = FakeScene::new();

    let mut far = HoverPlacementController::default();
    far.init(Anchor::floor(eye + Vec3::new(0.0, 0.0, -10.0)), &context(camera, &[]), &mut scene);
    assert!((far.distance() - 5.0).abs() < 1e-5);
    assert!((far.transform().position - Vec3::new(0.0, 1.6, -5.0)).length() < 1e-4);

    let mut near = HoverPlacementController::default();
    near.init(Anchor::floor(eye), &context(camera, &[]), &mut scene);
    assert!((near.distance() - 1.5).abs() < 1e-5);

    let mut close = HoverPlacementController::default();
    close.init(Anchor::floor(eye + Vec3::new(0.0, 0.0, -0.2)), &context(camera, &[]), &mut scene);
    assert!((close.distance() - 0.5).abs() < 1e-5);
}

#[test]
fn hover_follows_the_camera() {
    let eye = Vec3::new(0.0, 1.6, 0.0);
    let mut scene = FakeScene::new();
    let mut ctr = HoverPlacementController::default();
    ctr.init(
        Anchor::floor(eye + Vec3::new(0.0, 0.0, -2.0)),
        &context(forward_camera(eye), &[]),
        &mut scene,
    );

    let moved = forward_camera(Vec3::new(1.0, 1.6, 0.0));
    settle(&mut ctr, &mut scene, moved);
    let p = ctr.transform().position;
    assert!((p - Vec3::new(1.0, 1.6, -2.0)).length() < 1e-3, "{p:?}");
    assert_eq!(scene.snapshot().added, vec![SceneObject::ScaleLabel]);
}

#[test]
fn hover_two_finger_swipe_tumbles() {
    let eye = Vec3::new(0.0, 1.6, 0.0);
    let camera = forward_camera(eye);
    let mut scene = FakeScene::new();
    let mut ctr = HoverPlacementController::default();
    ctr.init(Anchor::floor(eye + Vec3::new(0.0, 0.0, -2.0)), &context(camera, &[]), &mut scene);

    for dx in [0.0, 0.02, 0.08, 0.2] {
        run(
            &mut ctr,
            &mut scene,
            camera,
            &[Vec2::new(-0.3 + dx, -0.5), Vec2::new(-0.1 + dx, -0.5)],
        );
    }
    assert_eq!(ctr.active_control(), Some(ControlKind::Swipe));
    settle(&mut ctr, &mut scene, camera);
    assert!(ctr.swipe().yaw() > 0.1);
    assert_eq!(ctr.swirl().angle(), 0.0);
}

#[test]
fn hover_one_finger_swirls() {
    let eye = Vec3::new(0.0, 1.6, 0.0);
    let camera = forward_camera(eye);
    let mut scene = FakeScene::new();
    let mut ctr = HoverPlacementController::default();
    ctr.init(Anchor::floor(eye + Vec3::new(0.0, 0.0, -2.0)), &context(camera, &[]), &mut scene);

    for x in [0.5, 0.52, 0.58, 0.7] {
        run(&mut ctr, &mut scene, camera, &[Vec2::new(x, 0.6)]);
    }
    assert_eq!(ctr.active_control(), Some(ControlKind::Swirl));
    settle(&mut ctr, &mut scene, camera);
    assert!(ctr.swirl().angle().abs() > 1e-4);
}
