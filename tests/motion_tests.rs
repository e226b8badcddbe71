// Host-side tests for motions and easing curves.

use ar_core::easing::Easing;
use ar_core::motion::{Motion, Motion3, Range};
use glam::Vec3;

fn settle(m: &mut Motion) {
    for _ in 0..100 {
        m.update(16.0);
        if !m.is_active() {
            break;
        }
    }
}

#[test]
fn end_delta_lands_on_clamped_target() {
    let range = Range::new(-1.0, 2.0);
    for delta in [-5.0, -1.5, -0.25, 0.0, 0.4, 1.0, 3.0, 100.0] {
        let mut m = Motion::new(0.5, 100.0, Easing::EaseOutQuad).with_range(range);
        m.set_end_delta(delta);
        settle(&mut m);
        assert!(m.progress() >= 1.0);
        let expected = (0.5f32 + delta).clamp(range.min, range.max);
        assert!(
            (m.value() - expected).abs() < 1e-6,
            "delta {delta}: got {} expected {expected}",
            m.value()
        );
    }
}

#[test]
fn end_deltas_accumulate_from_pending_end() {
    let mut m = Motion::new(0.0, 100.0, Easing::Linear);
    m.set_end_delta(1.0);
    m.update(50.0);
    m.set_end_delta(1.0);
    assert!((m.end() - 2.0).abs() < 1e-6);
    settle(&mut m);
    assert!((m.value() - 2.0).abs() < 1e-6);
}

#[test]
fn update_reports_value_change() {
    let mut m = Motion::new(0.0, 100.0, Easing::Linear);
    m.set_end(1.0);
    let d1 = m.update(25.0);
    let d2 = m.update(25.0);
    assert!((d1 - 0.25).abs() < 1e-5);
    assert!((d2 - 0.25).abs() < 1e-5);
    assert!((m.value() - 0.5).abs() < 1e-5);
}

#[test]
fn idle_motion_does_not_move() {
    let mut m = Motion::new(3.0, 100.0, Easing::EaseOutCubic);
    assert!(!m.is_active());
    assert_eq!(m.update(16.0), 0.0);
    assert_eq!(m.value(), 3.0);
}

#[test]
fn zero_duration_jumps_in_one_update() {
    let mut m = Motion::new(0.0, 0.0, Easing::EaseOutQuad);
    m.set_end(4.0);
    m.update(0.0);
    assert_eq!(m.value(), 4.0);
    assert!(!m.is_active());
}

#[test]
fn reset_snaps_and_clamps() {
    let mut m = Motion::new(0.0, 100.0, Easing::Linear).with_range(Range::new(0.0, 1.0));
    m.set_end(1.0);
    m.update(10.0);
    m.reset(7.0);
    assert_eq!(m.value(), 1.0);
    assert_eq!(m.end(), 1.0);
    assert!(!m.is_active());
}

#[test]
fn range_new_orders_bounds() {
    let r = Range::new(5.0, -5.0);
    assert_eq!(r.min, -5.0);
    assert_eq!(r.max, 5.0);
    assert_eq!(r.clamp(9.0), 5.0);
}

#[test]
fn looping_motion_wraps_and_stays_active() {
    let mut m = Motion::new(0.0, 1000.0, Easing::Linear).looping(true);
    m.play(0.0, 10.0);
    m.update(1250.0);
    assert!(m.is_active());
    assert!((m.value() - 2.5).abs() < 1e-4);
}

#[test]
fn easing_endpoints_are_exact() {
    for e in [
        Easing::Linear,
        Easing::EaseOutQuad,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseInOutSine,
        Easing::EaseOutBounce,
    ] {
        assert_eq!(e.apply(0.0), 0.0, "{e:?}");
        assert_eq!(e.apply(1.0), 1.0, "{e:?}");
        assert_eq!(e.apply(-1.0), 0.0, "{e:?}");
        assert_eq!(e.apply(2.0), 1.0, "{e:?}");
    }
}

#[test]
fn ease_out_curves_lead_linear() {
    let t = 0.3;
    assert!(Easing::EaseOutQuad.apply(t) > t);
    assert!(Easing::EaseOutCubic.apply(t) > Easing::EaseOutQuad.apply(t));
}

#[test]
fn bounce_stays_in_unit_interval() {
    for i in 0..=100 {
        let v = Easing::EaseOutBounce.apply(i as f32 / 100.0);
        assert!((0.0..=1.0 + 1e-6).contains(&v), "t={i}: {v}");
    }
}

#[test]
fn motion3_moves_all_axes_together() {
    let mut m = Motion3::new(Vec3::ZERO, 100.0, Easing::Linear);
    m.set_end(Vec3::new(1.0, -2.0, 3.0));
    assert!(m.is_active());
    m.update(50.0);
    assert!((m.value() - Vec3::new(0.5, -1.0, 1.5)).length() < 1e-5);
    m.update(50.0);
    assert_eq!(m.value(), Vec3::new(1.0, -2.0, 3.0));
    assert!(!m.is_active());
}
