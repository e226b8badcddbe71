//! Orbit camera for the non-AR viewer.
//!
//! Angles are stored in degrees. The camera sits on a sphere around `pivot`;
//! yaw 0 / pitch 0 puts the eye on +Z looking back towards the pivot.

use crate::constants::{
    CAMERA_FOVY_DEG, ORBIT_DEGREES_PER_UNIT, ORBIT_DURATION_MS, ORBIT_MAX_DISTANCE,
    ORBIT_MAX_PITCH_DEG, ORBIT_MIN_DISTANCE, ORBIT_MIN_PITCH_DEG, ORBIT_ZOOM_STEP,
};
use crate::easing::Easing;
use crate::geometry::CameraFrame;
use crate::motion::{Motion, Range};
use glam::{Mat4, Vec3};

const YAW_EPSILON_DEG: f32 = 1e-3;

/// Camera orientation state. Yaw compares modulo 360 degrees.
#[derive(Clone, Copy, Debug)]
pub struct Pose {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub pivot: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 3.0,
            pivot: Vec3::ZERO,
        }
    }
}

impl PartialEq for Pose {
    fn eq(&self, other: &Self) -> bool {
        yaw_difference(self.yaw, other.yaw).abs() < YAW_EPSILON_DEG
            && self.pitch == other.pitch
            && self.distance == other.distance
            && self.pivot == other.pivot
    }
}

/// Shortest signed angle in degrees taking `from` to `to`, in (-180, 180].
pub fn yaw_difference(from: f32, to: f32) -> f32 {
    let d = (to - from).rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

impl Pose {
    /// World-space eye position for this pose.
    pub fn eye(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.pivot
            + self.distance
                * Vec3::new(pitch.cos() * yaw.sin(), pitch.sin(), pitch.cos() * yaw.cos())
    }
}

#[derive(Clone, Debug)]
pub struct OrbitCamera {
    initial: Pose,
    pivot: Vec3,
    yaw: Motion,
    pitch: Motion,
    distance: Motion,
    fovy_radians: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(Pose::default())
    }
}

impl OrbitCamera {
    pub fn new(pose: Pose) -> Self {
        let pitch_range = Range::new(ORBIT_MIN_PITCH_DEG, ORBIT_MAX_PITCH_DEG);
        let distance_range = Range::new(ORBIT_MIN_DISTANCE, ORBIT_MAX_DISTANCE);
        let initial = Pose {
            pitch: pitch_range.clamp(pose.pitch),
            distance: distance_range.clamp(pose.distance),
            ..pose
        };
        Self {
            initial,
            pivot: initial.pivot,
            yaw: Motion::new(initial.yaw, ORBIT_DURATION_MS, Easing::EaseOutQuad),
            pitch: Motion::new(initial.pitch, ORBIT_DURATION_MS, Easing::EaseOutQuad)
                .with_range(pitch_range),
            distance: Motion::new(initial.distance, ORBIT_DURATION_MS, Easing::EaseOutQuad)
                .with_range(distance_range),
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
        }
    }

    /// The pose currently rendered.
    pub fn pose(&self) -> Pose {
        Pose {
            yaw: self.yaw.value(),
            pitch: self.pitch.value(),
            distance: self.distance.value(),
            pivot: self.pivot,
        }
    }

    /// The pose the camera is heading towards.
    pub fn target_pose(&self) -> Pose {
        Pose {
            yaw: self.yaw.end(),
            pitch: self.pitch.end(),
            distance: self.distance.end(),
            pivot: self.pivot,
        }
    }

    pub fn initial_pose(&self) -> Pose {
        self.initial
    }

    pub fn set_fovy_radians(&mut self, fovy: f32) {
        if fovy.is_finite() && fovy > 0.0 {
            self.fovy_radians = fovy;
        }
    }

    /// Orbit by a drag of `(dx, dy)` in normalized screen units.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw.set_end_delta(-dx * ORBIT_DEGREES_PER_UNIT);
        self.pitch.set_end_delta(dy * ORBIT_DEGREES_PER_UNIT);
    }

    /// Positive `notches` move away from the pivot.
    pub fn zoom(&mut self, notches: f32) {
        let factor = (1.0 + ORBIT_ZOOM_STEP).powf(notches);
        self.distance.set_end(self.distance.end() * factor);
    }

    /// Animate towards `pose`, taking the short way round in yaw.
    pub fn set_pose(&mut self, pose: Pose) {
        let yaw = self.yaw.value() + yaw_difference(self.yaw.value(), pose.yaw);
        self.yaw.set_end(yaw);
        self.pitch.set_end(pose.pitch);
        self.distance.set_end(pose.distance);
        self.pivot = pose.pivot;
    }

    /// Snap to `pose` with no animation.
    pub fn jump_to(&mut self, pose: Pose) {
        self.yaw.reset(pose.yaw);
        self.pitch.reset(pose.pitch);
        self.distance.reset(pose.distance);
        self.pivot = pose.pivot;
    }

    pub fn reset(&mut self) {
        self.jump_to(self.initial);
    }

    /// Advance the animation. Returns true while any component is moving.
    pub fn update(&mut self, dt_ms: f32) -> bool {
        self.yaw.update(dt_ms);
        self.pitch.update(dt_ms);
        self.distance.update(dt_ms);
        self.is_moving()
    }

    pub fn is_moving(&self) -> bool {
        self.yaw.is_active() || self.pitch.is_active() || self.distance.is_active()
    }

    pub fn eye(&self) -> Vec3 {
        self.pose().eye()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.pivot, Vec3::Y)
    }

    pub fn camera_frame(&self, aspect: f32) -> CameraFrame {
        CameraFrame::look_at(self.eye(), self.pivot, Vec3::Y, self.fovy_radians, aspect)
    }
}
