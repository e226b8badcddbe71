//! Scalar tween used by every control for smooth interpolation.
//!
//! A `Motion` eases from `start` to `end` over `duration` milliseconds. The
//! current value is always clamped into `range`, and `update` reports how far
//! the value moved since the previous call so callers can apply deltas.

use crate::easing::Easing;
use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const UNBOUNDED: Range = Range {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };

    pub fn new(min: f32, max: f32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    #[inline]
    pub fn clamp(&self, v: f32) -> f32 {
        v.clamp(self.min, self.max)
    }
}

impl Default for Range {
    fn default() -> Self {
        Range::UNBOUNDED
    }
}

#[derive(Debug, Clone)]
pub struct Motion {
    start: f32,
    end: f32,
    val: f32,
    progress: f32,
    duration: f32,
    looping: bool,
    range: Range,
    easing: Easing,
    activated: bool,
}

impl Motion {
    pub fn new(value: f32, duration_ms: f32, easing: Easing) -> Self {
        Self {
            start: value,
            end: value,
            val: value,
            progress: 0.0,
            duration: duration_ms.max(0.0),
            looping: false,
            range: Range::UNBOUNDED,
            easing,
            activated: false,
        }
    }

    pub fn with_range(mut self, range: Range) -> Self {
        self.range = range;
        let v = range.clamp(self.val);
        self.start = v;
        self.end = v;
        self.val = v;
        self
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.val
    }
    #[inline]
    pub fn end(&self) -> f32 {
        self.end
    }
    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }
    #[inline]
    pub fn is_active(&self) -> bool {
        self.activated
    }
    #[inline]
    pub fn range(&self) -> Range {
        self.range
    }

    pub fn set_range(&mut self, range: Range) {
        self.range = range;
        self.start = range.clamp(self.start);
        self.end = range.clamp(self.end);
        self.val = range.clamp(self.val);
    }

    pub fn set_duration(&mut self, duration_ms: f32) {
        self.duration = duration_ms.max(0.0);
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    /// Retarget to the pending end plus `delta`. The transition restarts from
    /// the current value, so a settled motion lands on `clamp(val + delta)`.
    pub fn set_end_delta(&mut self, delta: f32) {
        let end = self.end + delta;
        self.set_end(end);
    }

    /// Retarget to an absolute value, restarting from the current value.
    pub fn set_end(&mut self, end: f32) {
        self.start = self.val;
        self.end = self.range.clamp(end);
        self.progress = 0.0;
        self.activated = true;
    }

    /// Snap to `value` (clamped) with no transition in flight.
    pub fn reset(&mut self, value: f32) {
        let v = self.range.clamp(value);
        self.start = v;
        self.end = v;
        self.val = v;
        self.progress = 0.0;
        self.activated = false;
    }

    /// Restart a transition between two explicit values.
    pub fn play(&mut self, from: f32, to: f32) {
        self.start = self.range.clamp(from);
        self.end = self.range.clamp(to);
        self.val = self.start;
        self.progress = 0.0;
        self.activated = true;
    }

    /// Advance by `dt_ms` and return the change in value since the last call.
    pub fn update(&mut self, dt_ms: f32) -> f32 {
        if !self.activated {
            return 0.0;
        }
        let prev = self.val;
        let step = if self.duration > 0.0 {
            dt_ms.max(0.0) / self.duration
        } else {
            1.0
        };
        self.progress += step;
        if self.looping {
            self.progress = self.progress.rem_euclid(1.0);
        } else if self.progress >= 1.0 {
            self.progress = 1.0;
            self.activated = false;
        }
        let t = self.easing.apply(self.progress);
        self.val = self.range.clamp(self.start + (self.end - self.start) * t);
        self.val - prev
    }
}

/// Three motions driven together, used for smoothed positions.
#[derive(Debug, Clone)]
pub struct Motion3 {
    x: Motion,
    y: Motion,
    z: Motion,
}

impl Motion3 {
    pub fn new(value: Vec3, duration_ms: f32, easing: Easing) -> Self {
        Self {
            x: Motion::new(value.x, duration_ms, easing),
            y: Motion::new(value.y, duration_ms, easing),
            z: Motion::new(value.z, duration_ms, easing),
        }
    }

    pub fn value(&self) -> Vec3 {
        Vec3::new(self.x.value(), self.y.value(), self.z.value())
    }

    pub fn end(&self) -> Vec3 {
        Vec3::new(self.x.end(), self.y.end(), self.z.end())
    }

    pub fn is_active(&self) -> bool {
        self.x.is_active() || self.y.is_active() || self.z.is_active()
    }

    pub fn set_end(&mut self, end: Vec3) {
        self.x.set_end(end.x);
        self.y.set_end(end.y);
        self.z.set_end(end.z);
    }

    pub fn reset(&mut self, value: Vec3) {
        self.x.reset(value.x);
        self.y.reset(value.y);
        self.z.reset(value.z);
    }

    pub fn update(&mut self, dt_ms: f32) -> Vec3 {
        Vec3::new(
            self.x.update(dt_ms),
            self.y.update(dt_ms),
            self.z.update(dt_ms),
        )
    }
}
