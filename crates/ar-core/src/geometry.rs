//! Small value types for rays, planes, boxes and camera projection.
//!
//! Everything here is `Copy`; controls keep their own copies instead of
//! sharing scratch vectors.

use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Plane through `point` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub point: Vec3,
}

impl Plane {
    pub fn new(normal: Vec3, point: Vec3) -> Self {
        Self {
            normal: normal.normalize_or_zero(),
            point,
        }
    }

    pub fn horizontal(height: f32) -> Self {
        Self::new(Vec3::Y, Vec3::new(0.0, height, 0.0))
    }

    /// Offset of the plane along its normal from the world origin.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.normal.dot(self.point)
    }

    #[inline]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p - self.point)
    }

    #[inline]
    pub fn project(&self, p: Vec3) -> Vec3 {
        p - self.normal * self.signed_distance(p)
    }

    /// Forward intersection of `ray` with the plane, if any.
    pub fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = self.normal.dot(self.point - ray.origin) / denom;
        (t >= 0.0).then(|| ray.at(t))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self::new(center - half.abs(), center + half.abs())
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// The box scaled about the local origin and moved to `position`.
    pub fn placed(&self, position: Vec3, scale: f32) -> Self {
        Self::new(self.min * scale + position, self.max * scale + position)
    }

    /// Axis-aligned bounds of this box after an affine transform.
    pub fn transformed(&self, m: &Mat4) -> Self {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let p = m.transform_point3(corner);
            min = min.min(p);
            max = max.max(p);
        }
        Self { min, max }
    }

    /// Slab test; returns the entry distance along the ray.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let inv = ray.direction.recip();
        let t0 = (self.min - ray.origin) * inv;
        let t1 = (self.max - ray.origin) * inv;
        let tmin = t0.min(t1).max_element();
        let tmax = t0.max(t1).min_element();
        if tmax < 0.0 || tmin > tmax || tmin.is_nan() || tmax.is_nan() {
            return None;
        }
        Some(tmin.max(0.0))
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::from_center_half_extents(Vec3::new(0.0, 0.5, 0.0), Vec3::splat(0.5))
    }
}

/// A platform hit-test pose as a column-major rigid transform. The pose's
/// Y axis is the surface normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitPose {
    pub matrix: Mat4,
}

impl HitPose {
    pub fn new(matrix: Mat4) -> Self {
        Self { matrix }
    }

    /// Build from the 16 floats a platform transform exposes.
    pub fn from_cols_slice(m: &[f32]) -> Option<Self> {
        (m.len() >= 16).then(|| Self::new(Mat4::from_cols_slice(&m[..16])))
    }

    pub fn from_position_normal(position: Vec3, normal: Vec3) -> Self {
        let rotation = Quat::from_rotation_arc(Vec3::Y, normal.normalize_or_zero());
        Self::new(Mat4::from_rotation_translation(rotation, position))
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.matrix.w_axis.truncate()
    }

    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.matrix.y_axis.truncate().normalize_or_zero()
    }

    /// World-up alignment of the surface normal; element 5 of the
    /// column-major matrix.
    #[inline]
    pub fn up_alignment(&self) -> f32 {
        self.matrix.to_cols_array()[5]
    }

    #[inline]
    pub fn is_floor(&self) -> bool {
        self.up_alignment() > crate::constants::FLOOR_HIT_MIN_UP
    }

    #[inline]
    pub fn is_wall(&self) -> bool {
        self.up_alignment() < crate::constants::WALL_HIT_MAX_UP
    }

    /// Whether this hit is confident enough for the requested surface.
    #[inline]
    pub fn is_confident(&self, vertical: bool) -> bool {
        if vertical {
            self.is_wall()
        } else {
            self.is_floor()
        }
    }
}

/// World pose the placed model is rooted to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub position: Vec3,
    pub rotation: Quat,
    pub vertical: bool,
}

impl Anchor {
    pub fn floor(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            vertical: false,
        }
    }

    /// Floors keep an identity rotation; walls turn the model's +Z to face
    /// out of the wall while keeping its +Y up.
    pub fn from_hit(hit: &HitPose, vertical: bool) -> Self {
        let rotation = if vertical {
            let n = hit.normal();
            if n.x.abs() < 1e-6 && n.z.abs() < 1e-6 {
                Quat::IDENTITY
            } else {
                Quat::from_rotation_y(n.x.atan2(n.z))
            }
        } else {
            Quat::IDENTITY
        };
        Self {
            position: hit.position(),
            rotation,
            vertical,
        }
    }

    /// Outward surface normal of the anchor.
    pub fn normal(&self) -> Vec3 {
        if self.vertical {
            self.rotation * Vec3::Z
        } else {
            Vec3::Y
        }
    }

    pub fn plane(&self) -> Plane {
        Plane::new(self.normal(), self.position)
    }
}

/// Camera state for one frame: world-to-view and projection matrices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub view: Mat4,
    pub projection: Mat4,
}

impl CameraFrame {
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self { view, projection }
    }

    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3, fovy_radians: f32, aspect: f32) -> Self {
        Self {
            view: Mat4::look_at_rh(eye, target, up),
            projection: Mat4::perspective_rh(
                fovy_radians,
                aspect.max(1e-3),
                crate::constants::CAMERA_ZNEAR,
                crate::constants::CAMERA_ZFAR,
            ),
        }
    }

    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.view.inverse().w_axis.truncate()
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        (self.view.inverse().transform_vector3(Vec3::NEG_Z)).normalize_or_zero()
    }

    /// Project a world point to normalized device coordinates (y up). `None`
    /// when the point is behind the camera.
    pub fn project(&self, p: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * p.extend(1.0);
        (clip.w > 1e-6).then(|| Vec2::new(clip.x / clip.w, clip.y / clip.w))
    }

    /// World-space ray through a point in normalized device coordinates.
    pub fn ray(&self, ndc: Vec2) -> Ray {
        let inv = self.view_projection().inverse();
        let far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let far = far.truncate() / far.w;
        let origin = self.position();
        Ray::new(origin, far - origin)
    }
}

/// Correct a normalized screen vector for a non-square viewport, where
/// `aspect` is height / width.
#[inline]
pub fn apply_screen_aspect(v: Vec2, aspect: f32) -> Vec2 {
    Vec2::new(v.x, v.y * aspect)
}

/// Signed angle in radians sweeping from `from` to `to`; positive is
/// counter-clockwise with y up.
#[inline]
pub fn signed_angle(from: Vec2, to: Vec2) -> f32 {
    let cross = from.x * to.y - from.y * to.x;
    let dot = from.dot(to);
    cross.atan2(dot)
}

/// Rotation that turns an object's +Z towards `target` with +Y kept up.
pub fn billboard_rotation(position: Vec3, target: Vec3) -> Quat {
    let forward = (target - position).normalize_or_zero();
    if forward == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let right = Vec3::Y.cross(forward);
    if right.length_squared() < 1e-8 {
        return Quat::from_rotation_arc(Vec3::Z, forward);
    }
    let right = right.normalize();
    let up = forward.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, up, forward))
}
