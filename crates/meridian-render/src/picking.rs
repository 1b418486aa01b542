//! Ray types and the triangle test used by precise surface picking.

use meridian_core::math::{DVec3, Vec3};

/// A ray in world space. The origin is kept in double precision so rays
/// cast at geo-referenced models keep their accuracy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldRay {
    pub origin: DVec3,
    pub direction: Vec3,
}

impl WorldRay {
    pub fn new(origin: DVec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }
}

/// Where a pick ray met a portion's surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub world_position: DVec3,
    /// Surface normal in world space, when requested.
    pub world_normal: Option<Vec3>,
    /// Distance from the ray origin to `world_position`.
    pub distance: f64,
}

/// Moller-Trumbore intersection without back-face culling.
///
/// Returns the ray parameter of the hit.
pub fn ray_triangle_intersect(origin: Vec3, direction: Vec3, triangle: &[Vec3; 3]) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = triangle[1] - triangle[0];
    let edge2 = triangle[2] - triangle[0];

    let h = direction.cross(edge2);
    let a = edge1.dot(h);
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - triangle[0];
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    (t > EPSILON).then_some(t)
}
