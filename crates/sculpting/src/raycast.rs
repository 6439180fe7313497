//! Ray-triangle intersection for touch picking.
//!
//! This module provides ray-triangle intersection using the Moller-Trumbore
//! algorithm. Rays are not required to have a normalized direction, which
//! lets a world-space ray be carried into model space through an affine
//! inverse without renormalizing.

use glam::{Affine3A, Vec3};

/// Parallel-ray tolerance (relative to the ray and edge lengths) and minimum
/// hit parameter
pub const EPSILON: f32 = 1e-6;

/// A half-line starting at `origin` and extending along `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Map the ray through an affine transform.
    ///
    /// Ray parameters are preserved: `transformed(m).at(t) == m * at(t)`.
    pub fn transformed(&self, transform: &Affine3A) -> Self {
        Self {
            origin: transform.transform_point3(self.origin),
            direction: transform.transform_vector3(self.direction),
        }
    }
}

/// A ray parameter plus barycentric coordinates on the triangle.
#[derive(Debug, Clone, Copy)]
pub struct TriangleHit {
    /// Ray parameter; a true distance only for unit directions
    pub t: f32,
    /// Weight of `v1`
    pub u: f32,
    /// Weight of `v2`
    pub v: f32,
}

/// Moller-Trumbore intersection without back-face culling.
///
/// Front and back faces both count. Hits at or behind the ray origin are
/// rejected.
pub fn ray_triangle_intersection(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<TriangleHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let pvec = ray.direction.cross(edge2);
    let det = edge1.dot(pvec);

    // Ray parallel to the triangle plane, or a degenerate triangle. `det` is
    // the sine of the ray/plane angle scaled by these three lengths.
    let scale = ray.direction.length() * edge1.length() * edge2.length();
    if det.abs() <= EPSILON * scale {
        return None;
    }

    let inv_det = 1.0 / det;
    let tvec = ray.origin - v0;

    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(edge1);
    let v = ray.direction.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(qvec) * inv_det;
    if t < EPSILON {
        return None;
    }

    Some(TriangleHit { t, u, v })
}
