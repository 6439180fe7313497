//! Spatial data structures for touch picking.
//!
//! This module provides the bounding-volume hierarchy used to answer
//! nearest ray hits against a mesh, and the lazily rebuilt cache that owns
//! it on behalf of the mesh.

mod bvh;

pub use bvh::{BvhHit, TriangleBvh};

use glam::Vec3;
use tracing::trace;

use crate::raycast::Ray;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// An inverted box that any included point replaces.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut bounds = Self::empty();
        for point in points {
            bounds.include_point(point);
        }
        bounds
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn include_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Index (0 = x, 1 = y, 2 = z) of the widest extent.
    pub fn longest_axis(&self) -> usize {
        let size = self.size();
        if size.x >= size.y && size.x >= size.z {
            0
        } else if size.y >= size.z {
            1
        } else {
            2
        }
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Slab test. Returns the entry and exit parameters of the ray, with the
    /// entry clamped to the ray origin.
    ///
    /// An axis the ray runs parallel to constrains nothing when the origin
    /// lies within that slab (faces included) and rejects the box otherwise.
    pub fn ray_interval(&self, ray: &Ray) -> Option<(f32, f32)> {
        let mut t_near = 0.0f32;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            let (min, max) = (self.min[axis], self.max[axis]);

            if direction == 0.0 {
                if origin < min || origin > max {
                    return None;
                }
                continue;
            }

            let inv = direction.recip();
            let t0 = (min - origin) * inv;
            let t1 = (max - origin) * inv;
            t_near = t_near.max(t0.min(t1));
            t_far = t_far.min(t0.max(t1));
        }

        (t_far >= t_near).then_some((t_near, t_far))
    }
}

/// Lazily rebuilt acceleration cache for a mesh.
///
/// The cache is only valid while the positions it was built from are
/// unchanged. Any vertex mutation must call [`SpatialIndex::invalidate`]
/// before the next query; the stale hierarchy is dropped immediately and
/// rebuilt on demand.
#[derive(Debug)]
pub struct SpatialIndex {
    bvh: Option<TriangleBvh>,
    dirty: bool,
    build_count: u64,
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self {
            bvh: None,
            dirty: true,
            build_count: 0,
        }
    }
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a built hierarchy matches the current geometry.
    pub fn is_current(&self) -> bool {
        !self.dirty && self.bvh.is_some()
    }

    /// Number of times the hierarchy has been (re)built.
    pub fn build_count(&self) -> u64 {
        self.build_count
    }

    /// Mark the hierarchy stale and free it.
    pub fn invalidate(&mut self) {
        if self.bvh.is_some() {
            trace!("spatial index invalidated");
        }
        self.bvh = None;
        self.dirty = true;
    }

    /// Return the hierarchy, rebuilding it first if it is stale.
    pub fn ensure_built(&mut self, positions: &[Vec3], indices: &[u32]) -> &TriangleBvh {
        if self.dirty {
            self.bvh = None;
            self.dirty = false;
        }
        let build_count = &mut self.build_count;
        self.bvh.get_or_insert_with(|| {
            *build_count += 1;
            TriangleBvh::build(positions, indices)
        })
    }

    /// Nearest hit of `ray` against the indexed triangles.
    pub fn query(&mut self, ray: &Ray, positions: &[Vec3], indices: &[u32]) -> Option<BvhHit> {
        self.ensure_built(positions, indices)
            .raycast(ray, positions, indices)
    }
}
