//! Bounding-volume hierarchy over mesh triangles.
//!
//! Nodes live in a flat vector; leaves reference a contiguous range of the
//! reordered triangle list. Construction splits at the centroid median along
//! the longest axis, which is cheap enough to redo after every sculpt dab.

use glam::Vec3;
use tracing::debug;

use super::Aabb;
use crate::raycast::{ray_triangle_intersection, Ray};

/// Maximum triangles stored in a leaf before it is split.
const MAX_LEAF_TRIANGLES: usize = 4;

#[derive(Debug, Clone, Copy)]
enum NodeKind {
    Leaf { start: u32, count: u32 },
    Internal { left: u32, right: u32 },
}

#[derive(Debug, Clone, Copy)]
struct BvhNode {
    bounds: Aabb,
    kind: NodeKind,
}

/// Closest intersection found by [`TriangleBvh::raycast`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhHit {
    /// Triangle index (position in the index buffer divided by 3)
    pub triangle: u32,
    /// Ray parameter of the hit
    pub t: f32,
    /// Intersection point in the space of the indexed positions
    pub point: Vec3,
}

/// A BVH built from positions and a triangle index buffer.
///
/// The hierarchy does not own geometry; callers pass the same buffers it was
/// built from when querying.
#[derive(Debug, Clone)]
pub struct TriangleBvh {
    nodes: Vec<BvhNode>,
    triangles: Vec<u32>,
}

fn triangle_corners(positions: &[Vec3], indices: &[u32], triangle: u32) -> [Vec3; 3] {
    let base = triangle as usize * 3;
    [
        positions[indices[base] as usize],
        positions[indices[base + 1] as usize],
        positions[indices[base + 2] as usize],
    ]
}

impl TriangleBvh {
    /// Build a hierarchy over every complete triangle in `indices`.
    pub fn build(positions: &[Vec3], indices: &[u32]) -> Self {
        let triangle_count = indices.len() / 3;
        let mut triangles: Vec<u32> = (0..triangle_count as u32).collect();

        let mut tri_bounds = Vec::with_capacity(triangle_count);
        let mut centroids = Vec::with_capacity(triangle_count);
        for &tri in &triangles {
            let corners = triangle_corners(positions, indices, tri);
            tri_bounds.push(Aabb::from_points(corners));
            centroids.push((corners[0] + corners[1] + corners[2]) / 3.0);
        }

        let mut nodes = Vec::new();
        if triangle_count > 0 {
            Self::build_node(&mut nodes, &mut triangles, 0, &tri_bounds, &centroids);
        }

        debug!(
            "BVH built: {} triangles, {} nodes",
            triangle_count,
            nodes.len()
        );

        Self { nodes, triangles }
    }

    fn build_node(
        nodes: &mut Vec<BvhNode>,
        triangles: &mut [u32],
        offset: usize,
        tri_bounds: &[Aabb],
        centroids: &[Vec3],
    ) -> u32 {
        let bounds = triangles
            .iter()
            .fold(Aabb::empty(), |acc, &tri| acc.union(&tri_bounds[tri as usize]));
        let node_index = nodes.len() as u32;

        let leaf = BvhNode {
            bounds,
            kind: NodeKind::Leaf {
                start: offset as u32,
                count: triangles.len() as u32,
            },
        };

        if triangles.len() <= MAX_LEAF_TRIANGLES {
            nodes.push(leaf);
            return node_index;
        }

        let centroid_bounds =
            Aabb::from_points(triangles.iter().map(|&tri| centroids[tri as usize]));
        let axis = centroid_bounds.longest_axis();

        // Coincident centroids cannot be separated
        if centroid_bounds.size()[axis] <= 0.0 {
            nodes.push(leaf);
            return node_index;
        }

        let mid = triangles.len() / 2;
        triangles.select_nth_unstable_by(mid, |&a, &b| {
            centroids[a as usize][axis].total_cmp(&centroids[b as usize][axis])
        });

        nodes.push(BvhNode {
            bounds,
            kind: NodeKind::Internal { left: 0, right: 0 },
        });

        let (left_tris, right_tris) = triangles.split_at_mut(mid);
        let left = Self::build_node(nodes, left_tris, offset, tri_bounds, centroids);
        let right = Self::build_node(nodes, right_tris, offset + mid, tri_bounds, centroids);
        nodes[node_index as usize].kind = NodeKind::Internal { left, right };

        node_index
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Bounds of the whole hierarchy, if it holds any triangle.
    pub fn bounds(&self) -> Option<Aabb> {
        self.nodes.first().map(|root| root.bounds)
    }

    /// Find the closest triangle hit along the ray's forward direction.
    pub fn raycast(&self, ray: &Ray, positions: &[Vec3], indices: &[u32]) -> Option<BvhHit> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut closest: Option<(u32, f32)> = None;
        let mut stack = vec![0u32];

        while let Some(node_index) = stack.pop() {
            let node = &self.nodes[node_index as usize];
            let Some((t_near, _)) = node.bounds.ray_interval(ray) else {
                continue;
            };
            if closest.is_some_and(|(_, best_t)| t_near > best_t) {
                continue;
            }

            match node.kind {
                NodeKind::Leaf { start, count } => {
                    let range = start as usize..(start + count) as usize;
                    for &tri in &self.triangles[range] {
                        let [v0, v1, v2] = triangle_corners(positions, indices, tri);
                        let Some(hit) = ray_triangle_intersection(ray, v0, v1, v2) else {
                            continue;
                        };
                        if closest.is_none_or(|(_, best_t)| hit.t < best_t) {
                            closest = Some((tri, hit.t));
                        }
                    }
                }
                NodeKind::Internal { left, right } => {
                    stack.push(left);
                    stack.push(right);
                }
            }
        }

        closest.map(|(triangle, t)| BvhHit {
            triangle,
            t,
            point: ray.at(t),
        })
    }
}
