//! Triangle mesh owned by a sculpting session.
//!
//! Positions are the source of truth. Normals are derived from them and the
//! spatial index is a disposable cache; both are refreshed through
//! [`Mesh::deform`], the only way to move vertices.

use glam::Vec3;
use tracing::trace;

use crate::error::{MeshError, SculptError};
use crate::raycast::Ray;
use crate::spatial::{Aabb, BvhHit, SpatialIndex};

#[derive(Debug)]
pub struct Mesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
    spatial: SpatialIndex,
    /// Set whenever geometry changes; cleared once the render loop uploads it.
    render_dirty: bool,
}

impl Mesh {
    /// Create a mesh from provider buffers.
    ///
    /// An empty `normals` buffer is filled by recomputation.
    pub fn new(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        indices: Vec<u32>,
    ) -> Result<Self, MeshError> {
        if positions.is_empty() {
            return Err(MeshError::Empty);
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndexCountNotTriangles(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count: positions.len(),
            });
        }
        if !normals.is_empty() && normals.len() != positions.len() {
            return Err(MeshError::NormalCountMismatch {
                positions: positions.len(),
                normals: normals.len(),
            });
        }

        let compute_normals = normals.is_empty();
        let mut mesh = Self {
            normals: if compute_normals {
                vec![Vec3::ZERO; positions.len()]
            } else {
                normals
            },
            positions,
            indices,
            spatial: SpatialIndex::new(),
            render_dirty: true,
        };
        if compute_normals {
            mesh.recompute_normals();
        }
        Ok(mesh)
    }

    /// Create a mesh where every three consecutive positions form a triangle.
    ///
    /// Such meshes share no vertices, so recomputed normals are flat.
    pub fn non_indexed(positions: Vec<Vec3>) -> Result<Self, MeshError> {
        if positions.len() % 3 != 0 {
            return Err(MeshError::IndexCountNotTriangles(positions.len()));
        }
        let indices = (0..positions.len() as u32).collect();
        Self::new(positions, Vec::new(), indices)
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn has_geometry(&self) -> bool {
        self.triangle_count() > 0
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.positions.iter().copied())
    }

    pub fn spatial_index(&self) -> &SpatialIndex {
        &self.spatial
    }

    /// Whether geometry changed since the last [`Mesh::clear_render_dirty`].
    pub fn is_render_dirty(&self) -> bool {
        self.render_dirty
    }

    pub fn clear_render_dirty(&mut self) {
        self.render_dirty = false;
    }

    /// Nearest intersection of a model-space ray with the surface.
    ///
    /// Rebuilds the spatial index first if a deformation invalidated it.
    pub fn raycast(&mut self, ray: &Ray) -> Result<BvhHit, SculptError> {
        if !self.has_geometry() {
            return Err(SculptError::NoGeometryOnMesh);
        }
        self.spatial
            .query(ray, &self.positions, &self.indices)
            .ok_or(SculptError::NoIntersection)
    }

    /// Move vertices in place.
    ///
    /// `displace` maps each position to its new value, or `None` to leave it.
    /// The mesh counts the positions that actually changed; when any did, the
    /// normals are recomputed, the spatial index is invalidated and the mesh
    /// is flagged for re-upload before this call returns.
    pub fn deform(&mut self, mut displace: impl FnMut(Vec3) -> Option<Vec3>) -> usize {
        let mut moved = 0;
        for position in &mut self.positions {
            if let Some(next) = displace(*position).filter(|next| *next != *position) {
                *position = next;
                moved += 1;
            }
        }
        if moved > 0 {
            self.recompute_normals();
            self.spatial.invalidate();
            self.render_dirty = true;
            trace!("mesh deformed: {} vertices moved", moved);
        }
        moved
    }

    /// Area-weighted vertex normals from the current positions.
    fn recompute_normals(&mut self) {
        self.normals.iter_mut().for_each(|n| *n = Vec3::ZERO);

        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let (p0, p1, p2) = (self.positions[i0], self.positions[i1], self.positions[i2]);
            // Cross product length is twice the triangle area
            let face_normal = (p1 - p0).cross(p2 - p0);
            self.normals[i0] += face_normal;
            self.normals[i1] += face_normal;
            self.normals[i2] += face_normal;
        }

        for normal in &mut self.normals {
            *normal = normal.normalize_or_zero();
        }
    }
}
