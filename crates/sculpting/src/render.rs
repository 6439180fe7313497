//! Render-loop hand-off.
//!
//! The core never touches the GPU. Each frame the embedder asks the session
//! for a [`RenderSnapshot`], uploads the vertex buffer when `mesh_dirty` is
//! set, then acknowledges so the next snapshot can skip the upload.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::camera::PerspectiveCamera;
use crate::mesh::Mesh;
use crate::model::ModelTransform;

/// Vertex layout matching a position + normal vertex buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct RenderVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Debug, Clone)]
pub struct RenderGeometry {
    pub vertices: Vec<RenderVertex>,
    pub indices: Vec<u32>,
}

impl RenderGeometry {
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let vertices = mesh
            .positions()
            .iter()
            .zip(mesh.normals())
            .map(|(position, normal)| RenderVertex {
                position: position.to_array(),
                normal: normal.to_array(),
            })
            .collect();
        Self {
            vertices,
            indices: mesh.indices().to_vec(),
        }
    }

    /// Raw bytes of the vertex buffer.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Everything the render loop needs for one frame.
#[derive(Debug, Clone)]
pub struct RenderSnapshot {
    pub model_matrix: Mat4,
    pub view_matrix: Mat4,
    pub projection_matrix: Mat4,
    /// True when geometry changed since the last acknowledged upload
    pub mesh_dirty: bool,
    /// Present only when `mesh_dirty` is set
    pub geometry: Option<RenderGeometry>,
}

impl RenderSnapshot {
    pub fn capture(camera: &PerspectiveCamera, model: Option<(&Mesh, &ModelTransform)>) -> Self {
        let (model_matrix, mesh_dirty, geometry) = match model {
            Some((mesh, transform)) => {
                let dirty = mesh.is_render_dirty();
                (
                    Mat4::from(transform.to_affine()),
                    dirty,
                    dirty.then(|| RenderGeometry::from_mesh(mesh)),
                )
            }
            None => (Mat4::IDENTITY, false, None),
        };

        Self {
            model_matrix,
            view_matrix: camera.view_matrix(),
            projection_matrix: camera.projection_matrix(),
            mesh_dirty,
            geometry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use touchsculpt_config::{DisplayConfig, InteractionConfig};

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::from_config(&InteractionConfig::default(), &DisplayConfig::default())
    }

    fn triangle() -> Mesh {
        Mesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            Vec::new(),
            vec![0, 1, 2],
        )
        .unwrap()
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<RenderVertex>(), 24);
        let geometry = RenderGeometry::from_mesh(&triangle());
        assert_eq!(geometry.vertex_bytes().len(), 3 * 24);
        assert_eq!(geometry.index_bytes().len(), 3 * 4);
        assert_eq!(geometry.vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(geometry.vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_capture_without_model() {
        let snapshot = RenderSnapshot::capture(&camera(), None);
        assert!(!snapshot.mesh_dirty);
        assert!(snapshot.geometry.is_none());
        assert_eq!(snapshot.model_matrix, Mat4::IDENTITY);
    }

    #[test]
    fn test_geometry_only_when_dirty() {
        let mut mesh = triangle();
        let transform = ModelTransform::default();

        let snapshot = RenderSnapshot::capture(&camera(), Some((&mesh, &transform)));
        assert!(snapshot.mesh_dirty);
        assert!(snapshot.geometry.is_some());

        mesh.clear_render_dirty();
        let snapshot = RenderSnapshot::capture(&camera(), Some((&mesh, &transform)));
        assert!(!snapshot.mesh_dirty);
        assert!(snapshot.geometry.is_none());
    }
}
