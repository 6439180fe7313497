//! Error types for the sculpting core.
//!
//! Every [`SculptError`] is recoverable by skipping the operation that
//! produced it; none of them leaves the mesh or gesture state half-updated.

use thiserror::Error;

/// Conditions under which a sculpting operation becomes a no-op.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SculptError {
    #[error("No model is loaded")]
    NoMeshLoaded,
    #[error("Model has no triangle geometry")]
    NoGeometryOnMesh,
    #[error("Touch ray does not intersect the model")]
    NoIntersection,
    #[error("Invalid sculpt parameters: radius={radius}, strength={strength}")]
    InvalidParameters { radius: f32, strength: f32 },
    #[error("Model failed to load: {0}")]
    ModelLoadFailed(String),
}

/// Problems with mesh buffers handed over by a model provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    #[error("Mesh has no vertices")]
    Empty,
    #[error("Index count {0} is not a multiple of 3")]
    IndexCountNotTriangles(usize),
    #[error("Index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("Normal count {normals} does not match vertex count {positions}")]
    NormalCountMismatch { positions: usize, normals: usize },
}
