//! Vertex displacement for sculpt strokes.
//!
//! Every vertex inside the brush radius is interpolated toward the hit point
//! (add) or pushed away from it (subtract). Influence falls off linearly from
//! full strength at the hit point to zero at the radius, so the deformation
//! is a smooth bump or dent without needing normals for direction.

use glam::Vec3;
use tracing::{debug, warn};

use crate::error::SculptError;
use crate::mesh::Mesh;
use crate::types::{HitResult, SculptParameters};

/// Linear falloff: 1 at the center, 0 at and beyond the radius.
pub fn linear_falloff(distance: f32, radius: f32) -> f32 {
    (1.0 - distance / radius).max(0.0)
}

/// Signed interpolation factor for a vertex at `distance` from the hit point.
///
/// `None` when the vertex lies on or outside the radius.
pub fn displacement_factor(distance: f32, params: &SculptParameters) -> Option<f32> {
    if distance >= params.radius {
        return None;
    }
    Some(params.strength * linear_falloff(distance, params.radius) * params.sign)
}

/// Displace one position. Returns `None` if it does not move.
fn displace(position: Vec3, center: Vec3, params: &SculptParameters) -> Option<Vec3> {
    let factor = displacement_factor(position.distance(center), params)?;
    if factor == 0.0 {
        return None;
    }
    let displaced = position + (center - position) * factor;
    (displaced != position).then_some(displaced)
}

/// Apply one brush dab to the mesh at a prior hit.
///
/// Returns the number of vertices moved. Normals are recomputed and the
/// spatial index invalidated whenever at least one vertex moved.
pub fn apply(
    mesh: Option<&mut Mesh>,
    hit: &HitResult,
    params: &SculptParameters,
) -> Result<usize, SculptError> {
    let mesh = mesh.ok_or(SculptError::NoMeshLoaded)?;
    if !mesh.has_geometry() {
        return Err(SculptError::NoGeometryOnMesh);
    }
    let center = hit.point().ok_or(SculptError::NoIntersection)?;
    params.validate()?;

    let moved = mesh.deform(|position| displace(position, center, params));

    debug!(
        "displacement at {:?} (radius {}, strength {}, sign {}): {} vertices moved",
        center, params.radius, params.strength, params.sign, moved
    );
    Ok(moved)
}

/// [`apply`], reporting a skipped dab instead of returning the error.
pub fn apply_or_report(
    mesh: Option<&mut Mesh>,
    hit: &HitResult,
    params: &SculptParameters,
) -> usize {
    apply(mesh, hit, params).unwrap_or_else(|err| {
        warn!("sculpt dab skipped: {}", err);
        0
    })
}
