//! Loaded model state and the asynchronous hand-off from a model loader.
//!
//! Loading and parsing happen elsewhere. The loader side holds a
//! [`ModelSender`] and resolves it exactly once; the session polls the
//! matching [`ModelSlot`] between events and treats every sculpting
//! operation as a no-op until a mesh has arrived.

use glam::{Affine3A, EulerRot, Quat, Vec2, Vec3};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, error};

use crate::error::SculptError;
use crate::mesh::Mesh;
use crate::spatial::Aabb;

/// Placement of the model in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTransform {
    pub translation: Vec3,
    /// Euler angles in radians: x = pitch, y = yaw (applied X then Y)
    pub rotation: Vec2,
    /// Uniform scale
    pub scale: f32,
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl ModelTransform {
    /// Scale the model and move its bounding-box center to the origin,
    /// then drop the vertical offset so the model sits at y = 0.
    pub fn fit_to_origin(bounds: &Aabb, scale: f32) -> Self {
        let mut translation = -(bounds.center() * scale);
        translation.y = 0.0;
        Self {
            translation,
            rotation: Vec2::ZERO,
            scale,
        }
    }

    pub fn rotation_quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0)
    }

    /// Model-to-world transform.
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.rotation_quat(),
            self.translation,
        )
    }

    /// Apply a screen-space drag: horizontal movement yaws, vertical pitches.
    pub fn rotate_by(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.rotation.y += dx * sensitivity;
        self.rotation.x += dy * sensitivity;
    }
}

/// A mesh together with its placement.
#[derive(Debug)]
pub struct LoadedModel {
    pub mesh: Mesh,
    pub transform: ModelTransform,
}

impl LoadedModel {
    /// Place a freshly loaded mesh at the origin with the given scale.
    pub fn placed(mesh: Mesh, scale: f32) -> Self {
        let transform = ModelTransform::fit_to_origin(&mesh.bounds(), scale);
        Self { mesh, transform }
    }
}

type LoadOutcome = Result<Mesh, String>;

/// Loader-side half of the model hand-off.
#[derive(Debug)]
pub struct ModelSender(oneshot::Sender<LoadOutcome>);

impl ModelSender {
    /// Deliver the loaded mesh. Returns false if the session is gone.
    pub fn deliver(self, mesh: Mesh) -> bool {
        self.0.send(Ok(mesh)).is_ok()
    }

    /// Report that loading failed. Returns false if the session is gone.
    pub fn fail(self, reason: impl std::fmt::Display) -> bool {
        self.0.send(Err(reason.to_string())).is_ok()
    }
}

/// Session-side model state.
#[derive(Debug, Default)]
pub enum ModelSlot {
    /// No load has been requested
    #[default]
    Empty,
    /// Waiting for the loader
    Pending(oneshot::Receiver<LoadOutcome>),
    Loaded(LoadedModel),
    /// The loader reported an error; sculpting stays disabled
    Failed(String),
}

impl ModelSlot {
    /// Start a load, returning the sender the loader resolves.
    pub fn pending() -> (ModelSender, Self) {
        let (tx, rx) = oneshot::channel();
        (ModelSender(tx), Self::Pending(rx))
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn loaded(&self) -> Option<&LoadedModel> {
        match self {
            Self::Loaded(model) => Some(model),
            _ => None,
        }
    }

    pub fn loaded_mut(&mut self) -> Result<&mut LoadedModel, SculptError> {
        match self {
            Self::Loaded(model) => Ok(model),
            _ => Err(SculptError::NoMeshLoaded),
        }
    }

    /// Check for a loader result without blocking.
    ///
    /// Returns `Ok(true)` on the poll that transitions to `Loaded`,
    /// `Ok(false)` when nothing changed, and `ModelLoadFailed` on the poll
    /// that transitions to `Failed`.
    pub fn poll(&mut self, scale: f32) -> Result<bool, SculptError> {
        let Self::Pending(receiver) = self else {
            return Ok(false);
        };

        let outcome = match receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return Ok(false),
            Err(TryRecvError::Closed) => Err("loader dropped without a result".to_string()),
        };

        match outcome {
            Ok(mesh) => {
                debug!(
                    "model loaded: {} vertices, {} triangles",
                    mesh.vertex_count(),
                    mesh.triangle_count()
                );
                *self = Self::Loaded(LoadedModel::placed(mesh, scale));
                Ok(true)
            }
            Err(reason) => {
                error!("model load failed: {}", reason);
                *self = Self::Failed(reason.clone());
                Err(SculptError::ModelLoadFailed(reason))
            }
        }
    }
}
