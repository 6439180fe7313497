//! Core interaction types.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::SculptError;

/// Whether single-finger input navigates or sculpts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InteractionMode {
    #[default]
    Navigate,
    Sculpt,
}

/// Direction of deformation for a sculpt stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SculptAction {
    /// Extrude: pull surface toward the touch point
    Add,
    /// Intrude: push surface away from the touch point
    Subtract,
}

impl SculptAction {
    /// Sign applied to the displacement (+1 add, -1 subtract).
    pub fn sign(self) -> f32 {
        match self {
            SculptAction::Add => 1.0,
            SculptAction::Subtract => -1.0,
        }
    }
}

/// Brush settings for a single displacement application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SculptParameters {
    /// Influence radius in model units (must be > 0)
    pub radius: f32,
    /// Strength multiplier (0.0 to 1.0)
    pub strength: f32,
    /// +1.0 to add, -1.0 to subtract
    pub sign: f32,
}

impl SculptParameters {
    pub fn new(radius: f32, strength: f32, action: SculptAction) -> Self {
        Self {
            radius,
            strength,
            sign: action.sign(),
        }
    }

    /// Reject parameters the displacement engine must never run with.
    pub fn validate(&self) -> Result<(), SculptError> {
        let radius_ok = self.radius > 0.0 && self.radius.is_finite();
        let strength_ok = (0.0..=1.0).contains(&self.strength);
        let sign_ok = self.sign == 1.0 || self.sign == -1.0;
        if radius_ok && strength_ok && sign_ok {
            Ok(())
        } else {
            Err(SculptError::InvalidParameters {
                radius: self.radius,
                strength: self.strength,
            })
        }
    }

    /// Same radius and strength with the sign of `action`.
    pub fn with_action(self, action: SculptAction) -> Self {
        Self {
            sign: action.sign(),
            ..self
        }
    }
}

/// Outcome of a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    /// Surface point in model-local space (meaningless when `hit` is false)
    pub point: Vec3,
    pub hit: bool,
}

impl HitResult {
    pub fn at(point: Vec3) -> Self {
        Self { point, hit: true }
    }

    pub fn miss() -> Self {
        Self {
            point: Vec3::ZERO,
            hit: false,
        }
    }

    /// The hit point, if there was one.
    pub fn point(&self) -> Option<Vec3> {
        self.hit.then_some(self.point)
    }
}

/// Interpreted intent of a touch event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureAction {
    /// Rotate the model by a screen-space delta in pixels
    Rotate { dx: f32, dy: f32 },
    /// Move the camera closer (positive) or farther (negative)
    Zoom { delta: f32 },
    /// Deform the mesh under a screen point
    SculptStroke { screen_point: Vec2 },
}
