//! Shared configuration for touch sculpting
//!
//! This crate provides the single source of truth for viewport dimensions
//! and the interaction tuning constants (sensitivities, camera limits, brush
//! defaults) used by the sculpting core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default viewport width in pixels
pub const DEFAULT_WIDTH: u32 = 1024;

/// Default viewport height in pixels
pub const DEFAULT_HEIGHT: u32 = 768;

/// Device pixel ratio assumed when none is reported
pub const DEFAULT_SCALE: f32 = 1.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Display configuration for the touch viewport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Viewport width in logical pixels
    pub width: u32,
    /// Viewport height in logical pixels
    pub height: u32,
    /// Device pixel ratio; touch coordinates stay in logical pixels
    pub scale: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            scale: DEFAULT_SCALE,
        }
    }
}

impl DisplayConfig {
    /// Viewport of the given logical size at the default pixel ratio
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale: DEFAULT_SCALE,
        }
    }

    pub fn width_f32(&self) -> f32 {
        self.width as f32
    }

    pub fn height_f32(&self) -> f32 {
        self.height as f32
    }

    /// Width over height. Falls back to 1.0 for a degenerate viewport.
    pub fn aspect_ratio(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width_f32() / self.height_f32()
        }
    }
}

/// Tuning constants for touch navigation and sculpting.
///
/// Every field has a serde default, so a partial JSON document only
/// overrides what it names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Model rotation in radians per pixel of single-finger drag
    pub rotation_sensitivity: f32,
    /// Camera distance units per pixel of pinch distance change
    pub zoom_sensitivity: f32,
    /// Closest the camera may get to the origin
    pub min_camera_distance: f32,
    /// Farthest the camera may get from the origin
    pub max_camera_distance: f32,
    /// Camera distance before any model is loaded
    pub initial_camera_distance: f32,
    /// Camera distance applied once a model finishes loading
    pub loaded_camera_distance: f32,
    /// Vertical field of view in degrees
    pub field_of_view_degrees: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    /// Default brush radius in model units
    pub brush_radius: f32,
    /// Default brush strength (0.0 - 1.0)
    pub brush_strength: f32,
    /// Uniform scale applied to a freshly loaded model
    pub model_scale: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            rotation_sensitivity: 0.015,
            zoom_sensitivity: 0.01,
            min_camera_distance: 1.0,
            max_camera_distance: 100.0,
            initial_camera_distance: 5.0,
            loaded_camera_distance: 10.0,
            field_of_view_degrees: 75.0,
            near_plane: 0.1,
            far_plane: 1000.0,
            brush_radius: 0.5,
            brush_strength: 0.1,
            model_scale: 0.2,
        }
    }
}

impl InteractionConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the constants describe a usable interaction setup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::InvalidValue {
                field,
                reason: reason.into(),
            }
        }

        if !(self.rotation_sensitivity > 0.0) {
            return Err(invalid("rotation_sensitivity", "must be positive"));
        }
        if !(self.zoom_sensitivity > 0.0) {
            return Err(invalid("zoom_sensitivity", "must be positive"));
        }
        if !(self.min_camera_distance > 0.0) {
            return Err(invalid("min_camera_distance", "must be positive"));
        }
        if self.max_camera_distance < self.min_camera_distance {
            return Err(invalid(
                "max_camera_distance",
                format!(
                    "{} is below min_camera_distance {}",
                    self.max_camera_distance, self.min_camera_distance
                ),
            ));
        }
        if !(self.field_of_view_degrees > 0.0 && self.field_of_view_degrees < 180.0) {
            return Err(invalid("field_of_view_degrees", "must lie in (0, 180)"));
        }
        if !(self.near_plane > 0.0 && self.far_plane > self.near_plane) {
            return Err(invalid("far_plane", "clip planes must satisfy 0 < near < far"));
        }
        if !(self.brush_radius > 0.0) {
            return Err(invalid("brush_radius", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.brush_strength) {
            return Err(invalid("brush_strength", "must lie in [0, 1]"));
        }
        if !(self.model_scale > 0.0) {
            return Err(invalid("model_scale", "must be positive"));
        }
        Ok(())
    }

    /// Clamp a camera distance into the configured range.
    pub fn clamp_camera_distance(&self, distance: f32) -> f32 {
        distance.clamp(self.min_camera_distance, self.max_camera_distance)
    }
}
