//! Perspective camera used to turn touches into world-space rays.
//!
//! The camera sits on the +Z axis looking toward the origin. Pinch zoom only
//! changes its distance; the projection intrinsics stay fixed except for the
//! aspect ratio, which follows the viewport.

use glam::{Mat4, Vec2, Vec3, Vec4};
use touchsculpt_config::{DisplayConfig, InteractionConfig};

use crate::raycast::Ray;

#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    /// Distance from the origin along +Z
    pub distance: f32,
    /// Vertical field of view in radians
    pub fov_y_radians: f32,
    /// Viewport width over height
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Minimum distance from the origin
    pub min_distance: f32,
    /// Maximum distance from the origin
    pub max_distance: f32,
}

impl PerspectiveCamera {
    pub fn from_config(config: &InteractionConfig, display: &DisplayConfig) -> Self {
        Self {
            distance: config.clamp_camera_distance(config.initial_camera_distance),
            fov_y_radians: config.field_of_view_degrees.to_radians(),
            aspect: display.aspect_ratio(),
            near: config.near_plane,
            far: config.far_plane,
            min_distance: config.min_camera_distance,
            max_distance: config.max_camera_distance,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.distance)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position(), Vec3::NEG_Z, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_radians, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Follow a viewport resize.
    pub fn set_viewport(&mut self, display: &DisplayConfig) {
        self.aspect = display.aspect_ratio();
    }

    /// Place the camera, respecting the distance limits.
    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(self.min_distance, self.max_distance);
    }

    /// Dolly toward the origin by `delta` (negative moves away).
    ///
    /// Returns the new, clamped distance.
    pub fn zoom(&mut self, delta: f32) -> f32 {
        self.set_distance(self.distance - delta);
        self.distance
    }

    /// World-space ray from the eye through a point in normalized device
    /// coordinates.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();

        let near = inverse * Vec4::new(ndc.x, ndc.y, -1.0, 1.0);
        let far = inverse * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;

        Ray::new(self.position(), (far - near).normalize_or_zero())
    }

    /// Project a world point to normalized device coordinates.
    ///
    /// Returns `None` for points behind the camera.
    pub fn project_to_ndc(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        Some(clip.truncate().truncate() / clip.w)
    }
}
