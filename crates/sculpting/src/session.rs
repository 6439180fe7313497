//! Interactive sculpting session.
//!
//! Owns every piece of interaction state and routes touch events through the
//! gesture interpreter to the camera, the model transform or the
//! hit test + displacement pipeline. Everything runs on the caller's thread;
//! each event is fully applied before the call returns.

use glam::Vec2;
use touchsculpt_config::{ConfigError, DisplayConfig, InteractionConfig};
use tracing::{debug, trace, warn};

use crate::camera::PerspectiveCamera;
use crate::deformation;
use crate::error::SculptError;
use crate::gesture::{GestureInterpreter, GestureState, TouchEvent};
use crate::hit_test;
use crate::mode::{ModeController, ModeSnapshot};
use crate::model::{LoadedModel, ModelSender, ModelSlot};
use crate::render::RenderSnapshot;
use crate::types::{GestureAction, InteractionMode, SculptAction, SculptParameters};

#[derive(Debug)]
pub struct SculptSession {
    config: InteractionConfig,
    display: DisplayConfig,
    camera: PerspectiveCamera,
    mode: ModeController,
    gestures: GestureInterpreter,
    /// Radius and strength for the next stroke; the sign comes from the
    /// selected action at stroke time
    brush: SculptParameters,
    model: ModelSlot,
    last_diagnostic: Option<SculptError>,
}

impl SculptSession {
    pub fn new(config: InteractionConfig, display: DisplayConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            camera: PerspectiveCamera::from_config(&config, &display),
            gestures: GestureInterpreter::from_config(&config),
            brush: SculptParameters::new(
                config.brush_radius,
                config.brush_strength,
                SculptAction::Add,
            ),
            mode: ModeController::new(),
            model: ModelSlot::Empty,
            last_diagnostic: None,
            config,
            display,
        })
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode.mode()
    }

    pub fn action(&self) -> Option<SculptAction> {
        self.mode.action()
    }

    pub fn gesture_state(&self) -> &GestureState {
        self.gestures.state()
    }

    pub fn brush(&self) -> &SculptParameters {
        &self.brush
    }

    pub fn model(&self) -> Option<&LoadedModel> {
        self.model.loaded()
    }

    pub fn model_slot(&self) -> &ModelSlot {
        &self.model
    }

    /// The most recent skipped operation, if any.
    pub fn last_diagnostic(&self) -> Option<&SculptError> {
        self.last_diagnostic.as_ref()
    }

    pub fn take_diagnostic(&mut self) -> Option<SculptError> {
        self.last_diagnostic.take()
    }

    /// Start loading a model. Any current model is dropped.
    pub fn begin_model_load(&mut self) -> ModelSender {
        let (sender, slot) = ModelSlot::pending();
        self.model = slot;
        sender
    }

    /// Pick up a finished load. Returns true on the call that installs the
    /// model.
    pub fn poll_model(&mut self) -> bool {
        match self.model.poll(self.config.model_scale) {
            Ok(true) => {
                self.camera.set_distance(self.config.loaded_camera_distance);
                true
            }
            Ok(false) => false,
            Err(err) => {
                self.last_diagnostic = Some(err);
                false
            }
        }
    }

    /// Process one touch event and apply the action it produced.
    pub fn handle_touch(&mut self, event: &TouchEvent) -> Option<GestureAction> {
        self.poll_model();
        let action = self.gestures.handle(event, &self.mode)?;
        self.apply_action(action);
        Some(action)
    }

    pub fn apply_action(&mut self, action: GestureAction) {
        match action {
            GestureAction::Rotate { dx, dy } => match self.model.loaded_mut() {
                Ok(model) => model
                    .transform
                    .rotate_by(dx, dy, self.config.rotation_sensitivity),
                Err(_) => trace!("rotation ignored, no model"),
            },
            GestureAction::Zoom { delta } => {
                let distance = self.camera.zoom(delta);
                trace!("camera distance {}", distance);
            }
            GestureAction::SculptStroke { screen_point } => {
                let Some(action) = self.mode.sculpt_action() else {
                    return;
                };
                if let Err(err) = self.sculpt_at(screen_point, action) {
                    warn!("sculpt stroke skipped: {}", err);
                    self.last_diagnostic = Some(err);
                }
            }
        }
    }

    fn sculpt_at(&mut self, screen: Vec2, action: SculptAction) -> Result<usize, SculptError> {
        let params = self.brush.with_action(action);
        let viewport = Vec2::new(self.display.width_f32(), self.display.height_f32());
        let model = self.model.loaded_mut()?;
        let hit = hit_test::pick(screen, viewport, &self.camera, Some(&mut *model))?;
        deformation::apply(Some(&mut model.mesh), &hit, &params)
    }

    /// Change the brush between strokes. Invalid values leave it unchanged.
    pub fn set_brush(&mut self, radius: f32, strength: f32) -> Result<(), SculptError> {
        let brush = SculptParameters {
            radius,
            strength,
            ..self.brush
        };
        brush.validate()?;
        debug!("brush radius={} strength={}", radius, strength);
        self.brush = brush;
        Ok(())
    }

    pub fn toggle_sculpt_mode(&mut self) -> InteractionMode {
        self.mode.toggle_sculpt_mode()
    }

    pub fn set_action(&mut self, action: SculptAction) {
        self.mode.set_action(action);
    }

    pub fn subscribe_mode(&mut self, observer: impl FnMut(&ModeSnapshot) + 'static) {
        self.mode.subscribe(observer);
    }

    /// Follow a viewport resize.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.display.width = width;
        self.display.height = height;
        self.camera.set_viewport(&self.display);
    }

    pub fn render_snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(
            &self.camera,
            self.model.loaded().map(|model| (&model.mesh, &model.transform)),
        )
    }

    /// Mark the current geometry as uploaded.
    pub fn acknowledge_render(&mut self) {
        if let Ok(model) = self.model.loaded_mut() {
            model.mesh.clear_render_dirty();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use glam::Vec3;

    fn session() -> SculptSession {
        SculptSession::new(InteractionConfig::default(), DisplayConfig::new(800, 800)).unwrap()
    }

    /// 5x5 unit grid in the z = 0 plane, centered on the origin.
    fn grid() -> Mesh {
        let mut positions = Vec::new();
        for y in 0..5 {
            for x in 0..5 {
                positions.push(Vec3::new(x as f32 - 2.0, y as f32 - 2.0, 0.0));
            }
        }
        let mut indices = Vec::new();
        for y in 0..4u32 {
            for x in 0..4u32 {
                let i = y * 5 + x;
                indices.extend_from_slice(&[i, i + 1, i + 6, i, i + 6, i + 5]);
            }
        }
        Mesh::new(positions, Vec::new(), indices).unwrap()
    }

    fn loaded_session() -> SculptSession {
        let mut session = session();
        let sender = session.begin_model_load();
        assert!(sender.deliver(grid()));
        assert!(session.poll_model());
        session
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = InteractionConfig {
            brush_radius: 0.0,
            ..InteractionConfig::default()
        };
        assert!(SculptSession::new(config, DisplayConfig::default()).is_err());
    }

    #[test]
    fn test_load_places_model_and_moves_camera() {
        let session = loaded_session();
        assert_eq!(session.camera().distance, 10.0);
        let model = session.model().unwrap();
        assert_eq!(model.transform.scale, 0.2);
        assert_eq!(model.transform.translation, Vec3::ZERO);
    }

    #[test]
    fn test_failed_load_is_reported() {
        let mut session = session();
        let sender = session.begin_model_load();
        assert!(sender.fail("unsupported format"));
        assert!(!session.poll_model());
        assert!(matches!(
            session.last_diagnostic(),
            Some(SculptError::ModelLoadFailed(_))
        ));
        assert!(session.model().is_none());
    }

    #[test]
    fn test_sculpt_without_model_records_diagnostic() {
        let mut session = session();
        session.toggle_sculpt_mode();
        session.set_action(SculptAction::Add);

        let action = session.handle_touch(&TouchEvent::start(&[Vec2::new(400.0, 400.0)]));
        assert!(matches!(action, Some(GestureAction::SculptStroke { .. })));
        assert_eq!(session.last_diagnostic(), Some(&SculptError::NoMeshLoaded));
    }

    #[test]
    fn test_drag_rotates_model() {
        let mut session = loaded_session();
        session.handle_touch(&TouchEvent::start(&[Vec2::new(100.0, 100.0)]));
        session.handle_touch(&TouchEvent::moved(&[Vec2::new(120.0, 100.0)]));
        let rotation = session.model().unwrap().transform.rotation;
        assert!((rotation.y - 0.3).abs() < 1e-6);
        assert_eq!(rotation.x, 0.0);
    }

    #[test]
    fn test_pinch_zooms_camera() {
        let mut session = loaded_session();
        let pinch = [Vec2::new(300.0, 400.0), Vec2::new(500.0, 400.0)];
        let spread = [Vec2::new(200.0, 400.0), Vec2::new(600.0, 400.0)];
        session.handle_touch(&TouchEvent::start(&pinch));
        session.handle_touch(&TouchEvent::moved(&spread));
        // Spread of 200 px at 0.01 per px moves the camera 2 units closer
        assert!((session.camera().distance - 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_set_brush_validates() {
        let mut session = session();
        assert!(session.set_brush(0.8, 0.3).is_ok());
        assert_eq!(session.brush().radius, 0.8);

        let err = session.set_brush(0.8, 1.5).unwrap_err();
        assert!(matches!(err, SculptError::InvalidParameters { .. }));
        assert_eq!(session.brush().strength, 0.3);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut session = session();
        session.set_viewport(1600, 800);
        assert_eq!(session.camera().aspect, 2.0);
    }

    #[test]
    fn test_render_acknowledge_clears_dirty() {
        let mut session = loaded_session();
        assert!(session.render_snapshot().mesh_dirty);
        session.acknowledge_render();
        assert!(!session.render_snapshot().mesh_dirty);
    }
}
