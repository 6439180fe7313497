//! Interaction mode controller.
//!
//! Holds whether single-finger input navigates or sculpts, and which sculpt
//! action is selected. UI buttons drive it; the gesture interpreter only
//! reads it. Observers are notified after every change so the UI can
//! highlight the active controls.

use std::fmt;

use tracing::debug;

use crate::types::{InteractionMode, SculptAction};

/// Read-only view of the controller handed to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSnapshot {
    pub mode: InteractionMode,
    pub action: Option<SculptAction>,
    /// The add/subtract buttons are only shown in sculpt mode
    pub action_controls_visible: bool,
}

pub type ModeObserver = Box<dyn FnMut(&ModeSnapshot)>;

#[derive(Default)]
pub struct ModeController {
    mode: InteractionMode,
    action: Option<SculptAction>,
    observers: Vec<ModeObserver>,
}

impl fmt::Debug for ModeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeController")
            .field("mode", &self.mode)
            .field("action", &self.action)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn action(&self) -> Option<SculptAction> {
        self.action
    }

    /// Sculpt mode with an action selected: single touches deform the mesh.
    pub fn sculpt_action(&self) -> Option<SculptAction> {
        match self.mode {
            InteractionMode::Sculpt => self.action,
            InteractionMode::Navigate => None,
        }
    }

    pub fn snapshot(&self) -> ModeSnapshot {
        ModeSnapshot {
            mode: self.mode,
            action: self.action,
            action_controls_visible: self.mode == InteractionMode::Sculpt,
        }
    }

    /// Register a callback run after every mode or action change.
    pub fn subscribe(&mut self, observer: impl FnMut(&ModeSnapshot) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Flip between navigate and sculpt mode. Returns the new mode.
    ///
    /// The selected action survives the toggle, so returning to sculpt mode
    /// resumes with the same action.
    pub fn toggle_sculpt_mode(&mut self) -> InteractionMode {
        self.mode = match self.mode {
            InteractionMode::Navigate => InteractionMode::Sculpt,
            InteractionMode::Sculpt => InteractionMode::Navigate,
        };
        debug!("interaction mode: {:?}", self.mode);
        self.notify();
        self.mode
    }

    /// Select the sign used by future sculpt strokes.
    pub fn set_action(&mut self, action: SculptAction) {
        if self.mode != InteractionMode::Sculpt {
            debug!("sculpt action {:?} selected outside sculpt mode", action);
        }
        self.action = Some(action);
        self.notify();
    }

    fn notify(&mut self) {
        let snapshot = self.snapshot();
        for observer in &mut self.observers {
            observer(&snapshot);
        }
    }
}
