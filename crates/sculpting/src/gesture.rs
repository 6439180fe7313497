//! Touch gesture interpreter.
//!
//! A small state machine that turns raw touch events into navigation or
//! sculpt intents. Dispatch is by touch count first: two fingers always
//! zoom, whatever the mode. Only the single-finger case consults the mode
//! controller to choose between rotating and sculpting.

use glam::Vec2;
use touchsculpt_config::InteractionConfig;
use tracing::trace;

use crate::mode::ModeController;
use crate::types::{GestureAction, InteractionMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// A touch event with the touches still on the screen after it.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    /// Active touch positions in screen pixels, oldest first
    pub touches: Vec<Vec2>,
}

impl TouchEvent {
    pub fn new(phase: TouchPhase, touches: &[Vec2]) -> Self {
        Self {
            phase,
            touches: touches.to_vec(),
        }
    }

    pub fn start(touches: &[Vec2]) -> Self {
        Self::new(TouchPhase::Start, touches)
    }

    pub fn moved(touches: &[Vec2]) -> Self {
        Self::new(TouchPhase::Move, touches)
    }

    pub fn end(remaining: &[Vec2]) -> Self {
        Self::new(TouchPhase::End, remaining)
    }

    pub fn cancel() -> Self {
        Self::new(TouchPhase::Cancel, &[])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    SingleTouchActive,
    TwoTouchActive,
}

/// Everything the interpreter remembers between events.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureState {
    pub phase: GesturePhase,
    /// 0, 1 or 2; extra fingers are ignored
    pub active_touch_count: u8,
    /// Reference point for frame-to-frame rotation deltas
    pub previous_single_touch_pos: Vec2,
    /// Inter-touch distance at the previous pinch event
    pub pinch_baseline_distance: f32,
    pub is_pinching: bool,
}

#[derive(Debug, Clone)]
pub struct GestureInterpreter {
    state: GestureState,
    zoom_sensitivity: f32,
}

impl GestureInterpreter {
    pub fn new(zoom_sensitivity: f32) -> Self {
        Self {
            state: GestureState::default(),
            zoom_sensitivity,
        }
    }

    pub fn from_config(config: &InteractionConfig) -> Self {
        Self::new(config.zoom_sensitivity)
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Consume one touch event and return the action it produces, if any.
    pub fn handle(&mut self, event: &TouchEvent, mode: &ModeController) -> Option<GestureAction> {
        let action = match event.phase {
            TouchPhase::Start => self.on_start(&event.touches, mode),
            TouchPhase::Move => self.on_move(&event.touches, mode),
            TouchPhase::End => {
                self.on_release(&event.touches);
                None
            }
            TouchPhase::Cancel => {
                self.on_release(&[]);
                None
            }
        };
        trace!("{:?} -> {:?}, {:?}", event.phase, self.state.phase, action);
        action
    }

    fn on_start(&mut self, touches: &[Vec2], mode: &ModeController) -> Option<GestureAction> {
        match touches {
            [] => None,
            [touch] => {
                self.begin_single(*touch);
                mode.sculpt_action().map(|_| GestureAction::SculptStroke {
                    screen_point: *touch,
                })
            }
            [first, second, ..] => {
                self.begin_pinch(*first, *second);
                None
            }
        }
    }

    fn on_move(&mut self, touches: &[Vec2], mode: &ModeController) -> Option<GestureAction> {
        match touches {
            [] => None,
            [touch] => {
                if self.state.phase != GesturePhase::SingleTouchActive {
                    // No reference point yet; this move becomes one
                    self.begin_single(*touch);
                    return None;
                }

                let previous = self.state.previous_single_touch_pos;
                self.state.previous_single_touch_pos = *touch;

                match mode.mode() {
                    InteractionMode::Navigate => {
                        let delta = *touch - previous;
                        Some(GestureAction::Rotate {
                            dx: delta.x,
                            dy: delta.y,
                        })
                    }
                    InteractionMode::Sculpt => mode.sculpt_action().map(|_| {
                        GestureAction::SculptStroke {
                            screen_point: *touch,
                        }
                    }),
                }
            }
            [first, second, ..] => {
                let current = first.distance(*second);
                if self.state.phase != GesturePhase::TwoTouchActive {
                    self.begin_pinch(*first, *second);
                    return None;
                }

                let baseline = self.state.pinch_baseline_distance;
                self.state.pinch_baseline_distance = current;
                (baseline > 0.0).then(|| GestureAction::Zoom {
                    delta: (current - baseline) * self.zoom_sensitivity,
                })
            }
        }
    }

    fn on_release(&mut self, remaining: &[Vec2]) {
        match remaining {
            [] => self.state = GestureState::default(),
            [touch] => {
                // Pinch ended with one finger still down: rotate from here on
                self.state.pinch_baseline_distance = 0.0;
                self.state.is_pinching = false;
                self.begin_single(*touch);
            }
            [first, second, ..] => self.begin_pinch(*first, *second),
        }
    }

    fn begin_single(&mut self, touch: Vec2) {
        self.state.phase = GesturePhase::SingleTouchActive;
        self.state.active_touch_count = 1;
        self.state.previous_single_touch_pos = touch;
    }

    fn begin_pinch(&mut self, first: Vec2, second: Vec2) {
        self.state.phase = GesturePhase::TwoTouchActive;
        self.state.active_touch_count = 2;
        self.state.pinch_baseline_distance = first.distance(second);
        self.state.is_pinching = true;
    }
}
