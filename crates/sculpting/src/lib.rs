//! Touch-driven mesh sculpting core.
//!
//! Turns raw touch events into camera navigation, model rotation and local
//! mesh deformation. Rendering, windowing and model parsing stay with the
//! embedding application.
//!
//! # Architecture
//!
//! - **Gesture**: touch events to rotate / zoom / sculpt intents
//! - **Mode**: navigate vs. sculpt, and the selected add/subtract action
//! - **Hit test**: screen point to model-local surface point via the camera ray
//! - **Spatial**: lazily rebuilt triangle BVH backing every ray query
//! - **Deformation**: linear-falloff displacement toward or away from a hit
//! - **Session**: owns all of the above and applies actions in arrival order
//! - **Render**: per-frame snapshot with a dirty flag for vertex uploads

pub mod camera;
pub mod deformation;
pub mod error;
pub mod gesture;
pub mod mesh;
pub mod mode;
pub mod model;
pub mod raycast;
pub mod render;
pub mod session;
pub mod spatial;
pub mod types;

pub use camera::PerspectiveCamera;
pub use error::{MeshError, SculptError};
pub use gesture::{GestureInterpreter, GesturePhase, GestureState, TouchEvent, TouchPhase};
pub use mesh::Mesh;
pub use mode::{ModeController, ModeSnapshot};
pub use model::{LoadedModel, ModelSender, ModelSlot, ModelTransform};
pub use raycast::Ray;
pub use render::{RenderGeometry, RenderSnapshot, RenderVertex};
pub use session::SculptSession;
pub use spatial::{Aabb, SpatialIndex};
pub use types::{GestureAction, HitResult, InteractionMode, SculptAction, SculptParameters};

pub use touchsculpt_config::{DisplayConfig, InteractionConfig};
