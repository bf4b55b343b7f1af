//! Tinsel Engine Crate
//!
//! The gesture-driven animation core of the photo tree. Gesture states from
//! `tinsel-capture` drive a small mode machine, and every rendered frame the
//! interpolator eases each scene object toward the transform its mode asks for.
//!
//! ## Modules
//!
//! - [`scene`]: scene objects, photo references and the tree/scatter layout
//! - [`mode`]: the display-mode machine and non-repeating focus selection
//! - [`motion`]: camera fitting, transform blending and per-frame interpolation
//! - [`engine`]: the facade driven by the camera and render callbacks

pub mod config;
pub mod engine;
pub mod mode;
pub mod motion;
pub mod scene;

pub use config::EngineConfig;
pub use engine::Engine;
pub use mode::{DisplayMode, ModeMachine, ModeSnapshot};
pub use motion::{CameraRig, Interpolator, LiveObject, ViewportError};
pub use scene::{ObjectId, ObjectSet, PhotoRef, SceneObject};
