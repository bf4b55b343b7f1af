//! Tinsel Data Crate
//!
//! Shared value types and geometry for the tinsel gesture engine.
//! This crate is renderer-agnostic: it knows about hand landmarks, transforms
//! and procedural meshes, but nothing about how they are drawn.

pub mod geometry;
pub mod landmarks;
pub mod star;
pub mod types;

pub use landmarks::{HandLandmark, LANDMARK_COUNT, LandmarkError, LandmarkFrame};
pub use star::{StarConfig, StarMesh, StarVertex, build_star_mesh};
pub use types::{InstanceTransform, ObjectKind, Transform, palette};
