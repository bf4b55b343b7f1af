//! Scene representation for the photo tree
//!
//! Every object carries two precomputed targets, one for the assembled tree and
//! one for the scattered cloud. The whole set is rebuilt whenever the photo
//! list changes.

pub mod collection;
pub mod layout;
pub mod object;

pub use collection::ObjectSet;
pub use layout::{KindBands, LayoutConfig, LayoutGenerator};
pub use object::{IdleParams, ObjectId, PhotoRef, SceneObject};
