//! Scene objects and their identities

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use tinsel_data::{ObjectKind, Transform};

/// Identity of a scene object.
///
/// The generation changes on every rebuild, so ids never collide across
/// object sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    pub generation: u32,
    pub index: u32,
}

impl ObjectId {
    pub fn new(generation: u32, index: u32) -> Self {
        Self { generation, index }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.generation, self.index)
    }
}

/// Opaque handle to an uploaded photo (URL, path, texture key).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRef(String);

impl PhotoRef {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhotoRef {
    fn from(handle: &str) -> Self {
        Self::new(handle)
    }
}

impl From<String> for PhotoRef {
    fn from(handle: String) -> Self {
        Self(handle)
    }
}

/// Per-object randomness for ambient motion, fixed for the object's lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleParams {
    /// Phase offset of the vertical bob, radians.
    pub bob_phase: f32,
    /// Angular speed of the vertical bob, radians per second.
    pub bob_speed: f32,
    /// Spin about the vertical axis, radians per second.
    pub spin_speed: f32,
    /// Phase offset of the emissive pulse, radians.
    pub glow_phase: f32,
}

impl Default for IdleParams {
    fn default() -> Self {
        Self {
            bob_phase: 0.0,
            bob_speed: 1.0,
            spin_speed: 0.0,
            glow_phase: 0.0,
        }
    }
}

/// One ornament, photo or the star.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub color: Vec3,
    /// Photo to texture this object with.
    pub texture: Option<PhotoRef>,
    /// Target while the tree is assembled.
    pub assembled: Transform,
    /// Target while objects are scattered.
    pub scattered: Transform,
    pub base_scale: f32,
    pub idle: IdleParams,
}

impl SceneObject {
    pub fn is_photo(&self) -> bool {
        self.kind.is_photo()
    }

    pub fn is_star(&self) -> bool {
        self.kind == ObjectKind::Star
    }
}
