//! Core value types shared by layout, motion and the rendering boundary.
//!
//! GPU-facing records carry a bytemuck derive so the renderer can upload
//! them without another conversion step.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position, orientation and scale of a scene object relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Transform with a uniform scale.
    pub fn uniform(position: Vec3, rotation: Quat, scale: f32) -> Self {
        Self::new(position, rotation, Vec3::splat(scale))
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// What a scene object represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Ball,
    Gift,
    Photo,
    Candy,
    Light,
    Star,
}

impl ObjectKind {
    pub fn is_photo(self) -> bool {
        matches!(self, ObjectKind::Photo)
    }
}

/// Linear RGB colors used for ornaments.
pub mod palette {
    use glam::Vec3;

    pub const RED: Vec3 = Vec3::new(0.8, 0.05, 0.08);
    pub const GOLD: Vec3 = Vec3::new(1.0, 0.72, 0.18);
    pub const GIFT: Vec3 = Vec3::new(0.1, 0.45, 0.25);
    pub const CANDY: Vec3 = Vec3::new(0.95, 0.95, 0.95);
    pub const LIGHT: Vec3 = Vec3::new(1.0, 0.9, 0.6);
    pub const PHOTO: Vec3 = Vec3::ONE;
    pub const STAR: Vec3 = Vec3::new(1.0, 0.84, 0.0);
}

/// Per-object record uploaded to the renderer every frame.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceTransform {
    /// Column-major local-to-parent matrix.
    pub model: [[f32; 4]; 4],
    /// Emissive intensity; zero for objects that do not glow.
    pub emissive: f32,
    pub _pad: [f32; 3],
}

impl InstanceTransform {
    pub fn new(transform: &Transform, emissive: f32) -> Self {
        Self {
            model: transform.to_matrix().to_cols_array_2d(),
            emissive,
            _pad: [0.0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_matrix_roundtrip() {
        let t = Transform::uniform(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_y(0.5), 2.0);
        let (scale, rotation, translation) = t.to_matrix().to_scale_rotation_translation();
        assert!(scale.abs_diff_eq(Vec3::splat(2.0), 1e-5));
        assert!(rotation.abs_diff_eq(t.rotation, 1e-5));
        assert!(translation.abs_diff_eq(t.position, 1e-5));
    }

    #[test]
    fn test_instance_transform_layout() {
        assert_eq!(std::mem::size_of::<InstanceTransform>(), 80);
        let instance = InstanceTransform::new(&Transform::IDENTITY, 0.5);
        let bytes: &[u8] = bytemuck::bytes_of(&instance);
        assert_eq!(bytes.len(), 80);
        assert_eq!(instance.model, Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn test_object_kind_serde_names() {
        assert_eq!(ObjectKind::Photo, serde_json::from_str("\"photo\"").unwrap());
        assert!(ObjectKind::Photo.is_photo());
        assert!(!ObjectKind::Star.is_photo());
    }
}
