//! Procedural faceted star for the tree topper.
//!
//! The star is a ridged polygon: a front apex and a back apex joined to a rim
//! that alternates between outer tips and inner notches. Every triangle gets
//! its own flat normal, so the mesh is emitted non-indexed.

use crate::geometry::face_normal;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, TAU};
use tracing::debug;

/// Shape parameters for [`build_star_mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    /// Number of star points.
    pub points: u32,
    /// Distance from the center to each tip.
    pub outer_radius: f32,
    /// Distance from the center to each notch between tips.
    pub inner_radius: f32,
    /// Offset of the front and back apex along Z.
    pub depth: f32,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            points: 5,
            outer_radius: 1.0,
            inner_radius: 0.45,
            depth: 0.35,
        }
    }
}

/// Flat-shaded star vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct StarVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Non-indexed triangle list, three vertices per facet.
#[derive(Debug, Clone, PartialEq)]
pub struct StarMesh {
    pub vertices: Vec<StarVertex>,
}

impl StarMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Raw vertex bytes for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Build the star described by `config`.
///
/// The result is a pure function of the config: same parameters, same mesh.
/// A star with fewer than two points is clamped to two.
pub fn build_star_mesh(config: &StarConfig) -> StarMesh {
    let points = config.points.max(2) as usize;
    let rim_len = points * 2;

    let rim: Vec<Vec3> = (0..rim_len)
        .map(|i| {
            let angle = FRAC_PI_2 + i as f32 * TAU / rim_len as f32;
            let radius = if i % 2 == 0 {
                config.outer_radius
            } else {
                config.inner_radius
            };
            Vec3::new(angle.cos() * radius, angle.sin() * radius, 0.0)
        })
        .collect();

    let front = Vec3::new(0.0, 0.0, config.depth);
    let back = Vec3::new(0.0, 0.0, -config.depth);

    let mut vertices = Vec::with_capacity(rim_len * 6);
    for i in 0..rim_len {
        let a = rim[i];
        let b = rim[(i + 1) % rim_len];
        push_facet(&mut vertices, front, a, b);
        push_facet(&mut vertices, back, b, a);
    }

    debug!(
        "Built star mesh: {} points, {} facets",
        points,
        vertices.len() / 3
    );

    StarMesh { vertices }
}

fn push_facet(vertices: &mut Vec<StarVertex>, a: Vec3, b: Vec3, c: Vec3) {
    let normal = face_normal(a, b, c).normalize_or_zero().to_array();
    for p in [a, b, c] {
        vertices.push(StarVertex {
            position: p.to_array(),
            normal,
        });
    }
}
