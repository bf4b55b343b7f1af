//! Camera framing
//!
//! The camera sits on its viewing axis, looking at the origin, and backs off
//! far enough to keep a fixed tree-sized box in view whatever the window shape.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use thiserror::Error;
use tracing::{info, warn};

/// Viewport or lens values that would produce non-finite framing.
#[derive(Debug, Error, PartialEq)]
pub enum ViewportError {
    #[error("Invalid viewport size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Invalid vertical field of view: {0} radians")]
    InvalidFov(f32),
}

/// What the camera has to keep in frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraFitConfig {
    /// World-space height that must fit vertically.
    pub target_height: f32,
    /// World-space width that must fit horizontally.
    pub target_width: f32,
    /// The camera never comes closer than this.
    pub min_distance: f32,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraFitConfig {
    fn default() -> Self {
        Self {
            target_height: 20.0,
            target_width: 16.0,
            min_distance: 18.0,
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 200.0,
        }
    }
}

/// Distance needed to frame the target box for a vertical FOV (radians) and aspect.
pub fn fit_distance(
    fov_y: f32,
    aspect: f32,
    config: &CameraFitConfig,
) -> Result<f32, ViewportError> {
    if !fov_y.is_finite() || fov_y <= 0.0 || fov_y >= PI {
        return Err(ViewportError::InvalidFov(fov_y));
    }
    let half_tan = (fov_y * 0.5).tan();
    let for_height = config.target_height * 0.5 / half_tan;
    let for_width = config.target_width * 0.5 / (half_tan * aspect);
    Ok(for_height.max(for_width).max(config.min_distance))
}

fn validate_size(width: u32, height: u32) -> Result<f32, ViewportError> {
    if width == 0 || height == 0 {
        return Err(ViewportError::InvalidSize { width, height });
    }
    Ok(width as f32 / height as f32)
}

/// Camera pose and lens, refit whenever the viewport changes.
#[derive(Debug, Clone)]
pub struct CameraRig {
    config: CameraFitConfig,
    width: u32,
    height: u32,
    fov_y: f32,
    distance: f32,
    orientation: Quat,
}

impl CameraRig {
    /// Create a camera framed for a `width` x `height` viewport.
    pub fn new(config: CameraFitConfig, width: u32, height: u32) -> Result<Self, ViewportError> {
        let aspect = validate_size(width, height)?;
        let fov_y = config.fov_y_degrees.to_radians();
        let distance = fit_distance(fov_y, aspect, &config)?;
        Ok(Self {
            config,
            width,
            height,
            fov_y,
            distance,
            orientation: Quat::IDENTITY,
        })
    }

    /// Refit for a new viewport size. Invalid sizes leave the camera untouched.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<f32, ViewportError> {
        let refit = validate_size(width, height)
            .and_then(|aspect| fit_distance(self.fov_y, aspect, &self.config));
        match refit {
            Ok(distance) => {
                self.width = width;
                self.height = height;
                self.apply_distance(distance);
                Ok(distance)
            }
            Err(e) => {
                warn!("Ignoring resize: {}", e);
                Err(e)
            }
        }
    }

    /// Change the vertical field of view. Invalid values leave the camera untouched.
    pub fn set_fov_degrees(&mut self, degrees: f32) -> Result<f32, ViewportError> {
        let fov_y = degrees.to_radians();
        match fit_distance(fov_y, self.aspect(), &self.config) {
            Ok(distance) => {
                self.fov_y = fov_y;
                self.apply_distance(distance);
                Ok(distance)
            }
            Err(e) => {
                warn!("Ignoring field of view change: {}", e);
                Err(e)
            }
        }
    }

    /// Turn the viewing axis. The camera keeps its distance from the origin.
    pub fn set_orientation(&mut self, orientation: Quat) {
        if orientation.is_finite() && orientation.length_squared() > 0.0 {
            self.orientation = orientation.normalize();
        }
    }

    fn apply_distance(&mut self, distance: f32) {
        if (distance - self.distance).abs() > f32::EPSILON {
            info!(
                "Camera refit: {}x{} fov {:.1}° -> distance {:.2}",
                self.width,
                self.height,
                self.fov_y.to_degrees(),
                distance
            );
        }
        self.distance = distance;
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Camera position in world space.
    pub fn position(&self) -> Vec3 {
        self.orientation * Vec3::new(0.0, 0.0, self.distance)
    }

    /// Unit viewing direction.
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// Point on the viewing axis `standoff` units in front of the camera.
    pub fn point_ahead(&self, standoff: f32) -> Vec3 {
        self.position() + self.forward() * standoff
    }

    /// Height of the view frustum at `standoff`.
    pub fn visible_height(&self, standoff: f32) -> f32 {
        2.0 * standoff * (self.fov_y * 0.5).tan()
    }

    /// Uniform scale that makes a unit quad fill `fill` of the tighter viewport
    /// dimension at `standoff`.
    pub fn fill_scale(&self, standoff: f32, fill: f32) -> f32 {
        let height = self.visible_height(standoff);
        let width = height * self.aspect();
        fill * height.min(width)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position()).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect(), self.config.near, self.config.far)
    }
}
