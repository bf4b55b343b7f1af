//! Exponential easing of transforms

use glam::{Quat, Vec3};
use tinsel_data::Transform;

/// Below this difference a property snaps onto its target.
const SNAP_EPSILON: f32 = 1e-4;

/// Where an object should head this frame and how quickly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetDescriptor {
    pub transform: Transform,
    /// Fraction of the remaining distance covered per reference frame.
    pub rate: f32,
}

impl TargetDescriptor {
    pub fn new(transform: Transform, rate: f32) -> Self {
        Self { transform, rate }
    }
}

/// Per-frame blend weight for `rate`, corrected for frame time.
///
/// Equals `rate` when `dt` is exactly one reference frame.
pub fn blend_factor(rate: f32, dt: f32, reference_fps: f32) -> f32 {
    if !(dt > 0.0) || !(rate > 0.0) {
        return 0.0;
    }
    let rate = rate.min(1.0);
    (1.0 - (1.0 - rate).powf(dt * reference_fps)).clamp(0.0, 1.0)
}

/// Move `current` toward `target` by one frame of exponential smoothing.
pub fn blend(
    current: &Transform,
    target: &TargetDescriptor,
    dt: f32,
    reference_fps: f32,
) -> Transform {
    let t = blend_factor(target.rate, dt, reference_fps);
    let goal = &target.transform;

    Transform {
        position: ease_vec3(current.position, goal.position, t),
        rotation: ease_quat(current.rotation, goal.rotation, t),
        scale: ease_vec3(current.scale, goal.scale, t),
    }
}

fn ease_vec3(current: Vec3, goal: Vec3, t: f32) -> Vec3 {
    let next = current.lerp(goal, t);
    if next.abs_diff_eq(goal, SNAP_EPSILON) {
        goal
    } else {
        next
    }
}

fn ease_quat(current: Quat, goal: Quat, t: f32) -> Quat {
    if t <= 0.0 {
        return current;
    }
    let next = current.slerp(goal, t);
    // q and -q are the same rotation.
    if next.abs_diff_eq(goal, SNAP_EPSILON) || next.abs_diff_eq(-goal, SNAP_EPSILON) {
        goal
    } else {
        next
    }
}
