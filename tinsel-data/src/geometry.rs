//! Small vector and angle helpers shared by the classifier and the layout code.

use glam::{Vec2, Vec3};

/// Euclidean distance between two landmarks, ignoring depth.
///
/// Detector depth is relative and noisy, so every hand measurement works in
/// the image plane.
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    a.truncate().distance(b.truncate())
}

/// A finger is curled when its tip is closer to the wrist than its proximal joint.
pub fn is_curled(tip: Vec3, proximal: Vec3, wrist: Vec3) -> bool {
    planar_distance(tip, wrist) < planar_distance(proximal, wrist)
}

/// Map a normalized image coordinate (0..1, y down) to `[-1, 1]²` with the
/// horizontal axis mirrored and y pointing up.
pub fn mirrored_ndc(point: Vec3) -> Vec2 {
    Vec2::new(1.0 - 2.0 * point.x, 1.0 - 2.0 * point.y).clamp(Vec2::NEG_ONE, Vec2::ONE)
}

/// Yaw (rotation about +Y) that turns the +Z reference axis onto `radial`.
///
/// Only the XZ components of `radial` are considered.
pub fn yaw_toward(radial: Vec3) -> f32 {
    radial.x.atan2(radial.z)
}

/// Unit vector in the XZ plane pointing away from the Y axis at `angle`.
pub fn radial_direction(angle: f32) -> Vec3 {
    Vec3::new(angle.cos(), 0.0, angle.sin())
}

/// Unnormalized face normal of a counter-clockwise triangle.
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_planar_distance_ignores_depth() {
        let a = Vec3::new(0.0, 0.0, 5.0);
        let b = Vec3::new(3.0, 4.0, -9.0);
        assert!((planar_distance(a, b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_is_curled() {
        let wrist = Vec3::new(0.5, 0.9, 0.0);
        let proximal = Vec3::new(0.5, 0.6, 0.0);
        assert!(is_curled(Vec3::new(0.5, 0.75, 0.0), proximal, wrist));
        assert!(!is_curled(Vec3::new(0.5, 0.4, 0.0), proximal, wrist));
    }

    #[test]
    fn test_mirrored_ndc() {
        assert_eq!(mirrored_ndc(Vec3::new(0.5, 0.5, 0.0)), Vec2::ZERO);
        // Left of the image is right of the viewer.
        assert_eq!(mirrored_ndc(Vec3::new(0.0, 0.0, 0.0)), Vec2::new(1.0, 1.0));
        assert_eq!(mirrored_ndc(Vec3::new(1.0, 1.0, 0.0)), Vec2::new(-1.0, -1.0));
        // Out-of-frame detections are clamped.
        assert_eq!(mirrored_ndc(Vec3::new(-0.5, 1.5, 0.0)), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_yaw_toward() {
        assert!(yaw_toward(Vec3::Z).abs() < 1e-6);
        assert!((yaw_toward(Vec3::X) - FRAC_PI_2).abs() < 1e-6);
        let rotated = glam::Quat::from_rotation_y(yaw_toward(radial_direction(0.7))) * Vec3::Z;
        assert!(rotated.abs_diff_eq(radial_direction(0.7), 1e-5));
    }

    #[test]
    fn test_face_normal() {
        let n = face_normal(Vec3::ZERO, Vec3::X, Vec3::Y).normalize();
        assert!((n - Vec3::Z).length() < 0.001);
    }
}
