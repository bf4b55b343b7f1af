//! Synthetic hand skeletons.
//!
//! Builds detector-shaped landmark frames for canned postures so demos and
//! tests can drive the classifier without a camera.

use glam::{Vec2, Vec3};
use tinsel_data::{LANDMARK_COUNT, LandmarkFrame};

/// Knuckle offsets from the palm; the middle knuckle is the palm itself.
const FINGER_SPREAD: [f32; 4] = [-0.03, 0.0, 0.03, 0.06];
const WRIST_DROP: f32 = 0.15;
const PIP_RISE: f32 = 0.06;
const DIP_RISE: f32 = 0.10;
const TIP_RISE: f32 = 0.13;

/// Where the thumb tip ends up.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Thumb {
    /// Spread away from the palm.
    Out,
    /// Folded over the curled fingers.
    Tucked,
    /// Touching the index fingertip.
    Pinch,
}

/// A canned hand posture placed at a palm location in image space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPose {
    palm: Vec2,
    curled: [bool; 4],
    thumb: Thumb,
}

impl HandPose {
    /// All fingers extended, thumb spread.
    pub fn open() -> Self {
        Self {
            palm: Vec2::new(0.5, 0.5),
            curled: [false; 4],
            thumb: Thumb::Out,
        }
    }

    /// All four fingers curled, thumb folded over them.
    pub fn fist() -> Self {
        Self {
            curled: [true; 4],
            thumb: Thumb::Tucked,
            ..Self::open()
        }
    }

    /// Thumb and index fingertips touching, other fingers extended.
    pub fn pinch() -> Self {
        Self {
            thumb: Thumb::Pinch,
            ..Self::open()
        }
    }

    /// Index and middle extended, ring and pinky curled: two curled, no pinch.
    pub fn peace() -> Self {
        Self {
            curled: [false, false, true, true],
            thumb: Thumb::Tucked,
            ..Self::open()
        }
    }

    /// Move the palm to `(x, y)` in normalized image coordinates.
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.palm = Vec2::new(x, y);
        self
    }

    /// Override the curl of one finger (0 = index .. 3 = pinky).
    pub fn with_curled(mut self, finger: usize, curled: bool) -> Self {
        if let Some(slot) = self.curled.get_mut(finger) {
            *slot = curled;
        }
        self
    }

    /// Bring the thumb tip onto the index fingertip.
    pub fn pinching(mut self) -> Self {
        self.thumb = Thumb::Pinch;
        self
    }

    pub fn curled_count(&self) -> usize {
        self.curled.iter().filter(|c| **c).count()
    }

    /// Build the 21-point landmark frame for this posture.
    pub fn frame(&self) -> LandmarkFrame {
        let p = |x: f32, y: f32| Vec3::new(self.palm.x + x, self.palm.y + y, 0.0);
        let mut points = vec![Vec3::ZERO; LANDMARK_COUNT];

        points[0] = p(0.0, WRIST_DROP);

        for (finger, dx) in FINGER_SPREAD.iter().copied().enumerate() {
            let base = 5 + finger * 4;
            points[base] = p(dx, 0.0);
            points[base + 1] = p(dx, -PIP_RISE);
            if self.curled[finger] {
                // Folded back down past the knuckle, toward the wrist.
                points[base + 2] = p(dx, -0.02);
                points[base + 3] = p(dx, 0.03);
            } else {
                points[base + 2] = p(dx, -DIP_RISE);
                points[base + 3] = p(dx, -TIP_RISE);
            }
        }

        // Pinching pulls the index tip down to meet the thumb.
        if self.thumb == Thumb::Pinch && !self.curled[0] {
            points[7] = p(-0.055, -0.075);
            points[8] = p(-0.06, -0.08);
        }

        points[1] = p(-0.05, 0.11);
        points[2] = p(-0.08, 0.07);
        points[3] = p(-0.095, 0.04);
        points[4] = match self.thumb {
            Thumb::Out => p(-0.12, 0.02),
            Thumb::Tucked => p(0.05, 0.06),
            Thumb::Pinch => {
                let index_tip = points[8];
                index_tip + Vec3::new(0.01, 0.01, 0.0)
            }
        };

        LandmarkFrame::new(points)
    }
}

impl Default for HandPose {
    fn default() -> Self {
        Self::open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinsel_data::HandLandmark;
    use tinsel_data::geometry::{is_curled, planar_distance};

    fn count_curled(frame: &LandmarkFrame) -> usize {
        let wrist = frame.get(HandLandmark::Wrist).unwrap();
        HandLandmark::FINGERS
            .iter()
            .filter(|(tip, pip)| is_curled(frame.get(*tip).unwrap(), frame.get(*pip).unwrap(), wrist))
            .count()
    }

    fn pinch_distance(frame: &LandmarkFrame) -> f32 {
        planar_distance(
            frame.get(HandLandmark::ThumbTip).unwrap(),
            frame.get(HandLandmark::IndexTip).unwrap(),
        )
    }

    #[test]
    fn test_presets_have_expected_geometry() {
        let open = HandPose::open().frame();
        assert_eq!(open.validate(), Ok(()));
        assert_eq!(count_curled(&open), 0);
        assert!(pinch_distance(&open) > 0.06);

        let fist = HandPose::fist().frame();
        assert_eq!(count_curled(&fist), 4);
        assert!(pinch_distance(&fist) > 0.06);

        let pinch = HandPose::pinch().frame();
        assert_eq!(count_curled(&pinch), 0);
        assert!(pinch_distance(&pinch) < 0.06);

        let peace = HandPose::peace().frame();
        assert_eq!(count_curled(&peace), 2);
        assert!(pinch_distance(&peace) > 0.06);
    }

    #[test]
    fn test_curl_overrides() {
        let pose = HandPose::open().with_curled(1, true).with_curled(9, true);
        assert_eq!(pose.curled_count(), 1);
        assert_eq!(count_curled(&pose.frame()), 1);
    }

    #[test]
    fn test_palm_location() {
        let frame = HandPose::open().at(0.2, 0.7).frame();
        let palm = frame.get(HandLandmark::PALM).unwrap();
        assert!(palm.abs_diff_eq(Vec3::new(0.2, 0.7, 0.0), 1e-6));

        for pose in [HandPose::fist(), HandPose::pinch(), HandPose::peace()] {
            let palm = pose.at(0.35, 0.4).frame().get(HandLandmark::PALM).unwrap();
            assert!(palm.abs_diff_eq(Vec3::new(0.35, 0.4, 0.0), 1e-6));
        }
    }
}
