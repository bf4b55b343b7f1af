//! Hand skeleton landmarks as delivered by the external detector.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of points in a hand skeleton.
pub const LANDMARK_COUNT: usize = 21;

/// Indices into a [`LandmarkFrame`] that the classifier cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbTip = 4,
    IndexPip = 6,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleTip = 12,
    RingPip = 14,
    RingTip = 16,
    PinkyPip = 18,
    PinkyTip = 20,
}

impl HandLandmark {
    /// The palm point used to track hand position.
    pub const PALM: HandLandmark = HandLandmark::MiddleMcp;

    /// `(tip, proximal joint)` pairs for index, middle, ring and pinky.
    pub const FINGERS: [(HandLandmark, HandLandmark); 4] = [
        (HandLandmark::IndexTip, HandLandmark::IndexPip),
        (HandLandmark::MiddleTip, HandLandmark::MiddlePip),
        (HandLandmark::RingTip, HandLandmark::RingPip),
        (HandLandmark::PinkyTip, HandLandmark::PinkyPip),
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Reasons a frame from the detector cannot be used.
#[derive(Debug, Error, PartialEq)]
pub enum LandmarkError {
    #[error("Expected 21 landmarks, got {0}")]
    WrongCount(usize),

    #[error("Landmark {0} has a non-finite coordinate")]
    NonFinite(usize),
}

/// One detected hand: 21 points in normalized camera space (x, y in 0..1, y down).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkFrame {
    points: Vec<Vec3>,
}

impl LandmarkFrame {
    /// Wrap raw detector output without validating it.
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    /// Build a frame from plain `[x, y, z]` triples.
    pub fn from_arrays(points: &[[f32; 3]]) -> Self {
        Self {
            points: points.iter().map(|p| Vec3::from_array(*p)).collect(),
        }
    }

    /// Check that every expected index is present and finite.
    pub fn validate(&self) -> Result<(), LandmarkError> {
        if self.points.len() != LANDMARK_COUNT {
            return Err(LandmarkError::WrongCount(self.points.len()));
        }
        match self.points.iter().position(|p| !p.is_finite()) {
            Some(i) => Err(LandmarkError::NonFinite(i)),
            None => Ok(()),
        }
    }

    pub fn get(&self, landmark: HandLandmark) -> Option<Vec3> {
        self.points.get(landmark.index()).copied()
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [Vec3] {
        &mut self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
