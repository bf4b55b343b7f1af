//! Gesture classification from a single hand skeleton.
//!
//! Each camera frame produces one [`GestureState`]. Classification is purely
//! geometric: finger curl is judged by fingertip-to-wrist distance and pinch by
//! the thumb-to-index gap. The only state carried between frames is the
//! smoothed palm position.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tinsel_data::geometry::{is_curled, mirrored_ndc, planar_distance};
use tinsel_data::{HandLandmark, LandmarkFrame};
use tracing::debug;

/// Thresholds and smoothing for [`GestureClassifier`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// EMA weight of the newest palm sample.
    pub smoothing: f32,
    /// Thumb-to-index distance below which the hand counts as pinching.
    pub pinch_threshold: f32,
    /// Minimum curled fingers for a fist.
    pub fist_min_curled: usize,
    /// Maximum curled fingers for an open hand.
    pub open_max_curled: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.3,
            pinch_threshold: 0.06,
            fist_min_curled: 3,
            open_max_curled: 1,
        }
    }
}

/// Discrete reading of a [`GestureState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    Fist,
    Open,
    Pinch,
    None,
}

/// Classifier output for one camera frame.
///
/// At most one of the three flags is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureState {
    pub is_fist: bool,
    pub is_open: bool,
    pub is_pinching: bool,
    /// Smoothed palm position in `[-1, 1]²`, x mirrored, y up.
    pub hand_position: Vec2,
    /// Thumb-to-index distance in normalized landmark units.
    pub pinch_distance: f32,
    /// Whether a usable hand was in the frame.
    pub hand_detected: bool,
}

impl GestureState {
    /// State reported when no usable hand is in view.
    pub const NO_HAND: Self = Self {
        is_fist: false,
        is_open: false,
        is_pinching: false,
        hand_position: Vec2::ZERO,
        pinch_distance: 1.0,
        hand_detected: false,
    };

    pub fn gesture(&self) -> Gesture {
        if self.is_pinching {
            Gesture::Pinch
        } else if self.is_fist {
            Gesture::Fist
        } else if self.is_open {
            Gesture::Open
        } else {
            Gesture::None
        }
    }

    /// Human-readable status line for the UI.
    pub fn status(&self) -> &'static str {
        match (self.hand_detected, self.gesture()) {
            (false, _) => "No hand detected",
            (true, Gesture::Fist) => "Fist: assembling tree",
            (true, Gesture::Open) => "Open hand: scattering",
            (true, Gesture::Pinch) => "Pinch: focusing photo",
            (true, Gesture::None) => "Hand detected",
        }
    }
}

impl Default for GestureState {
    fn default() -> Self {
        Self::NO_HAND
    }
}

/// Turns landmark frames into gesture states, smoothing the palm position.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    config: ClassifierConfig,
    smoothed: Vec2,
}

impl GestureClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            smoothed: Vec2::ZERO,
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// The stored EMA accumulator, which survives frames without a hand.
    pub fn smoothed_position(&self) -> Vec2 {
        self.smoothed
    }

    /// Classify one frame. `None` or an unusable frame yields [`GestureState::NO_HAND`].
    ///
    /// A missing hand reports a zero position but leaves the accumulator alone,
    /// so a returning hand resumes smoothing from where it was last seen.
    pub fn classify(&mut self, frame: Option<&LandmarkFrame>) -> GestureState {
        let Some(frame) = frame else {
            return GestureState::NO_HAND;
        };
        if let Err(e) = frame.validate() {
            debug!("Discarding landmark frame: {}", e);
            return GestureState::NO_HAND;
        }
        let Some(hand) = HandGeometry::measure(frame) else {
            return GestureState::NO_HAND;
        };

        self.smoothed += (hand.palm - self.smoothed) * self.config.smoothing;

        let pinch_geo = hand.pinch_distance < self.config.pinch_threshold;
        let mut state = GestureState {
            hand_position: self.smoothed,
            pinch_distance: hand.pinch_distance,
            hand_detected: true,
            ..GestureState::NO_HAND
        };

        // First match wins; two curled fingers without a pinch stays unclassified.
        if pinch_geo && hand.curled < self.config.fist_min_curled {
            state.is_pinching = true;
        } else if hand.curled >= self.config.fist_min_curled {
            state.is_fist = true;
        } else if hand.curled <= self.config.open_max_curled {
            state.is_open = true;
        }

        state
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

/// Raw per-frame measurements.
struct HandGeometry {
    palm: Vec2,
    curled: usize,
    pinch_distance: f32,
}

impl HandGeometry {
    fn measure(frame: &LandmarkFrame) -> Option<Self> {
        let wrist = frame.get(HandLandmark::Wrist)?;
        let palm = mirrored_ndc(frame.get(HandLandmark::PALM)?);

        let mut curled = 0;
        for (tip, proximal) in HandLandmark::FINGERS {
            if is_curled(frame.get(tip)?, frame.get(proximal)?, wrist) {
                curled += 1;
            }
        }

        let pinch_distance = planar_distance(
            frame.get(HandLandmark::ThumbTip)?,
            frame.get(HandLandmark::IndexTip)?,
        );

        Some(Self {
            palm,
            curled,
            pinch_distance,
        })
    }
}
