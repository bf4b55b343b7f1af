//! Common landmark source types and traits.

use std::collections::VecDeque;
use thiserror::Error;
use tinsel_data::LandmarkFrame;
use tracing::{debug, info};

/// Errors that can occur while reading landmarks.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Failed to parse sample on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Source has been stopped")]
    Stopped,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Detector output for one camera frame.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct HandSample {
    /// Seconds since the stream started.
    #[serde(rename = "t", default)]
    pub timestamp: f64,
    /// Detected hands, in detector order. Empty means no hand in view.
    #[serde(default)]
    pub hands: Vec<LandmarkFrame>,
}

impl HandSample {
    pub fn new(timestamp: f64, hands: Vec<LandmarkFrame>) -> Self {
        Self { timestamp, hands }
    }

    /// A sample in which the detector found nothing.
    pub fn empty(timestamp: f64) -> Self {
        Self::new(timestamp, Vec::new())
    }

    /// Only the first hand drives gestures.
    pub fn first_hand(&self) -> Option<&LandmarkFrame> {
        self.hands.first()
    }
}

/// Trait for anything that delivers landmark samples at its own cadence.
pub trait LandmarkSource {
    /// Get the next sample. `Ok(None)` means the stream is finished.
    fn next_sample(&mut self) -> Result<Option<HandSample>, CaptureError>;

    /// Get the sample rate, if known.
    fn frame_rate(&self) -> Option<f32>;

    /// Check if the source is still delivering.
    fn is_active(&self) -> bool;

    /// Stop delivering samples.
    fn stop(&mut self);
}

/// In-memory queue of samples.
#[derive(Debug)]
pub struct ScriptedSource {
    samples: VecDeque<HandSample>,
    frame_rate: Option<f32>,
    active: bool,
}

impl ScriptedSource {
    pub fn new(samples: impl IntoIterator<Item = HandSample>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
            frame_rate: None,
            active: true,
        }
    }

    /// Declare the rate the script was authored at.
    pub fn with_frame_rate(mut self, fps: f32) -> Self {
        self.frame_rate = Some(fps);
        self
    }

    /// Append `count` copies of one hand (or no hand) spaced at the frame rate.
    pub fn hold(mut self, frame: Option<LandmarkFrame>, count: usize) -> Self {
        let step = 1.0 / self.frame_rate.unwrap_or(30.0) as f64;
        let start = self
            .samples
            .back()
            .map(|s| s.timestamp + step)
            .unwrap_or(0.0);
        for i in 0..count {
            let t = start + i as f64 * step;
            let hands = frame.iter().cloned().collect();
            self.samples.push_back(HandSample::new(t, hands));
        }
        self
    }

    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl LandmarkSource for ScriptedSource {
    fn next_sample(&mut self) -> Result<Option<HandSample>, CaptureError> {
        if !self.active {
            return Err(CaptureError::Stopped);
        }
        let sample = self.samples.pop_front();
        if sample.is_none() {
            debug!("Scripted source exhausted");
            self.active = false;
        }
        Ok(sample)
    }

    fn frame_rate(&self) -> Option<f32> {
        self.frame_rate
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn stop(&mut self) {
        if self.active {
            info!("Scripted source stopped with {} samples left", self.samples.len());
        }
        self.active = false;
    }
}
