//! Replay of recorded detector output.
//!
//! A recording is a JSON-lines file, one sample per line:
//!
//! ```text
//! {"t": 0.033, "hands": [[[0.51, 0.82, 0.0], ... 21 points ...]]}
//! {"t": 0.066, "hands": []}
//! ```

use crate::source::{CaptureError, HandSample, LandmarkSource};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// Fastest sampling rate believed from recording timestamps.
const MAX_FRAME_RATE: f32 = 1000.0;

/// Landmark source backed by a recording loaded into memory.
pub struct RecordedSource {
    samples: Vec<HandSample>,
    cursor: usize,
    active: bool,
}

impl RecordedSource {
    /// Load a recording from a file path.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CaptureError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse a recording from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, CaptureError> {
        let mut samples = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let sample: HandSample = serde_json::from_str(trimmed)
                .map_err(|source| CaptureError::Parse { line: i + 1, source })?;
            samples.push(sample);
        }

        if samples.is_empty() {
            warn!("Recording contains no samples");
        } else {
            info!(
                "Loaded recording: {} samples over {:.2}s",
                samples.len(),
                samples.last().map(|s| s.timestamp).unwrap_or(0.0)
            );
        }

        Ok(Self {
            samples,
            cursor: 0,
            active: true,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Restart playback from the first sample.
    pub fn rewind(&mut self) {
        self.cursor = 0;
        self.active = true;
    }
}

impl LandmarkSource for RecordedSource {
    fn next_sample(&mut self) -> Result<Option<HandSample>, CaptureError> {
        if !self.active {
            return Err(CaptureError::Stopped);
        }
        let sample = self.samples.get(self.cursor).cloned();
        self.cursor += 1;
        if sample.is_none() {
            self.active = false;
        }
        Ok(sample)
    }

    /// Estimated from the timestamps of the recording.
    ///
    /// `None` when the timestamps do not give a plausible camera rate.
    fn frame_rate(&self) -> Option<f32> {
        let first = self.samples.first()?.timestamp;
        let last = self.samples.last()?.timestamp;
        let span = last - first;
        if self.samples.len() < 2 || !(span > 0.0) {
            return None;
        }
        let rate = ((self.samples.len() - 1) as f64 / span) as f32;
        if rate.is_finite() && rate <= MAX_FRAME_RATE {
            Some(rate)
        } else {
            warn!("Ignoring implausible recording rate {} fps", rate);
            None
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn stop(&mut self) {
        self.active = false;
        info!("Recording playback stopped at sample {}", self.cursor);
    }
}
