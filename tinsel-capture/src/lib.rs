//! Tinsel Capture - hand landmark input and gesture classification
//!
//! This crate sits at the boundary with the external hand detector:
//!
//! - [`LandmarkSource`] implementations deliver one [`HandSample`] per camera frame
//!   (recorded JSON-lines files, in-memory scripts)
//! - [`GestureClassifier`] turns the first detected hand into a smoothed
//!   [`GestureState`]
//! - [`HandPose`] synthesizes landmark frames for demos and tests
//!
//! ## Example
//!
//! ```ignore
//! use tinsel_capture::{GestureClassifier, LandmarkSource, RecordedSource};
//!
//! let mut source = RecordedSource::from_path("session.jsonl")?;
//! let mut classifier = GestureClassifier::default();
//! while let Some(sample) = source.next_sample()? {
//!     let state = classifier.classify(sample.first_hand());
//!     println!("{}", state.status());
//! }
//! ```

mod gesture;
mod pose;
mod recording;
mod source;

pub use gesture::{ClassifierConfig, Gesture, GestureClassifier, GestureState};
pub use pose::HandPose;
pub use recording::RecordedSource;
pub use source::{CaptureError, HandSample, LandmarkSource, ScriptedSource};
