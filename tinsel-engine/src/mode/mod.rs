//! Display modes driven by gestures
//!
//! The machine debounces the gesture stream into one of three stable modes and
//! picks which photo to bring forward without repeating until every photo has
//! had a turn.

pub mod machine;
pub mod selection;

pub use machine::{DisplayMode, ModeMachine, ModeSnapshot};
pub use selection::ViewedSet;
