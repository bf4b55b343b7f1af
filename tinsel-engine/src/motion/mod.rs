//! Per-frame motion
//!
//! The interpolator turns the current mode snapshot into one immutable
//! [`TargetDescriptor`] per object, then eases each live transform toward it
//! with [`blend`]. Camera fitting lives here too because the focus transform is
//! computed relative to the camera.

pub mod blend;
pub mod camera;
pub mod interpolator;

pub use blend::{TargetDescriptor, blend, blend_factor};
pub use camera::{CameraFitConfig, CameraRig, ViewportError, fit_distance};
pub use interpolator::{FrameContext, Interpolator, LiveObject, MotionConfig, focus_transform};
