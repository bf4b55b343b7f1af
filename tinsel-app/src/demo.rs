//! Built-in gesture script used when no recording is given.

use tinsel_capture::{HandPose, ScriptedSource};

/// Placeholder photos hung on the tree for the demo.
pub const DEMO_PHOTOS: [&str; 6] = [
    "demo/fireplace.jpg",
    "demo/snowman.jpg",
    "demo/sledding.jpg",
    "demo/cookies.jpg",
    "demo/lights.jpg",
    "demo/family.jpg",
];

/// Seconds held by each step of the demo script.
const STEP_SECONDS: [f32; 6] = [2.0, 2.0, 1.5, 2.0, 0.5, 2.0];

/// Open, pinch, open, pinch, a short dropout, then a fist.
pub fn demo_script(camera_fps: f32) -> ScriptedSource {
    let steps = [
        Some(HandPose::open().at(0.45, 0.5).frame()),
        Some(HandPose::pinch().at(0.5, 0.45).frame()),
        Some(HandPose::open().at(0.55, 0.5).frame()),
        Some(HandPose::pinch().at(0.5, 0.55).frame()),
        None,
        Some(HandPose::fist().frame()),
    ];

    steps.into_iter().zip(STEP_SECONDS).fold(
        ScriptedSource::new(Vec::new()).with_frame_rate(camera_fps),
        |script, (frame, seconds)| {
            script.hold(frame, (seconds * camera_fps).round().max(1.0) as usize)
        },
    )
}

/// Length of the demo script in seconds.
#[cfg(test)]
pub const DEMO_SECONDS: f32 = 10.0;

#[cfg(test)]
mod tests {
    use super::*;
    use tinsel_capture::LandmarkSource;

    #[test]
    fn test_demo_script_length() {
        let script = demo_script(30.0);
        assert_eq!(script.remaining(), (DEMO_SECONDS * 30.0) as usize);
        assert_eq!(script.frame_rate(), Some(30.0));
        assert!(script.is_active());
        assert_eq!(STEP_SECONDS.iter().sum::<f32>(), DEMO_SECONDS);
    }
}
