//! Engine configuration

use crate::motion::{CameraFitConfig, MotionConfig};
use crate::scene::LayoutConfig;
use serde::{Deserialize, Serialize};
use tinsel_capture::ClassifierConfig;
use tinsel_data::StarConfig;

/// Every tuning knob of the engine.
///
/// All sections default individually, so a JSON file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub classifier: ClassifierConfig,
    pub layout: LayoutConfig,
    pub motion: MotionConfig,
    pub camera: CameraFitConfig,
    pub star: StarConfig,
    /// Initial viewport size in pixels.
    pub viewport: (u32, u32),
    /// Seed for layout and focus selection.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            layout: LayoutConfig::default(),
            motion: MotionConfig::default(),
            camera: CameraFitConfig::default(),
            star: StarConfig::default(),
            viewport: (1280, 720),
            seed: 0x7115e1,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = (width, height);
        self
    }
}
