//! Headless simulation run with builder pattern.

use crate::config::AppError;
use crate::demo::demo_script;
use glam::Mat4;
use std::fmt;
use std::path::PathBuf;
use tinsel_capture::{LandmarkSource, RecordedSource};
use tinsel_engine::{
    DisplayMode, Engine, EngineConfig, LiveObject, ModeSnapshot, ObjectId, PhotoRef,
};
use tracing::{debug, info, warn};

/// Hand samples consumed per rendered frame before the backlog is dropped.
const MAX_SAMPLES_PER_FRAME: usize = 64;

/// Logging configuration.
pub struct LoggingConfig {
    pub level: String,
    pub enable_tracy: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_tracy: false,
        }
    }
}

/// What a finished run looked like.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub frames: usize,
    pub samples: usize,
    pub mode_changes: usize,
    pub mode: DisplayMode,
    pub focus: Option<ObjectId>,
    pub viewed: usize,
    pub generation: u32,
    pub objects: usize,
    pub star_vertices: usize,
    pub status: &'static str,
    /// A few live objects, the focused one first when there is one.
    pub sample: Vec<LiveObject>,
}

impl fmt::Display for SimulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Frames rendered:   {}", self.frames)?;
        writeln!(f, "Hand samples:      {}", self.samples)?;
        writeln!(f, "Mode changes:      {}", self.mode_changes)?;
        writeln!(f, "Final mode:        {}", self.mode)?;
        match self.focus {
            Some(id) => writeln!(f, "Focused photo:     {}", id)?,
            None => writeln!(f, "Focused photo:     none")?,
        }
        writeln!(f, "Photos viewed:     {}", self.viewed)?;
        writeln!(f, "Objects:           {} (generation {})", self.objects, self.generation)?;
        writeln!(f, "Star vertices:     {}", self.star_vertices)?;
        writeln!(f, "Status:            {}", self.status)?;
        for live in &self.sample {
            writeln!(
                f,
                "  {} {:?} pos {:.2} scale {:.2} glow {:.2}",
                live.id, live.kind, live.transform.position, live.transform.scale.x, live.emissive
            )?;
        }
        Ok(())
    }
}

/// Builder for configuring and running a simulation.
pub struct SimulationBuilder {
    config: EngineConfig,
    photos: Vec<PhotoRef>,
    recording: Option<PathBuf>,
    source: Option<Box<dyn LandmarkSource>>,
    frames: usize,
    fps: f32,
    camera_fps: f32,
    tree_spin: f32,
    logging: LoggingConfig,
}

impl SimulationBuilder {
    /// Create a new SimulationBuilder with default settings.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            photos: Vec::new(),
            recording: None,
            source: None,
            frames: 720,
            fps: 60.0,
            camera_fps: 30.0,
            tree_spin: 0.0,
            logging: LoggingConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_photos<I>(mut self, photos: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PhotoRef>,
    {
        self.photos.extend(photos.into_iter().map(Into::into));
        self
    }

    /// Replay a JSON-lines recording instead of the demo script.
    pub fn with_recording(mut self, path: PathBuf) -> Self {
        self.recording = Some(path);
        self
    }

    /// Drive the engine from any landmark source.
    pub fn with_source(mut self, source: Box<dyn LandmarkSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_frames(mut self, frames: usize) -> Self {
        self.frames = frames;
        self
    }

    /// Render rate.
    pub fn with_fps(mut self, fps: f32) -> Self {
        self.fps = fps;
        self
    }

    /// Landmark sampling rate, used when the source does not declare one.
    pub fn with_camera_fps(mut self, fps: f32) -> Self {
        self.camera_fps = fps;
        self
    }

    /// Turn the whole tree about its axis, radians per second.
    pub fn with_tree_spin(mut self, radians_per_second: f32) -> Self {
        self.tree_spin = radians_per_second;
        self
    }

    /// Configure logging.
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging = config;
        self
    }

    /// Initialize logging and run the simulation.
    pub fn run(self) -> Result<SimulationSummary, AppError> {
        self.init_logging();
        self.simulate()
    }

    /// Run the simulation without touching the global subscriber.
    pub fn simulate(self) -> Result<SimulationSummary, AppError> {
        for (name, value) in [("fps", self.fps), ("camera fps", self.camera_fps)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AppError::InvalidArgument(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !self.tree_spin.is_finite() {
            return Err(AppError::InvalidArgument(format!(
                "tree spin must be finite, got {}",
                self.tree_spin
            )));
        }

        let mut source: Box<dyn LandmarkSource> = match (self.source, &self.recording) {
            (Some(source), _) => source,
            (None, Some(path)) => Box::new(RecordedSource::from_path(path)?),
            (None, None) => Box::new(demo_script(self.camera_fps)),
        };
        let camera_fps = source
            .frame_rate()
            .filter(|fps| fps.is_finite() && *fps > 0.0)
            .unwrap_or(self.camera_fps);
        let render_dt = 1.0 / self.fps;
        let sample_dt = 1.0 / camera_fps;

        let mut engine = Engine::new(self.config)?;
        engine.add_photos(self.photos);
        info!(
            "Simulating {} frames at {:.0} fps, hand samples at {:.1} fps",
            self.frames, self.fps, camera_fps
        );

        let mut samples = 0;
        let mut mode_changes = 0;
        let mut sample_clock = 0.0;
        let mut last = engine.snapshot();

        for frame in 0..self.frames {
            sample_clock += render_dt;
            let mut drained = 0;
            while sample_clock >= sample_dt && engine.is_source_attached() {
                if drained == MAX_SAMPLES_PER_FRAME {
                    debug!("Dropping hand sample backlog at frame {}", frame);
                    sample_clock = 0.0;
                    break;
                }
                drained += 1;
                sample_clock -= sample_dt;
                match source.next_sample() {
                    Ok(Some(sample)) => {
                        engine.on_sample(&sample);
                        samples += 1;
                    }
                    Ok(None) => {
                        info!("Landmark stream finished after {} samples", samples);
                        engine.detach_source();
                    }
                    Err(e) => {
                        warn!("Landmark source failed: {}", e);
                        source.stop();
                        engine.detach_source();
                    }
                }
            }

            if self.tree_spin != 0.0 {
                let angle = (engine.elapsed() + render_dt) * self.tree_spin;
                engine.set_parent_transform(Mat4::from_rotation_y(angle));
            }
            engine.tick(render_dt);

            let snapshot = engine.snapshot();
            if snapshot != last {
                mode_changes += 1;
                log_change(frame, &snapshot, engine.status());
                last = snapshot;
            }
        }

        Ok(summarize(&engine, self.frames, samples, mode_changes))
    }

    fn init_logging(&self) {
        #[cfg(feature = "tracy")]
        {
            if self.logging.enable_tracy {
                use tracing_subscriber::Layer;
                use tracing_subscriber::layer::SubscriberExt;
                use tracing_subscriber::util::SubscriberInitExt;
                tracing_subscriber::registry()
                    .with(tracing_tracy::TracyLayer::default())
                    .with(
                        tracing_subscriber::fmt::layer().with_filter(
                            tracing_subscriber::EnvFilter::try_from_default_env()
                                .unwrap_or_else(|_| self.logging.level.clone().into()),
                        ),
                    )
                    .init();
                return;
            }
        }

        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&self.logging.level)),
            )
            .with_target(false)
            .init();
    }
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn log_change(frame: usize, snapshot: &ModeSnapshot, status: &str) {
    match snapshot.focus {
        Some(id) => info!(frame, "{} on {} ({})", snapshot.mode, id, status),
        None => info!(frame, "{} ({})", snapshot.mode, status),
    }
}

fn summarize(
    engine: &Engine,
    frames: usize,
    samples: usize,
    mode_changes: usize,
) -> SimulationSummary {
    let focus = engine.focus();
    let mut sample: Vec<LiveObject> = focus
        .and_then(|id| engine.live().iter().find(|l| l.id == id).copied())
        .into_iter()
        .collect();
    sample.extend(engine.live().iter().take(4).copied());

    SimulationSummary {
        frames,
        samples,
        mode_changes,
        mode: engine.mode(),
        focus,
        viewed: engine.viewed_count(),
        generation: engine.objects().generation(),
        objects: engine.objects().len(),
        star_vertices: engine.star_mesh().vertex_count(),
        status: engine.status(),
        sample,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::{DEMO_PHOTOS, DEMO_SECONDS};
    use tinsel_capture::{HandPose, ScriptedSource};

    #[test]
    fn test_demo_run_cycles_through_modes() {
        let summary = SimulationBuilder::new()
            .with_photos(DEMO_PHOTOS)
            .with_frames((DEMO_SECONDS * 60.0) as usize + 60)
            .simulate()
            .unwrap();

        // Scattered, focused, scattered, focused, assembled.
        assert_eq!(summary.mode_changes, 5);
        assert_eq!(summary.mode, DisplayMode::Assembled);
        assert_eq!(summary.focus, None);
        assert_eq!(summary.viewed, 2);
        assert_eq!(summary.samples, (DEMO_SECONDS * 30.0) as usize);
        assert_eq!(summary.objects, 220 + 1 + DEMO_PHOTOS.len());
        assert_eq!(summary.star_vertices, 60);
        assert!(!summary.to_string().is_empty());
    }

    #[test]
    fn test_custom_source_and_spin() {
        let source = ScriptedSource::new(Vec::new())
            .with_frame_rate(15.0)
            .hold(Some(HandPose::open().frame()), 5)
            .hold(Some(HandPose::pinch().frame()), 5);
        let summary = SimulationBuilder::new()
            .with_photos(["one.png"])
            .with_source(Box::new(source))
            .with_tree_spin(0.3)
            .with_frames(120)
            .simulate()
            .unwrap();

        assert_eq!(summary.mode, DisplayMode::Focused);
        assert!(summary.focus.is_some());
        assert_eq!(summary.sample[0].id, summary.focus.unwrap());
        assert!(summary.sample.iter().all(|l| l.transform.is_finite()));
    }

    #[test]
    fn test_compressed_recording_falls_back_to_camera_rate() {
        let text = "{\"t\": 0.0}\n{\"t\": 1e-45}\n";
        let recording = RecordedSource::from_reader(std::io::Cursor::new(text)).unwrap();
        let summary = SimulationBuilder::new()
            .with_source(Box::new(recording))
            .with_frames(2)
            .simulate()
            .unwrap();
        assert_eq!(summary.frames, 2);
        assert_eq!(summary.samples, 1);
    }

    #[test]
    fn test_unbounded_source_rates_still_finish() {
        for rate in [f32::INFINITY, 1e30] {
            let source = ScriptedSource::new(Vec::new())
                .with_frame_rate(rate)
                .hold(Some(HandPose::open().frame()), 200);
            let summary = SimulationBuilder::new()
                .with_source(Box::new(source))
                .with_frames(10)
                .simulate()
                .unwrap();
            assert!(summary.samples <= 200);
            assert_eq!(summary.mode, DisplayMode::Scattered);
        }
    }

    #[test]
    fn test_invalid_rates_rejected() {
        let err = SimulationBuilder::new().with_fps(0.0).simulate().unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
        let err = SimulationBuilder::new()
            .with_camera_fps(f32::NAN)
            .simulate()
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[test]
    fn test_missing_recording_is_an_error() {
        let err = SimulationBuilder::new()
            .with_recording(PathBuf::from("/nonexistent/session.jsonl"))
            .simulate()
            .unwrap_err();
        assert!(matches!(err, AppError::Capture(_)));
    }

    #[test]
    fn test_zero_viewport_is_an_error() {
        let err = SimulationBuilder::new()
            .with_config(EngineConfig::default().with_viewport(0, 600))
            .with_frames(1)
            .simulate()
            .unwrap_err();
        assert!(matches!(err, AppError::Viewport(_)));
    }
}
