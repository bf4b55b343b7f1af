//! The engine facade.
//!
//! Two callbacks drive everything: [`Engine::on_hand_frame`] at the camera's
//! cadence and [`Engine::tick`] at the render cadence. Both run on the same
//! thread; `tick` reads the mode and focus once as a [`ModeSnapshot`] so a frame
//! never sees a half-updated pair.

use crate::config::EngineConfig;
use crate::mode::{DisplayMode, ModeMachine, ModeSnapshot};
use crate::motion::{CameraRig, FrameContext, Interpolator, LiveObject, ViewportError};
use crate::scene::{LayoutGenerator, ObjectId, ObjectSet, PhotoRef};
use glam::Mat4;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tinsel_capture::{GestureClassifier, GestureState, HandSample};
use tinsel_data::{InstanceTransform, LandmarkFrame, StarMesh, build_star_mesh};
use tracing::{debug, info, warn};

/// Gesture-driven photo tree.
pub struct Engine<R: Rng = ChaCha8Rng> {
    rng: R,
    classifier: GestureClassifier,
    machine: ModeMachine,
    layout: LayoutGenerator,
    interpolator: Interpolator,
    camera: CameraRig,
    photos: Vec<PhotoRef>,
    objects: ObjectSet,
    star_mesh: StarMesh,
    parent: Mat4,
    gesture: GestureState,
    source_attached: bool,
    elapsed: f32,
}

impl Engine<ChaCha8Rng> {
    /// Create an engine seeded from `config.seed`.
    pub fn new(config: EngineConfig) -> Result<Self, ViewportError> {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Engine<R> {
    /// Create an engine with an explicit random source.
    pub fn with_rng(config: EngineConfig, rng: R) -> Result<Self, ViewportError> {
        let (width, height) = config.viewport;
        let camera = CameraRig::new(config.camera, width, height)?;
        let star_mesh = build_star_mesh(&config.star);

        let mut engine = Self {
            rng,
            classifier: GestureClassifier::new(config.classifier),
            machine: ModeMachine::default(),
            layout: LayoutGenerator::new(config.layout),
            interpolator: Interpolator::new(config.motion),
            camera,
            photos: Vec::new(),
            objects: ObjectSet::default(),
            star_mesh,
            parent: Mat4::IDENTITY,
            gesture: GestureState::NO_HAND,
            source_attached: true,
            elapsed: 0.0,
        };
        engine.regenerate();
        info!(
            "Engine ready: {} objects, camera at {:.2}",
            engine.objects.len(),
            engine.camera.distance()
        );
        Ok(engine)
    }

    // ---- camera callback ----

    /// Feed one detector result. `None` means no hand was found.
    ///
    /// Ignored while the source is detached.
    pub fn on_hand_frame(&mut self, frame: Option<&LandmarkFrame>) -> GestureState {
        if !self.source_attached {
            return GestureState::NO_HAND;
        }
        let state = self.classifier.classify(frame);
        self.machine
            .apply(&state, self.objects.photo_ids(), &mut self.rng);
        self.gesture = state;
        state
    }

    /// Feed a full detector sample; only the first hand is used.
    pub fn on_sample(&mut self, sample: &HandSample) -> GestureState {
        if sample.hands.len() > 1 {
            debug!("Ignoring {} extra hands", sample.hands.len() - 1);
        }
        self.on_hand_frame(sample.first_hand())
    }

    /// Resume accepting hand frames.
    pub fn attach_source(&mut self) {
        if !self.source_attached {
            info!("Gesture source attached");
        }
        self.source_attached = true;
    }

    /// Stop accepting hand frames. Mode and focus stay where they are.
    pub fn detach_source(&mut self) {
        if self.source_attached {
            info!("Gesture source detached, holding {}", self.machine.mode());
        }
        self.source_attached = false;
        self.gesture = GestureState::NO_HAND;
    }

    pub fn is_source_attached(&self) -> bool {
        self.source_attached
    }

    // ---- photos ----

    pub fn add_photo(&mut self, photo: impl Into<PhotoRef>) {
        self.photos.push(photo.into());
        self.regenerate();
    }

    pub fn add_photos<I>(&mut self, photos: I)
    where
        I: IntoIterator,
        I::Item: Into<PhotoRef>,
    {
        let before = self.photos.len();
        self.photos.extend(photos.into_iter().map(Into::into));
        if self.photos.len() != before {
            self.regenerate();
        }
    }

    pub fn clear_photos(&mut self) {
        self.photos.clear();
        self.regenerate();
    }

    /// Replace the whole photo list.
    pub fn set_photos(&mut self, photos: Vec<PhotoRef>) {
        self.photos = photos;
        self.regenerate();
    }

    pub fn photos(&self) -> &[PhotoRef] {
        &self.photos
    }

    /// Rebuild every object under a new generation and swap the set in whole.
    #[tracing::instrument(skip_all, fields(photos = self.photos.len()))]
    fn regenerate(&mut self) {
        let generation = self.objects.generation().wrapping_add(1);
        let objects = self.layout.generate(generation, &self.photos, &mut self.rng);
        self.objects = ObjectSet::new(generation, objects);

        self.machine
            .reset_objects(self.objects.photo_ids(), &mut self.rng);
        self.interpolator.reset(&self.objects, self.machine.mode());
        info!(
            "Generation {}: {} objects, {} photos",
            generation,
            self.objects.len(),
            self.photos.len()
        );
    }

    // ---- viewport ----

    /// Refit the camera for a new viewport. Invalid sizes are rejected.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<f32, ViewportError> {
        self.camera.resize(width, height)
    }

    /// Change the vertical field of view. Invalid values are rejected.
    pub fn set_fov_degrees(&mut self, degrees: f32) -> Result<f32, ViewportError> {
        self.camera.set_fov_degrees(degrees)
    }

    /// World transform of the group that holds the tree.
    pub fn set_parent_transform(&mut self, parent: Mat4) {
        if parent.is_finite() {
            self.parent = parent;
        } else {
            warn!("Ignoring non-finite parent transform");
        }
    }

    // ---- render callback ----

    /// Advance one rendered frame of `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> &[LiveObject] {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.elapsed += dt;

        let snapshot = self.machine.snapshot();
        let ctx = FrameContext {
            dt,
            elapsed: self.elapsed,
            camera: &self.camera,
            parent: self.parent,
        };
        self.interpolator.step(&self.objects, snapshot, &ctx)
    }

    /// Live transforms packed for GPU upload.
    pub fn instance_data(&self) -> Vec<InstanceTransform> {
        self.interpolator.instance_data()
    }

    pub fn live(&self) -> &[LiveObject] {
        self.interpolator.live()
    }

    // ---- accessors ----

    pub fn mode(&self) -> DisplayMode {
        self.machine.mode()
    }

    pub fn focus(&self) -> Option<ObjectId> {
        self.machine.focus()
    }

    pub fn snapshot(&self) -> ModeSnapshot {
        self.machine.snapshot()
    }

    /// Status line for the last classified frame.
    pub fn status(&self) -> &'static str {
        self.gesture.status()
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn objects(&self) -> &ObjectSet {
        &self.objects
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn parent_transform(&self) -> Mat4 {
        self.parent
    }

    /// Star geometry, built once per engine.
    pub fn star_mesh(&self) -> &StarMesh {
        &self.star_mesh
    }

    /// Photos shown since the viewing history last reset.
    pub fn viewed_count(&self) -> usize {
        self.machine.viewed().len()
    }

    /// Seconds of simulated time.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::focus_transform;
    use glam::{Quat, Vec3};
    use tinsel_capture::HandPose;

    const DT: f32 = 1.0 / 60.0;

    fn engine() -> Engine {
        Engine::new(EngineConfig::default().with_seed(7)).unwrap()
    }

    fn feed(engine: &mut Engine, pose: HandPose, frames: usize) {
        let frame = pose.frame();
        for _ in 0..frames {
            engine.on_hand_frame(Some(&frame));
        }
    }

    fn run(engine: &mut Engine, frames: usize) {
        for _ in 0..frames {
            engine.tick(DT);
        }
    }

    fn live_of(engine: &Engine, id: ObjectId) -> LiveObject {
        *engine.live().iter().find(|l| l.id == id).unwrap()
    }

    #[test]
    fn test_new_engine_starts_assembled() {
        let engine = engine();
        assert_eq!(engine.mode(), DisplayMode::Assembled);
        assert_eq!(engine.focus(), None);
        assert_eq!(engine.objects().len(), 221);
        assert_eq!(engine.status(), "No hand detected");
        assert_eq!(engine.star_mesh().vertex_count(), 60);
        for (live, object) in engine.live().iter().zip(engine.objects().iter()) {
            assert_eq!(live.transform, object.assembled);
        }
    }

    #[test]
    fn test_gesture_session_end_to_end() {
        let mut engine = engine();
        engine.add_photos(["a.jpg", "b.jpg", "c.jpg"]);

        feed(&mut engine, HandPose::pinch(), 3);
        assert_eq!(engine.mode(), DisplayMode::Assembled);

        feed(&mut engine, HandPose::open(), 3);
        assert_eq!(engine.mode(), DisplayMode::Scattered);
        assert_eq!(engine.status(), "Open hand: scattering");
        run(&mut engine, 10);

        feed(&mut engine, HandPose::pinch(), 3);
        assert_eq!(engine.mode(), DisplayMode::Focused);
        let focus = engine.focus().unwrap();
        assert!(engine.objects().photo_ids().contains(&focus));

        run(&mut engine, 600);
        let target = focus_transform(engine.camera(), Mat4::IDENTITY, 8.0, 0.85);
        let live = live_of(&engine, focus);
        assert!(live.transform.position.abs_diff_eq(target.position, 1e-3));
        assert!(live.transform.scale.abs_diff_eq(target.scale, 1e-3));

        feed(&mut engine, HandPose::fist(), 2);
        assert_eq!(engine.mode(), DisplayMode::Assembled);
        assert_eq!(engine.focus(), None);
        run(&mut engine, 2000);
        for (live, object) in engine.live().iter().zip(engine.objects().iter()) {
            assert_eq!(live.transform, object.assembled);
        }
    }

    #[test]
    fn test_focus_visits_every_photo_before_repeating() {
        let mut engine = engine();
        engine.add_photos(["a", "b", "c"]);
        let mut seen = Vec::new();
        for _ in 0..3 {
            feed(&mut engine, HandPose::open(), 1);
            feed(&mut engine, HandPose::pinch(), 1);
            seen.push(engine.focus().unwrap());
        }
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 3);
        assert_eq!(engine.viewed_count(), 3);
    }

    #[test]
    fn test_detached_source_holds_mode_and_focus() {
        let mut engine = engine();
        engine.add_photo("only.png");
        feed(&mut engine, HandPose::open(), 1);
        feed(&mut engine, HandPose::pinch(), 1);
        let focus = engine.focus();
        assert!(focus.is_some());

        engine.detach_source();
        let state = engine.on_hand_frame(Some(&HandPose::fist().frame()));
        assert_eq!(state, GestureState::NO_HAND);
        assert_eq!(engine.mode(), DisplayMode::Focused);
        assert_eq!(engine.focus(), focus);
        run(&mut engine, 5);

        engine.attach_source();
        feed(&mut engine, HandPose::fist(), 1);
        assert_eq!(engine.mode(), DisplayMode::Assembled);
    }

    #[test]
    fn test_photo_change_regenerates_everything() {
        let mut engine = engine();
        engine.add_photos(["a", "b"]);
        feed(&mut engine, HandPose::open(), 1);
        feed(&mut engine, HandPose::pinch(), 1);
        let old_generation = engine.objects().generation();
        assert_eq!(engine.focus().unwrap().generation, old_generation);

        engine.add_photo("c");
        let generation = engine.objects().generation();
        assert_eq!(generation, old_generation + 1);
        assert!(engine.objects().iter().all(|o| o.id.generation == generation));
        assert_eq!(engine.objects().photo_ids().len(), 3);
        // Still focused, now on a photo from the new set with fresh history.
        assert_eq!(engine.mode(), DisplayMode::Focused);
        assert_eq!(engine.focus().unwrap().generation, generation);
        assert_eq!(engine.viewed_count(), 1);
        assert_eq!(engine.live().len(), engine.objects().len());

        engine.clear_photos();
        assert!(engine.photos().is_empty());
        assert_eq!(engine.mode(), DisplayMode::Focused);
        assert_eq!(engine.focus(), None);
        assert_eq!(engine.viewed_count(), 0);
        run(&mut engine, 30);
        assert!(engine.live().iter().all(|l| l.transform.is_finite()));
    }

    #[test]
    fn test_empty_add_photos_keeps_generation() {
        let mut engine = engine();
        let generation = engine.objects().generation();
        engine.add_photos(Vec::<PhotoRef>::new());
        assert_eq!(engine.objects().generation(), generation);
    }

    #[test]
    fn test_invalid_viewport_keeps_camera() {
        let mut engine = engine();
        let distance = engine.camera().distance();
        assert!(engine.resize(0, 0).is_err());
        assert!(engine.set_fov_degrees(0.0).is_err());
        assert_eq!(engine.camera().distance(), distance);

        assert!(engine.resize(720, 1280).is_ok());
        assert!(engine.camera().distance() >= distance);
        assert!(engine.set_fov_degrees(30.0).unwrap() > 0.0);
    }

    #[test]
    fn test_rotated_parent_keeps_photo_facing_camera() {
        let mut engine = engine();
        engine.add_photo("p");
        let parent = Mat4::from_rotation_translation(
            Quat::from_rotation_y(0.9),
            Vec3::new(0.0, -2.0, 0.0),
        );
        engine.set_parent_transform(parent);
        engine.set_parent_transform(Mat4::from_cols_array(&[f32::NAN; 16]));
        assert_eq!(engine.parent_transform(), parent);

        feed(&mut engine, HandPose::open(), 1);
        feed(&mut engine, HandPose::pinch(), 1);
        run(&mut engine, 600);

        let live = live_of(&engine, engine.focus().unwrap());
        let world = parent * live.transform.to_matrix();
        let (_, rotation, translation) = world.to_scale_rotation_translation();
        assert!(translation.abs_diff_eq(engine.camera().point_ahead(8.0), 1e-2));
        assert!(rotation.angle_between(engine.camera().orientation()) < 1e-2);
    }

    #[test]
    fn test_bad_frames_count_as_no_hand() {
        let mut engine = engine();
        feed(&mut engine, HandPose::open(), 1);
        let short = LandmarkFrame::new(vec![Vec3::ZERO; 5]);
        let state = engine.on_hand_frame(Some(&short));
        assert!(!state.hand_detected);
        assert_eq!(engine.mode(), DisplayMode::Scattered);
        assert_eq!(engine.status(), "No hand detected");
    }

    #[test]
    fn test_bad_dt_does_not_move_anything() {
        let mut engine = engine();
        feed(&mut engine, HandPose::open(), 1);
        let before: Vec<_> = engine.live().to_vec();
        engine.tick(f32::NAN);
        engine.tick(-1.0);
        assert_eq!(engine.elapsed(), 0.0);
        let after = engine.live();
        for (a, b) in before.iter().zip(after) {
            assert_eq!(a.transform, b.transform);
        }
    }

    #[test]
    fn test_same_seed_same_scene() {
        let a = engine();
        let b = engine();
        for (x, y) in a.objects().iter().zip(b.objects().iter()) {
            assert_eq!(x.scattered, y.scattered);
        }
        assert_eq!(a.instance_data().len(), a.objects().len());
    }

    #[test]
    fn test_custom_rng() {
        let rng = ChaCha8Rng::seed_from_u64(99);
        let engine = Engine::with_rng(EngineConfig::default(), rng).unwrap();
        assert_eq!(engine.objects().generation(), 1);
    }
}
