//! Per-frame transform interpolation for every scene object

use crate::mode::{DisplayMode, ModeSnapshot};
use crate::motion::blend::{TargetDescriptor, blend};
use crate::motion::camera::CameraRig;
use crate::scene::{ObjectId, ObjectSet, SceneObject};
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use tinsel_data::{InstanceTransform, ObjectKind, Transform};
use tracing::debug;

/// Rates, distances and ambient motion parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Blend rate of the focused photo.
    pub focus_rate: f32,
    /// Blend rate of everything else.
    pub ambient_rate: f32,
    /// Frame rate at which the rates are defined.
    pub reference_fps: f32,
    /// Distance in front of the camera where the focused photo hangs.
    pub focus_standoff: f32,
    /// Fraction of the tighter viewport dimension the focused photo fills.
    pub focus_fill: f32,
    /// How far non-focused objects are pushed out while a photo is focused.
    pub push_factor: f32,
    /// Scale applied to non-focused objects while a photo is focused.
    pub shrink_factor: f32,
    /// Height of the idle bob.
    pub bob_amplitude: f32,
    /// Emissive pulse of lights.
    pub glow_base: f32,
    pub glow_amplitude: f32,
    pub glow_speed: f32,
    pub glow_min: f32,
    pub glow_max: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            focus_rate: 0.12,
            ambient_rate: 0.05,
            reference_fps: 60.0,
            focus_standoff: 8.0,
            focus_fill: 0.85,
            push_factor: 1.6,
            shrink_factor: 0.5,
            bob_amplitude: 0.2,
            glow_base: 1.5,
            glow_amplitude: 1.2,
            glow_speed: 3.0,
            glow_min: 0.5,
            glow_max: 2.5,
        }
    }
}

/// Per-frame inputs that do not come from the mode machine.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    /// Seconds since the previous frame.
    pub dt: f32,
    /// Seconds since the engine started.
    pub elapsed: f32,
    pub camera: &'a CameraRig,
    /// World transform of the group that parents every scene object.
    pub parent: Mat4,
}

/// Live state of one object, handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub transform: Transform,
    /// Emissive intensity; lights pulse, everything else stays at zero.
    pub emissive: f32,
}

/// Transform that holds a photo in front of the camera, in the parent's space.
///
/// The photo sits `standoff` units along the viewing axis, faces the camera
/// whatever the parent's rotation, and is scaled to fill `fill` of the view.
/// A degenerate parent transform is treated as identity.
pub fn focus_transform(camera: &CameraRig, parent: Mat4, standoff: f32, fill: f32) -> Transform {
    let inverse = parent.inverse();
    let (parent, inverse) =
        if parent.is_finite() && parent.determinant() != 0.0 && inverse.is_finite() {
            (parent, inverse)
        } else {
            (Mat4::IDENTITY, Mat4::IDENTITY)
        };
    let (parent_scale, parent_rotation, _) = parent.to_scale_rotation_translation();

    let world_point = camera.point_ahead(standoff);
    let position = inverse.transform_point3(world_point);
    let rotation = (parent_rotation.inverse() * camera.orientation()).normalize();
    let scale = Vec3::splat(camera.fill_scale(standoff, fill)) / parent_scale;

    Transform::new(position, rotation, scale)
}

/// Eases every object toward its mode-dependent target.
#[derive(Debug, Clone, Default)]
pub struct Interpolator {
    config: MotionConfig,
    generation: Option<u32>,
    live: Vec<LiveObject>,
    spin: Vec<f32>,
}

impl Interpolator {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Place every object directly at its resting target for `mode`.
    pub fn reset(&mut self, objects: &ObjectSet, mode: DisplayMode) {
        self.live = objects
            .iter()
            .map(|object| LiveObject {
                id: object.id,
                kind: object.kind,
                transform: match mode {
                    DisplayMode::Assembled => object.assembled,
                    DisplayMode::Scattered | DisplayMode::Focused => object.scattered,
                },
                emissive: 0.0,
            })
            .collect();
        self.spin = vec![0.0; objects.len()];
        self.generation = Some(objects.generation());
        debug!("Interpolator seeded with {} objects", self.live.len());
    }

    /// Advance one rendered frame.
    pub fn step(
        &mut self,
        objects: &ObjectSet,
        snapshot: ModeSnapshot,
        ctx: &FrameContext,
    ) -> &[LiveObject] {
        if self.generation != Some(objects.generation()) || self.live.len() != objects.len() {
            self.reset(objects, snapshot.mode);
        }

        let dt = if ctx.dt.is_finite() { ctx.dt.max(0.0) } else { 0.0 };
        // Focus on an object outside this set is no focus at all.
        let snapshot = ModeSnapshot {
            focus: snapshot.focus.filter(|id| objects.get(*id).is_some()),
            ..snapshot
        };
        let focus = snapshot.focus.map(|_| {
            focus_transform(
                ctx.camera,
                ctx.parent,
                self.config.focus_standoff,
                self.config.focus_fill,
            )
        });

        for ((object, live), spin) in objects
            .iter()
            .zip(self.live.iter_mut())
            .zip(self.spin.iter_mut())
        {
            if self.config.idles(object, snapshot) {
                *spin += object.idle.spin_speed * dt;
            }
            let target = self.config.target_for(object, snapshot, focus, ctx.elapsed, *spin);
            live.transform = blend(&live.transform, &target, dt, self.config.reference_fps);
            live.emissive = match object.kind {
                ObjectKind::Light => self.config.light_intensity(object, ctx.elapsed),
                _ => 0.0,
            };
        }

        &self.live
    }

    pub fn live(&self) -> &[LiveObject] {
        &self.live
    }

    /// Live transforms packed for upload.
    pub fn instance_data(&self) -> Vec<InstanceTransform> {
        self.live
            .iter()
            .map(|live| InstanceTransform::new(&live.transform, live.emissive))
            .collect()
    }
}

impl MotionConfig {
    /// Objects bob and spin when loose, except the star and the focused photo.
    pub fn idles(&self, object: &SceneObject, snapshot: ModeSnapshot) -> bool {
        snapshot.mode != DisplayMode::Assembled
            && !object.is_star()
            && !snapshot.is_focus(object.id)
    }

    /// Target for one object this frame.
    ///
    /// `focus` is the precomputed focus transform when a photo is focused,
    /// `spin` the object's accumulated idle spin.
    pub fn target_for(
        &self,
        object: &SceneObject,
        snapshot: ModeSnapshot,
        focus: Option<Transform>,
        elapsed: f32,
        spin: f32,
    ) -> TargetDescriptor {
        if snapshot.is_focus(object.id) && object.is_photo() {
            if let Some(focus) = focus {
                return TargetDescriptor::new(focus, self.focus_rate);
            }
        }

        let mut transform = match (snapshot.mode, snapshot.focus) {
            (DisplayMode::Assembled, _) => object.assembled,
            (DisplayMode::Focused, Some(_)) => Transform::new(
                object.scattered.position * self.push_factor,
                object.scattered.rotation,
                object.scattered.scale * self.shrink_factor,
            ),
            // Nothing to focus on: behave as scattered.
            (DisplayMode::Scattered, _) | (DisplayMode::Focused, None) => object.scattered,
        };
        if self.idles(object, snapshot) {
            let bob = (elapsed * object.idle.bob_speed + object.idle.bob_phase).sin();
            transform.position.y += bob * self.bob_amplitude;
            transform.rotation = Quat::from_rotation_y(spin) * transform.rotation;
        }

        TargetDescriptor::new(transform, self.ambient_rate)
    }

    /// Emissive intensity of a light at `elapsed` seconds.
    pub fn light_intensity(&self, object: &SceneObject, elapsed: f32) -> f32 {
        let wave = (elapsed * self.glow_speed + object.idle.glow_phase).sin();
        (self.glow_base + wave * self.glow_amplitude).clamp(self.glow_min, self.glow_max)
    }
}
