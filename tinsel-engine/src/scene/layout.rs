//! Tree and scatter layouts
//!
//! Ornaments climb a cone along a continuous spiral. Photos are pinned to
//! evenly spaced spiral slots and pushed out to the tree's surface, facing
//! outward. The scattered layout is a random cloud drawn once per rebuild.

use crate::scene::object::{IdleParams, ObjectId, PhotoRef, SceneObject};
use glam::{EulerRot, Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use tinsel_data::geometry::{radial_direction, yaw_toward};
use tinsel_data::{ObjectKind, Transform, palette};
use tracing::info;

/// Share of ornaments given to each kind. Whatever is left becomes balls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindBands {
    pub gift: f32,
    pub candy: f32,
    pub light: f32,
    /// Fraction of balls that are red rather than gold.
    pub red_balls: f32,
}

impl Default for KindBands {
    fn default() -> Self {
        Self {
            gift: 0.15,
            candy: 0.10,
            light: 0.20,
            red_balls: 0.5,
        }
    }
}

impl KindBands {
    /// Pick a kind and color from a uniform roll in `[0, 1)`.
    pub fn classify(&self, roll: f32) -> (ObjectKind, Vec3) {
        let gift_floor = 1.0 - self.gift;
        let candy_floor = gift_floor - self.candy;
        let light_floor = candy_floor - self.light;

        if roll >= gift_floor {
            (ObjectKind::Gift, palette::GIFT)
        } else if roll >= candy_floor {
            (ObjectKind::Candy, palette::CANDY)
        } else if roll >= light_floor {
            (ObjectKind::Light, palette::LIGHT)
        } else if roll < light_floor * self.red_balls {
            (ObjectKind::Ball, palette::RED)
        } else {
            (ObjectKind::Ball, palette::GOLD)
        }
    }
}

/// Shape of the tree and of the scattered cloud.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Number of non-photo ornaments on the spiral.
    pub ornament_count: usize,
    pub tree_height: f32,
    /// Cone radius at the bottom of the tree.
    pub base_radius: f32,
    /// Azimuth advance per spiral slot, radians.
    pub spiral_step: f32,
    /// Maximum per-axis offset added to each ornament.
    pub jitter: f32,
    /// How far photos sit outside the spiral center-line.
    pub photo_offset: f32,
    /// Full size of the scatter box; lateral axes wider than depth.
    pub scatter_extent: Vec3,
    /// Height of the star above the top spiral slot.
    pub star_lift: f32,
    pub bands: KindBands,
    pub ball_scale: f32,
    pub gift_scale: f32,
    pub candy_scale: f32,
    pub light_scale: f32,
    pub photo_scale: f32,
    pub star_scale: f32,
    /// Range of vertical bob speeds, radians per second.
    pub bob_speed: (f32, f32),
    /// Range of idle spin speeds, radians per second.
    pub spin_speed: (f32, f32),
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            ornament_count: 220,
            tree_height: 14.0,
            base_radius: 5.5,
            spiral_step: 0.5,
            jitter: 0.25,
            photo_offset: 0.8,
            scatter_extent: Vec3::new(28.0, 18.0, 10.0),
            star_lift: 0.6,
            bands: KindBands::default(),
            ball_scale: 0.35,
            gift_scale: 0.45,
            candy_scale: 0.3,
            light_scale: 0.15,
            photo_scale: 1.2,
            star_scale: 0.9,
            bob_speed: (0.6, 1.6),
            spin_speed: (0.1, 0.5),
        }
    }
}

/// A point on the tree spiral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralSlot {
    /// Position on the spiral center-line.
    pub center: Vec3,
    /// Unit vector pointing away from the trunk.
    pub outward: Vec3,
}

/// Builds complete object sets from a photo list.
#[derive(Debug, Clone, Default)]
pub struct LayoutGenerator {
    config: LayoutConfig,
}

impl LayoutGenerator {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Build all objects for one generation: ornaments, then the star, then photos.
    #[tracing::instrument(skip_all, fields(generation = generation, photos = photos.len()))]
    pub fn generate<R: Rng + ?Sized>(
        &self,
        generation: u32,
        photos: &[PhotoRef],
        rng: &mut R,
    ) -> Vec<SceneObject> {
        let c = &self.config;
        let mut objects = Vec::with_capacity(c.ornament_count + 1 + photos.len());
        let mut next_id = 0u32;
        let mut id = || {
            let id = ObjectId::new(generation, next_id);
            next_id += 1;
            id
        };

        for i in 0..c.ornament_count {
            let slot = self.spiral_slot(i);
            let jitter = Vec3::new(
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
            ) * c.jitter;
            let (kind, color) = c.bands.classify(rng.r#gen::<f32>());
            let scale = self.kind_scale(kind);
            let yaw = rng.gen_range(0.0..TAU);

            objects.push(SceneObject {
                id: id(),
                kind,
                color,
                texture: None,
                assembled: Transform::uniform(
                    slot.center + jitter,
                    Quat::from_rotation_y(yaw),
                    scale,
                ),
                scattered: self.scattered(scale, rng),
                base_scale: scale,
                idle: self.idle(rng),
            });
        }

        objects.push(SceneObject {
            id: id(),
            kind: ObjectKind::Star,
            color: palette::STAR,
            texture: None,
            assembled: Transform::uniform(self.star_apex(), Quat::IDENTITY, c.star_scale),
            scattered: Transform::uniform(Vec3::ZERO, Quat::IDENTITY, c.star_scale),
            base_scale: c.star_scale,
            idle: IdleParams::default(),
        });

        for (k, photo) in photos.iter().enumerate() {
            let slot = self.spiral_slot(self.photo_slot(k, photos.len()));
            let rotation = Quat::from_rotation_y(yaw_toward(slot.outward));
            let position = slot.center + slot.outward * c.photo_offset;

            objects.push(SceneObject {
                id: id(),
                kind: ObjectKind::Photo,
                color: palette::PHOTO,
                texture: Some(photo.clone()),
                assembled: Transform::uniform(position, rotation, c.photo_scale),
                scattered: self.scattered(c.photo_scale, rng),
                base_scale: c.photo_scale,
                idle: self.idle(rng),
            });
        }

        info!(
            "Generated layout {}: {} ornaments, {} photos",
            generation,
            c.ornament_count,
            photos.len()
        );

        objects
    }

    /// Spiral slot `index` out of `ornament_count`.
    pub fn spiral_slot(&self, index: usize) -> SpiralSlot {
        let c = &self.config;
        let t = (index as f32 / c.ornament_count.max(1) as f32).min(1.0);
        let angle = index as f32 * c.spiral_step;
        let radius = c.base_radius * (1.0 - t);
        let outward = radial_direction(angle);
        let y = t * c.tree_height - c.tree_height * 0.5;

        SpiralSlot {
            center: Vec3::new(outward.x * radius, y, outward.z * radius),
            outward,
        }
    }

    /// Spiral slot used by photo `k` of `count`, spread by an integer stride.
    pub fn photo_slot(&self, k: usize, count: usize) -> usize {
        let slots = self.config.ornament_count;
        if slots == 0 {
            return k;
        }
        let stride = (slots / count.max(1)).max(1);
        (k * stride) % slots
    }

    /// Assembled position of the star.
    pub fn star_apex(&self) -> Vec3 {
        Vec3::new(0.0, self.config.tree_height * 0.5 + self.config.star_lift, 0.0)
    }

    fn kind_scale(&self, kind: ObjectKind) -> f32 {
        let c = &self.config;
        match kind {
            ObjectKind::Ball => c.ball_scale,
            ObjectKind::Gift => c.gift_scale,
            ObjectKind::Candy => c.candy_scale,
            ObjectKind::Light => c.light_scale,
            ObjectKind::Photo => c.photo_scale,
            ObjectKind::Star => c.star_scale,
        }
    }

    fn scattered<R: Rng + ?Sized>(&self, scale: f32, rng: &mut R) -> Transform {
        let half = self.config.scatter_extent.abs() * 0.5;
        let position = Vec3::new(
            rng.gen_range(-half.x..=half.x),
            rng.gen_range(-half.y..=half.y),
            rng.gen_range(-half.z..=half.z),
        );
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            rng.gen_range(0.0..TAU),
            rng.gen_range(0.0..TAU),
            rng.gen_range(0.0..TAU),
        );
        Transform::uniform(position, rotation, scale)
    }

    fn idle<R: Rng + ?Sized>(&self, rng: &mut R) -> IdleParams {
        let (bob_min, bob_max) = self.config.bob_speed;
        let (spin_min, spin_max) = self.config.spin_speed;
        IdleParams {
            bob_phase: rng.gen_range(0.0..TAU),
            bob_speed: sample_range(rng, bob_min, bob_max),
            spin_speed: sample_range(rng, spin_min, spin_max),
            glow_phase: rng.gen_range(0.0..TAU),
        }
    }
}

fn sample_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}
