//! The formation engine: instanced populations morphing between a chaotic
//! ball distribution and the formed tree cone.
//!
//! Each population owns immutable position/attribute buffers sampled once at
//! construction, plus a single smoothed progress value that trails the
//! store's global signal with a population-specific rate. Heavier things
//! (gifts) use a smaller rate and visibly lag the lights.
//!
//! The CPU path produces packed [`InstanceRaw`] transforms for the renderer;
//! the 15k-point foliage morphs on the GPU instead and only carries its
//! attribute arrays and two uniform values (see `shaders/foliage.wgsl`).

use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::prelude::*;

use crate::constants::{
    FOLIAGE_CHAOS_RADIUS, FOLIAGE_COUNT, FOLIAGE_WEIGHT, STABILIZE_THRESHOLD,
};
use crate::sampling::{chaos_position, ease_in_out_cubic, lerp_vec3, mix_seed, tree_position, TreeDims};

/// Per-instance data in the layout the instanced pipeline consumes.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    /// rgb + emissive strength in w.
    pub color: [f32; 4],
}

/// What an instance does with its rotation once the morph stabilises.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollapsePolicy {
    /// Snap to identity (ornaments).
    Reset,
    /// Face outward from the trunk axis with a slow hanging sway (photos).
    FaceOutSway,
}

/// Declarative description of one instanced population.
#[derive(Clone, Copy, Debug)]
pub struct PopulationConfig {
    pub name: &'static str,
    pub count: usize,
    /// Uniform per-instance scale in [min, max].
    pub scale_range: (f32, f32),
    /// Exponential-approach rate toward the global progress. Smaller = heavier.
    pub weight: f32,
    /// Radial push of the tree pose so the instance sits outside the foliage shell.
    pub outward_factor: f32,
    pub chaos_radius: f32,
    pub tree: TreeDims,
    pub collapse: CollapsePolicy,
    /// Instance colours are drawn uniformly from this set.
    pub color_set: &'static [[f32; 3]],
    /// Emissive strength handed to the shader in the colour's w channel.
    pub emissive: f32,
    /// Tumble speed amplitude (radians/sec per axis, centred on zero).
    pub rotation_speed_range: f32,
}

const GOLD: [f32; 3] = [1.0, 0.843, 0.0];

const GIFT_COLORS: &[[f32; 3]] = &[
    [0.831, 0.686, 0.216], // gold
    [0.769, 0.118, 0.227], // red
    [0.02, 0.02, 0.02],
    [1.0, 1.0, 1.0],
];

const BAUBLE_COLORS: &[[f32; 3]] = &[GOLD];

const LIGHT_COLORS: &[[f32; 3]] = &[GOLD, [1.0, 1.0, 1.0], [1.0, 0.0, 0.0]];

const PHOTO_COLORS: &[[f32; 3]] = &[[0.96, 0.96, 0.92]];

/// What geometry the renderer should instance for a population.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryKind {
    Cube,
    Sphere,
    Plane,
}

/// The shipped tree inventory, heaviest first.
pub fn standard_inventory() -> [(PopulationConfig, GeometryKind); 4] {
    [
        (
            PopulationConfig {
                name: "gifts",
                count: 50,
                scale_range: (0.4, 0.8),
                weight: 0.8,
                outward_factor: 1.1,
                chaos_radius: 18.0,
                tree: TreeDims {
                    y_offset: -5.0,
                    ..TreeDims::default()
                },
                collapse: CollapsePolicy::Reset,
                color_set: GIFT_COLORS,
                emissive: 0.2,
                rotation_speed_range: 2.0,
            },
            GeometryKind::Cube,
        ),
        (
            PopulationConfig {
                name: "baubles",
                count: 150,
                scale_range: (0.2, 0.5),
                weight: 1.5,
                outward_factor: 1.0,
                chaos_radius: 18.0,
                tree: TreeDims::default(),
                collapse: CollapsePolicy::Reset,
                color_set: BAUBLE_COLORS,
                emissive: 0.5,
                rotation_speed_range: 2.0,
            },
            GeometryKind::Sphere,
        ),
        (
            PopulationConfig {
                name: "lights",
                count: 400,
                scale_range: (0.05, 0.1),
                weight: 3.0,
                outward_factor: 1.0,
                chaos_radius: 18.0,
                tree: TreeDims::default(),
                collapse: CollapsePolicy::Reset,
                color_set: LIGHT_COLORS,
                emissive: 1.0,
                rotation_speed_range: 2.0,
            },
            GeometryKind::Sphere,
        ),
        (
            PopulationConfig {
                name: "photos",
                count: 60,
                scale_range: (1.5, 2.5),
                weight: 1.0,
                outward_factor: 1.15,
                chaos_radius: 16.0,
                tree: TreeDims::default(),
                collapse: CollapsePolicy::FaceOutSway,
                color_set: PHOTO_COLORS,
                emissive: 0.0,
                rotation_speed_range: 5.0,
            },
            GeometryKind::Plane,
        ),
    ]
}

/// One instanced population. Immutable after construction except for
/// `smoothed_progress` and the per-instance rotation accumulators.
pub struct Population {
    config: PopulationConfig,
    chaos: Vec<Vec3>,
    target: Vec<Vec3>,
    scale: Vec<f32>,
    rotation_speed: Vec<Vec3>,
    rotation: Vec<Vec3>,
    color: Vec<[f32; 3]>,
    smoothed_progress: f32,
}

impl Population {
    pub fn new(config: PopulationConfig, seed: u64, initial_progress: f32) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let n = config.count;
        let mut chaos = Vec::with_capacity(n);
        let mut target = Vec::with_capacity(n);
        let mut scale = Vec::with_capacity(n);
        let mut rotation_speed = Vec::with_capacity(n);
        let mut color = Vec::with_capacity(n);

        for _ in 0..n {
            chaos.push(chaos_position(&mut rng, config.chaos_radius));

            let t = tree_position(&mut rng, config.tree);
            target.push(Vec3::new(
                t.x * config.outward_factor,
                t.y,
                t.z * config.outward_factor,
            ));

            let (lo, hi) = config.scale_range;
            scale.push(rng.gen::<f32>() * (hi - lo) + lo);

            let amp = config.rotation_speed_range;
            rotation_speed.push(Vec3::new(
                (rng.gen::<f32>() - 0.5) * amp,
                (rng.gen::<f32>() - 0.5) * amp,
                (rng.gen::<f32>() - 0.5) * amp,
            ));

            color.push(config.color_set[rng.gen_range(0..config.color_set.len())]);
        }

        log::debug!("[formation] sampled {} instances for {}", n, config.name);

        Self {
            config,
            chaos,
            target,
            scale,
            rotation_speed,
            rotation: vec![Vec3::ZERO; n],
            color,
            smoothed_progress: initial_progress.clamp(0.0, 1.0),
        }
    }

    pub fn config(&self) -> &PopulationConfig {
        &self.config
    }

    pub fn count(&self) -> usize {
        self.config.count
    }

    pub fn smoothed_progress(&self) -> f32 {
        self.smoothed_progress
    }

    pub fn chaos_positions(&self) -> &[Vec3] {
        &self.chaos
    }

    pub fn target_positions(&self) -> &[Vec3] {
        &self.target
    }

    /// Advance the morph one frame and refill `out` with packed transforms.
    ///
    /// `clock` is the scene clock in seconds, used only by the hanging-sway
    /// collapse. The output vector is cleared; with reserved capacity this
    /// allocates nothing after the first frame.
    pub fn advance(&mut self, global_progress: f32, dt: f32, clock: f32, out: &mut Vec<InstanceRaw>) {
        let alpha = (self.config.weight * dt).clamp(0.0, 1.0);
        self.smoothed_progress += (global_progress - self.smoothed_progress) * alpha;
        let eased = ease_in_out_cubic(self.smoothed_progress);

        out.clear();
        out.reserve(self.config.count);
        for i in 0..self.config.count {
            let position = lerp_vec3(self.chaos[i], self.target[i], eased);

            let rotation = if eased < STABILIZE_THRESHOLD {
                let r = &mut self.rotation[i];
                *r += self.rotation_speed[i] * dt;
                Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z)
            } else {
                self.rotation[i] = Vec3::ZERO;
                match self.config.collapse {
                    CollapsePolicy::Reset => Quat::IDENTITY,
                    CollapsePolicy::FaceOutSway => {
                        let yaw = position.x.atan2(position.z);
                        let roll = (clock + i as f32).sin() * 0.1;
                        Quat::from_rotation_y(yaw) * Quat::from_rotation_z(roll)
                    }
                }
            };

            let model = Mat4::from_scale_rotation_translation(
                Vec3::splat(self.scale[i]),
                rotation,
                position,
            );
            let c = self.color[i];
            out.push(InstanceRaw {
                model: model.to_cols_array_2d(),
                color: [c[0], c[1], c[2], self.config.emissive],
            });
        }
    }
}

/// Per-point attributes for the GPU-morphed foliage field.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FoliagePoint {
    pub chaos: [f32; 3],
    pub target: [f32; 3],
    pub random: f32,
}

/// The needle cloud. Positions never touch the CPU after construction; the
/// vertex shader mirrors the lerp/ease from its two uniforms.
pub struct FoliageField {
    points: Vec<FoliagePoint>,
    smoothed_progress: f32,
}

impl FoliageField {
    pub fn new(seed: u64, initial_progress: f32) -> Self {
        let mut rng = StdRng::seed_from_u64(mix_seed(seed, 0x0f01));
        let dims = TreeDims::default();
        let points = (0..FOLIAGE_COUNT)
            .map(|_| {
                let chaos = chaos_position(&mut rng, FOLIAGE_CHAOS_RADIUS);
                let target = tree_position(&mut rng, dims);
                FoliagePoint {
                    chaos: chaos.to_array(),
                    target: target.to_array(),
                    random: rng.gen::<f32>(),
                }
            })
            .collect();
        Self {
            points,
            smoothed_progress: initial_progress.clamp(0.0, 1.0),
        }
    }

    pub fn points(&self) -> &[FoliagePoint] {
        &self.points
    }

    pub fn advance(&mut self, global_progress: f32, dt: f32) {
        let alpha = (FOLIAGE_WEIGHT * dt).clamp(0.0, 1.0);
        self.smoothed_progress += (global_progress - self.smoothed_progress) * alpha;
    }

    /// Raw smoothed progress; the shader applies the cubic ease itself.
    pub fn progress(&self) -> f32 {
        self.smoothed_progress
    }
}
