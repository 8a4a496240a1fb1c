//! Instance populations: the static per-element data behind the tree.
//!
//! Three populations make up the scene: fine foliage particles, ornament
//! baubles, and flat photo cards. Each instance carries both of its endpoint
//! transforms plus visual attributes, generated once at startup and
//! immutable afterwards. Regenerating endpoints mid-run would teleport
//! elements, so nothing here is ever resized or resampled.

use crate::blend::BlendState;
use crate::shape::ShapeContext;
use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3};

/// Deep green of the formed tree body.
pub const EMERALD: Vec3 = Vec3::new(0.0, 0.259, 0.145);
/// High-gloss gold accents.
pub const GOLD: Vec3 = Vec3::new(1.0, 0.843, 0.0);
/// Dark red ornament velvet.
pub const RED_VELVET: Vec3 = Vec3::new(0.5, 0.0, 0.0);
/// Warm card white.
pub const CARD_WHITE: Vec3 = Vec3::new(1.0, 1.0, 0.933);

/// Geometry and population sizing for the whole tree.
#[derive(Debug, Clone)]
pub struct TreeConfig {
    pub foliage_count: u32,
    pub ornament_count: u32,
    pub card_count: u32,
    /// Cone height, centered on y = 0.
    pub tree_height: f32,
    /// Cone radius at the base.
    pub tree_radius: f32,
    /// Radius of the scattered cloud.
    pub scatter_radius: f32,
    /// RNG seed for generation; `None` draws a fresh layout each run.
    pub seed: Option<u64>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            foliage_count: 4500,
            ornament_count: 200,
            card_count: 30,
            tree_height: 12.0,
            tree_radius: 4.5,
            scatter_radius: 25.0,
            seed: None,
        }
    }
}

/// One renderable element with its two cached endpoint transforms.
///
/// Read-only after generation.
#[derive(Debug, Clone)]
pub struct Instance {
    pub formed_position: Vec3,
    pub scattered_position: Vec3,
    pub formed_rotation: Quat,
    pub scattered_rotation: Quat,
    pub color: Vec3,
    pub scale: f32,
    /// Phase seed desynchronizing the drift oscillation across instances.
    pub phase: f32,
}

/// Per-instance data in the layout the render pipeline consumes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct InstanceRaw {
    pub position: [f32; 3],
    pub scale: f32,
    pub color: [f32; 3],
    /// 1.0 = screen-facing sprite, 0.0 = world-oriented quad.
    pub billboard: f32,
    pub rotation: [f32; 4],
}

/// The three element categories, each with its own transition feel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulationKind {
    Foliage,
    Ornament,
    Card,
}

impl PopulationKind {
    /// Blend smoothing rate: foliage snaps fastest, cards trail behind.
    pub fn blend_rate(&self) -> f32 {
        match self {
            PopulationKind::Foliage => 2.0,
            PopulationKind::Ornament => 1.5,
            PopulationKind::Card => 1.2,
        }
    }

    /// Amplitude of the mid-transition drift. Cards fly clean.
    pub fn drift_amplitude(&self) -> f32 {
        match self {
            PopulationKind::Foliage => 0.2,
            PopulationKind::Ornament => 0.1,
            PopulationKind::Card => 0.0,
        }
    }

    fn billboard(&self) -> bool {
        matches!(self, PopulationKind::Foliage)
    }
}

/// A fixed-length collection of instances plus its blend state and the
/// pre-allocated buffer the interpolation engine writes each frame.
pub struct Population {
    kind: PopulationKind,
    instances: Vec<Instance>,
    blend: BlendState,
    raw: Vec<InstanceRaw>,
}

impl Population {
    fn new(kind: PopulationKind, instances: Vec<Instance>) -> Self {
        let raw = instances
            .iter()
            .map(|i| InstanceRaw {
                position: i.formed_position.to_array(),
                scale: i.scale,
                color: i.color.to_array(),
                billboard: if kind.billboard() { 1.0 } else { 0.0 },
                rotation: i.formed_rotation.to_array(),
            })
            .collect();
        Self {
            kind,
            instances,
            blend: BlendState::new(),
            raw,
        }
    }

    /// Foliage: thousands of tiny emerald points filling the cone volume,
    /// with a sprinkle of gold. Rendered as screen-facing sprites.
    pub fn foliage(ctx: &mut ShapeContext, config: &TreeConfig) -> Self {
        let instances = (0..config.foliage_count)
            .map(|_| {
                let color = if ctx.random() > 0.9 {
                    GOLD
                } else {
                    // Slight per-particle lightness jitter on the emerald.
                    let jitter = ctx.random_range(-0.05, 0.05);
                    (EMERALD + Vec3::splat(jitter)).clamp(Vec3::ZERO, Vec3::ONE)
                };
                Instance {
                    formed_position: ctx.cone_point(config.tree_height, config.tree_radius),
                    scattered_position: ctx.scatter_point(config.scatter_radius),
                    formed_rotation: Quat::IDENTITY,
                    scattered_rotation: Quat::IDENTITY,
                    color,
                    scale: ctx.random_range(0.010, 0.018),
                    phase: ctx.random_phase(),
                }
            })
            .collect();
        Self::new(PopulationKind::Foliage, instances)
    }

    /// Ornaments: red and gold baubles hanging on the cone surface, tumbling
    /// to a random orientation when scattered.
    pub fn ornaments(ctx: &mut ShapeContext, config: &TreeConfig) -> Self {
        let instances = (0..config.ornament_count)
            .map(|_| {
                let color = if ctx.random() > 0.5 { RED_VELVET } else { GOLD };
                Instance {
                    formed_position: ctx
                        .cone_surface_point(config.tree_height, config.tree_radius),
                    scattered_position: ctx.scatter_point(config.scatter_radius),
                    formed_rotation: Quat::IDENTITY,
                    scattered_rotation: ctx.random_rotation(),
                    color,
                    scale: ctx.random_range(0.2, 0.5),
                    phase: ctx.random_phase(),
                }
            })
            .collect();
        Self::new(PopulationKind::Ornament, instances)
    }

    /// Cards: flat quads spiralling up the tree just off the surface, facing
    /// outward while formed and tumbled when scattered. The scatter cloud is
    /// slightly tighter than the particles' so cards stay in frame.
    pub fn cards(ctx: &mut ShapeContext, config: &TreeConfig) -> Self {
        let instances = (0..config.card_count)
            .map(|_| {
                let (formed_position, formed_rotation) =
                    ctx.spiral_point(config.tree_height, config.tree_radius, 5.0, 0.5);
                Instance {
                    formed_position,
                    scattered_position: ctx.scatter_point(config.scatter_radius * 0.8),
                    formed_rotation,
                    scattered_rotation: ctx.random_rotation(),
                    color: CARD_WHITE,
                    scale: 0.8,
                    phase: ctx.random_phase(),
                }
            })
            .collect();
        Self::new(PopulationKind::Card, instances)
    }

    #[inline]
    pub fn kind(&self) -> PopulationKind {
        self.kind
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    #[inline]
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    #[inline]
    pub fn blend(&self) -> &BlendState {
        &self.blend
    }

    #[inline]
    pub fn blend_mut(&mut self) -> &mut BlendState {
        &mut self.blend
    }

    /// The render-facing buffer as written by the last morph pass.
    #[inline]
    pub fn raw(&self) -> &[InstanceRaw] {
        &self.raw
    }

    pub(crate) fn parts_mut(&mut self) -> (&[Instance], &mut BlendState, &mut [InstanceRaw]) {
        (&self.instances, &mut self.blend, &mut self.raw)
    }
}
