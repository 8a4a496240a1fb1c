//! Procedural placement for tree instances.
//!
//! Every instance gets two endpoint transforms at creation time: a "formed"
//! position on or inside the cone of the tree, and a "scattered" position
//! inside a much larger sphere. Both are drawn once from a [`ShapeContext`]
//! and never regenerated, so an instance interpolates between the same pair
//! of points for its entire lifetime.
//!
//! # Example
//!
//! ```ignore
//! use treeform::shape::ShapeContext;
//!
//! let mut ctx = ShapeContext::new();
//! let formed = ctx.cone_point(12.0, 4.5);
//! let scattered = ctx.scatter_point(25.0);
//! ```

use glam::{EulerRot, Quat, Vec3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Sampling context for generating instance endpoints.
///
/// Wraps a small, fast RNG. Construct with [`ShapeContext::new`] for a
/// different layout each run, or [`ShapeContext::from_seed`] when tests need
/// a reproducible population.
pub struct ShapeContext {
    rng: SmallRng,
}

impl ShapeContext {
    /// Create a context seeded from the wall clock.
    pub fn new() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::from_seed(seed)
    }

    /// Create a context with an explicit seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in the given range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        self.rng.gen_range(min..max)
    }

    /// Random point inside a cone standing on the y axis.
    ///
    /// The height fraction is uniform, the surface radius shrinks linearly
    /// with height, and the radial draw is biased toward the surface with a
    /// square-root transform so points do not cluster on the axis. `y` is
    /// centered: the cone spans `-height/2 .. height/2`.
    pub fn cone_point(&mut self, height: f32, max_radius: f32) -> Vec3 {
        let h = self.rng.gen::<f32>();
        let surface = (1.0 - h) * max_radius;
        let r = surface * self.rng.gen::<f32>().sqrt();
        let angle = self.rng.gen_range(0.0..TAU);
        Vec3::new(angle.cos() * r, (h - 0.5) * height, angle.sin() * r)
    }

    /// Random point exactly on the cone surface.
    pub fn cone_surface_point(&mut self, height: f32, max_radius: f32) -> Vec3 {
        let h = self.rng.gen::<f32>();
        let r = (1.0 - h) * max_radius;
        let angle = self.rng.gen_range(0.0..TAU);
        Vec3::new(angle.cos() * r, (h - 0.5) * height, angle.sin() * r)
    }

    /// Point on a spiral winding around the cone, with an outward-facing yaw.
    ///
    /// The height fraction is drawn uniformly; the azimuth winds `turns`
    /// times around the cone from bottom to top, and `offset` pushes the
    /// point slightly off the surface. Returns the position and the rotation
    /// that faces the point away from the axis.
    pub fn spiral_point(
        &mut self,
        height: f32,
        max_radius: f32,
        turns: f32,
        offset: f32,
    ) -> (Vec3, Quat) {
        let h = self.rng.gen::<f32>();
        let r = (1.0 - h) * max_radius + offset;
        let angle = h * turns * TAU;
        let position = Vec3::new(angle.cos() * r, (h - 0.5) * height, angle.sin() * r);
        let facing = Quat::from_euler(EulerRot::XYZ, 0.0, -angle, 0.0);
        (position, facing)
    }

    /// Random point in a rough sphere fill of the given radius.
    ///
    /// A uniformly-random direction scaled by a uniformly-random radius:
    /// denser toward the center than a true volume-uniform draw, which reads
    /// as a loose cloud rather than a shell.
    pub fn scatter_point(&mut self, radius: f32) -> Vec3 {
        let v = Vec3::new(
            self.rng.gen_range(-1.0..1.0f32),
            self.rng.gen_range(-1.0..1.0f32),
            self.rng.gen_range(-1.0..1.0f32),
        );
        let dir = v.try_normalize().unwrap_or(Vec3::Y);
        dir * radius * self.rng.gen::<f32>()
    }

    /// Random orientation from independent Euler angle draws.
    pub fn random_rotation(&mut self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rng.gen_range(0.0..TAU),
            self.rng.gen_range(0.0..TAU),
            self.rng.gen_range(0.0..TAU),
        )
    }

    /// Random phase offset for desynchronizing drift oscillation.
    #[inline]
    pub fn random_phase(&mut self) -> f32 {
        self.rng.gen_range(0.0..TAU)
    }
}

impl Default for ShapeContext {
    fn default() -> Self {
        Self::new()
    }
}
