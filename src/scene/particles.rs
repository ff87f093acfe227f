use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f32::consts::{PI, TAU};

use crate::catalog::{ParticleColorCatalog, DEFAULT_PARTICLE_COLOR};

pub const DEFAULT_PARTICLE_COUNT: usize = 200;
pub const SHELL_INNER_RADIUS: f32 = 5.0;
pub const SHELL_OUTER_RADIUS: f32 = 10.0;
/// World-space point diameter
pub const POINT_SIZE: f32 = 0.2;

/// Fixed-size point halo around the model
///
/// Live positions are always the original positions times one shared spread
/// factor; individual points are never moved on their own.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    original: Vec<Vec3>,
    positions: Vec<Vec3>,
    spread: f32,
    /// Placement of the cloud's local origin in world space
    pub origin: Vec3,
    /// sRGB colour
    pub color: [f32; 3],
    pub opacity: f32,
    pub size: f32,
}

impl ParticleSystem {
    /// Samples `count` points on the spherical shell between the two radii
    pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let original: Vec<Vec3> = (0..count)
            .map(|_| sample_shell_point(rng, SHELL_INNER_RADIUS, SHELL_OUTER_RADIUS))
            .collect();

        let color = ParticleColorCatalog::standard()
            .get(DEFAULT_PARTICLE_COLOR)
            .copied()
            .unwrap_or([1.0; 3]);

        Self {
            positions: original.clone(),
            original,
            spread: 1.0,
            origin: Vec3::ZERO,
            color,
            opacity: 0.0,
            size: POINT_SIZE,
        }
    }

    /// Deterministic cloud for a given seed
    pub fn with_seed(count: usize, seed: u64) -> Self {
        Self::generate(count, &mut Pcg32::seed_from_u64(seed))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn original_positions(&self) -> &[Vec3] {
        &self.original
    }

    pub fn spread(&self) -> f32 {
        self.spread
    }

    /// Rewrites every live position as `original * spread`
    pub fn set_spread(&mut self, spread: f32) {
        self.spread = spread;
        for (live, original) in self.positions.iter_mut().zip(&self.original) {
            *live = *original * spread;
        }
    }
}

/// Inverse-transform sampling: uniform azimuth, `acos(2u - 1)` polar angle,
/// radius uniform in `[inner, outer)`
pub fn sample_shell_point<R: Rng + ?Sized>(rng: &mut R, inner: f32, outer: f32) -> Vec3 {
    let radius = inner + rng.random::<f32>() * (outer - inner);
    let theta = rng.random::<f32>() * TAU;
    let phi = (2.0 * rng.random::<f32>() - 1.0).clamp(-1.0, 1.0).acos();

    debug_assert!((0.0..=PI).contains(&phi));

    Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
    )
}
