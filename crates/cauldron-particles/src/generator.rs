//! Per-instance particle attributes from randomized distributions

use crate::rand::{random_unit_vec2, unit_scaled};
use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How particle sizes are drawn, as a fraction of `max_size`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeDistribution {
    /// Uniform in [0, 1)
    #[default]
    Uniform,
    /// Uniform in [0.5, 1)
    UpperHalf,
}

/// Parameters of one swarm
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwarmParams {
    pub count: usize,
    pub spread_radius: f32,
    pub force: f32,
    pub max_size: f32,
    pub size_distribution: SizeDistribution,
    /// Added to every velocity after the random part
    pub directional_bias: Vec2,
}

/// Offsets, velocities and sizes of `count` particles, index-aligned
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParticleAttributeSet {
    offsets: Vec<Vec2>,
    velocities: Vec<Vec2>,
    sizes: Vec<f32>,
}

impl ParticleAttributeSet {
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn offsets(&self) -> &[Vec2] {
        &self.offsets
    }

    pub fn velocities(&self) -> &[Vec2] {
        &self.velocities
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// `offsets ‖ velocities ‖ sizes` as consecutive f32 regions
    pub fn to_instance_floats(&self) -> Vec<f32> {
        let mut floats = Vec::with_capacity(self.len() * 5);
        floats.extend(self.offsets.iter().flat_map(|v| v.to_array()));
        floats.extend(self.velocities.iter().flat_map(|v| v.to_array()));
        floats.extend_from_slice(&self.sizes);
        floats
    }

    /// Byte form of [`Self::to_instance_floats`]
    pub fn to_instance_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.to_instance_floats()).to_vec()
    }
}

/// Sample a swarm.
///
/// Offsets are a random direction scaled by a uniform radius in
/// [0, spread_radius), so particles cluster toward the center.
pub fn generate<R: Rng + ?Sized>(rng: &mut R, params: &SwarmParams) -> ParticleAttributeSet {
    let n = params.count;

    let offsets = (0..n)
        .map(|_| random_unit_vec2(rng) * unit_scaled(rng, params.spread_radius))
        .collect();

    let velocities = (0..n)
        .map(|_| random_unit_vec2(rng) * unit_scaled(rng, params.force) + params.directional_bias)
        .collect();

    let sizes = (0..n)
        .map(|_| {
            let fraction = match params.size_distribution {
                SizeDistribution::Uniform => rng.gen::<f32>(),
                SizeDistribution::UpperHalf => 0.5 + rng.gen::<f32>() * 0.5,
            };
            fraction * params.max_size
        })
        .collect();

    ParticleAttributeSet {
        offsets,
        velocities,
        sizes,
    }
}
