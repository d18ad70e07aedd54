//! Cauldron Particles - procedural swarms and time-bounded effects
//!
//! Clicking spawns an [`Effect`]: an explosion swarm, a smoke swarm and a
//! shockwave ring, all animated in the vertex stage as a function of time
//! since spawn. [`EffectManager`] owns live effects and prunes them once
//! their lifetime has passed.

pub mod config;
mod effect;
pub mod generator;
mod manager;
pub mod rand;
pub mod renderables;
mod techniques;

pub use config::{EffectConfig, ExplosionConfig, ShockwaveConfig, SmokeConfig};
pub use effect::{flat_command, uniforms, Effect, EffectStyle};
pub use generator::{generate, ParticleAttributeSet, SizeDistribution, SwarmParams};
pub use manager::EffectManager;
pub use techniques::{
    explosion_technique, flat_technique, shockwave_technique, smoke_technique, EffectTechniques,
    EXPLOSION_WGSL, FLAT_WGSL, SHOCKWAVE_WGSL, SMOKE_WGSL,
};
