//! Lifetime management for spawned effects

use crate::config::EffectConfig;
use crate::effect::Effect;
use crate::techniques::EffectTechniques;
use cauldron_core::{EffectId, Result};
use cauldron_render::{FrameUniforms, GpuBackend};
use glam::Vec2;
use rand::Rng;
use std::time::Instant;

/// Owns every live effect in spawn order.
///
/// Expired effects are removed by [`EffectManager::prune`], which keeps the
/// survivors in their original order and drops each removed effect exactly
/// once, releasing its GPU buffers.
pub struct EffectManager<B: GpuBackend> {
    effects: Vec<Effect<B>>,
    config: EffectConfig,
    next_id: EffectId,
}

impl<B: GpuBackend> EffectManager<B> {
    pub fn new(config: EffectConfig) -> Self {
        Self {
            effects: Vec::new(),
            config,
            next_id: EffectId::from_raw(1),
        }
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// Build a new effect at `position` and append it
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        gpu: &mut B,
        rng: &mut R,
        position: Vec2,
        now: Instant,
    ) -> Result<EffectId> {
        let id = self.next_id;
        let effect = Effect::new(gpu, rng, id, position, now, &self.config)?;
        self.next_id = id.next();
        self.effects.push(effect);
        tracing::info!(%id, x = position.x, y = position.y, live = self.effects.len(), "spawned effect");
        Ok(id)
    }

    /// Draw every effect in spawn order
    pub fn draw(&self, gpu: &mut B, techniques: &EffectTechniques, frame: &FrameUniforms, now: Instant) {
        for effect in &self.effects {
            effect.draw(gpu, techniques, frame, now);
        }
    }

    /// Remove effects whose lifetime has passed, returning how many were removed
    pub fn prune(&mut self, now: Instant) -> usize {
        let lifetime = self.config.lifetime;
        let (live, expired): (Vec<_>, Vec<_>) = std::mem::take(&mut self.effects)
            .into_iter()
            .partition(|effect| !effect.is_expired(now, lifetime));
        self.effects = live;

        let removed = expired.len();
        if removed > 0 {
            tracing::debug!(removed, live = self.effects.len(), "pruned expired effects");
        }
        removed
    }

    /// Draw, then prune
    pub fn tick(
        &mut self,
        gpu: &mut B,
        techniques: &EffectTechniques,
        frame: &FrameUniforms,
        now: Instant,
    ) -> usize {
        self.draw(gpu, techniques, frame, now);
        self.prune(now)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Ids of live effects in spawn order
    pub fn ids(&self) -> Vec<EffectId> {
        self.effects.iter().map(Effect::id).collect()
    }

    pub fn get(&self, id: EffectId) -> Option<&Effect<B>> {
        self.effects.iter().find(|e| e.id() == id)
    }

    /// Drop every effect
    pub fn clear(&mut self) {
        self.effects.clear();
    }
}
