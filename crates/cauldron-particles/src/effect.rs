//! A spawned composite effect: explosion, smoke and shockwave at one point

use crate::config::EffectConfig;
use crate::renderables::{explosion_renderable, shockwave_renderable, smoke_renderable};
use crate::techniques::EffectTechniques;
use cauldron_core::{Color, EffectId, Transform};
use cauldron_render::{Command, FrameUniforms, GpuBackend, RenderError, Renderable};
use glam::{Mat4, Vec2};
use rand::Rng;
use std::time::Instant;

/// Uniform names shared by the effect shaders
pub mod uniforms {
    pub const PROJECTION: &str = "projection";
    pub const VIEW: &str = "view";
    pub const MODEL: &str = "model";
    pub const COLOR: &str = "color";
    pub const TIME: &str = "time";
    pub const LIFETIME: &str = "lifetime";
    pub const GRAVITY: &str = "gravity";
    pub const RISE: &str = "rise";
    pub const FORCE: &str = "force";
}

/// Per-effect uniform constants, captured from the config at spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectStyle {
    pub explosion_color: Color,
    pub gravity: Vec2,
    pub smoke_color: Color,
    pub rise: Vec2,
    pub shockwave_color: Color,
    pub shockwave_force: f32,
    /// Seconds over which the shaders fade the effect out
    pub lifetime: f32,
}

impl From<&EffectConfig> for EffectStyle {
    fn from(config: &EffectConfig) -> Self {
        Self {
            explosion_color: config.explosion.color,
            gravity: config.explosion.gravity,
            smoke_color: config.smoke.color,
            rise: config.smoke.rise,
            shockwave_color: config.shockwave.color,
            shockwave_force: config.shockwave.force,
            lifetime: config.lifetime,
        }
    }
}

pub struct Effect<B: GpuBackend> {
    id: EffectId,
    spawn_time: Instant,
    position: Vec2,
    explosion: Renderable<B>,
    smoke: Renderable<B>,
    shockwave: Renderable<B>,
    style: EffectStyle,
}

impl<B: GpuBackend> Effect<B> {
    /// Generate fresh swarms and upload all three renderables
    pub fn new<R: Rng + ?Sized>(
        gpu: &mut B,
        rng: &mut R,
        id: EffectId,
        position: Vec2,
        spawn_time: Instant,
        config: &EffectConfig,
    ) -> Result<Self, RenderError> {
        Ok(Self {
            id,
            spawn_time,
            position,
            explosion: explosion_renderable(gpu, rng, &config.explosion)?,
            smoke: smoke_renderable(gpu, rng, &config.smoke)?,
            shockwave: shockwave_renderable(gpu, &config.shockwave)?,
            style: EffectStyle::from(config),
        })
    }

    pub fn id(&self) -> EffectId {
        self.id
    }

    pub fn spawn_time(&self) -> Instant {
        self.spawn_time
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn style(&self) -> &EffectStyle {
        &self.style
    }

    pub fn explosion(&self) -> &Renderable<B> {
        &self.explosion
    }

    pub fn smoke(&self) -> &Renderable<B> {
        &self.smoke
    }

    pub fn shockwave(&self) -> &Renderable<B> {
        &self.shockwave
    }

    /// Seconds since spawn; negative if `now` precedes the spawn
    pub fn elapsed_secs(&self, now: Instant) -> f32 {
        match now.checked_duration_since(self.spawn_time) {
            Some(age) => age.as_secs_f32(),
            None => -self.spawn_time.duration_since(now).as_secs_f32(),
        }
    }

    /// Active while `elapsed < lifetime`
    pub fn is_expired(&self, now: Instant, lifetime: f32) -> bool {
        self.elapsed_secs(now) >= lifetime
    }

    pub fn model_matrix(&self) -> Mat4 {
        Transform::from_translation(self.position).matrix()
    }

    fn base_command<'a>(
        &self,
        renderable: &'a Renderable<B>,
        frame: &FrameUniforms,
        color: Color,
    ) -> Command<'a, B> {
        Command::new(renderable)
            .uniform(uniforms::PROJECTION, frame.projection)
            .uniform(uniforms::VIEW, frame.view)
            .uniform(uniforms::MODEL, self.model_matrix())
            .uniform(uniforms::COLOR, color)
            .uniform(uniforms::LIFETIME, self.style.lifetime)
    }

    pub fn shockwave_command(&self, frame: &FrameUniforms, t: f32) -> Command<'_, B> {
        self.base_command(&self.shockwave, frame, self.style.shockwave_color)
            .uniform(uniforms::FORCE, self.style.shockwave_force)
            .uniform(uniforms::TIME, t)
    }

    pub fn smoke_command(&self, frame: &FrameUniforms, t: f32) -> Command<'_, B> {
        self.base_command(&self.smoke, frame, self.style.smoke_color)
            .uniform(uniforms::RISE, self.style.rise)
            .uniform(uniforms::TIME, t)
    }

    pub fn explosion_command(&self, frame: &FrameUniforms, t: f32) -> Command<'_, B> {
        self.base_command(&self.explosion, frame, self.style.explosion_color)
            .uniform(uniforms::GRAVITY, self.style.gravity)
            .uniform(uniforms::TIME, t)
    }

    /// Draw back to front: shockwave, smoke, explosion
    pub fn draw(&self, gpu: &mut B, techniques: &EffectTechniques, frame: &FrameUniforms, now: Instant) {
        let t = self.elapsed_secs(now);
        techniques
            .shockwave
            .execute(gpu, &[self.shockwave_command(frame, t)]);
        techniques.smoke.execute(gpu, &[self.smoke_command(frame, t)]);
        techniques
            .explosion
            .execute(gpu, &[self.explosion_command(frame, t)]);
    }
}

/// Flat-color draw of `renderable` with the given model transform
pub fn flat_command<'a, B: GpuBackend>(
    renderable: &'a Renderable<B>,
    color: Color,
    frame: &FrameUniforms,
    model: Mat4,
) -> Command<'a, B> {
    Command::new(renderable)
        .uniform(uniforms::PROJECTION, frame.projection)
        .uniform(uniforms::VIEW, frame.view)
        .uniform(uniforms::MODEL, model)
        .uniform(uniforms::COLOR, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rand::particle_rng;
    use cauldron_render::{GpuCall, RecordingBackend, UniformValue, Viewport};
    use std::time::Duration;

    fn small_config() -> EffectConfig {
        let mut config = EffectConfig::default();
        config.explosion.count = 8;
        config.smoke.count = 8;
        config
    }

    fn spawn(gpu: &mut RecordingBackend, at: Instant) -> Effect<RecordingBackend> {
        let mut rng = particle_rng(Some(4));
        Effect::new(
            gpu,
            &mut rng,
            EffectId::from_raw(1),
            Vec2::new(100.0, 50.0),
            at,
            &small_config(),
        )
        .unwrap()
    }

    #[test]
    fn elapsed_is_signed() {
        let mut gpu = RecordingBackend::new();
        let start = Instant::now() + Duration::from_secs(10);
        let effect = spawn(&mut gpu, start);
        assert!((effect.elapsed_secs(start + Duration::from_millis(1500)) - 1.5).abs() < 1e-4);
        assert!((effect.elapsed_secs(start - Duration::from_secs(1)) + 1.0).abs() < 1e-4);
    }

    #[test]
    fn expiry_boundary() {
        let mut gpu = RecordingBackend::new();
        let start = Instant::now();
        let effect = spawn(&mut gpu, start);
        assert!(!effect.is_expired(start + Duration::from_secs_f32(2.9), 3.0));
        assert!(effect.is_expired(start + Duration::from_secs(3), 3.0));
        assert!(effect.is_expired(start + Duration::from_secs_f32(3.1), 3.0));
    }

    #[test]
    fn model_translates_to_spawn_point() {
        let mut gpu = RecordingBackend::new();
        let effect = spawn(&mut gpu, Instant::now());
        let p = effect.model_matrix().transform_point3(glam::Vec3::ZERO);
        assert_eq!(p, glam::Vec3::new(100.0, 50.0, 0.0));
    }

    #[test]
    fn draw_order_and_uniforms() {
        let mut gpu = RecordingBackend::new();
        let techniques = EffectTechniques::new(&mut gpu, Viewport::full(800, 600)).unwrap();
        let start = Instant::now();
        let effect = spawn(&mut gpu, start);
        gpu.clear_calls();

        effect.draw(
            &mut gpu,
            &techniques,
            &FrameUniforms::default(),
            start + Duration::from_secs(1),
        );

        let programs: Vec<_> = gpu
            .draw_calls()
            .into_iter()
            .map(|c| match c {
                GpuCall::DrawElements { program, .. } => program,
                _ => None,
            })
            .collect();
        assert_eq!(
            programs,
            vec![
                Some(techniques.shockwave.shader().id()),
                Some(techniques.smoke.shader().id()),
                Some(techniques.explosion.shader().id()),
            ]
        );

        let explosion = techniques.explosion.shader().id();
        assert_eq!(
            gpu.uniform(explosion, "gravity"),
            Some(UniformValue::Vec2(Vec2::new(0.0, -200.0)))
        );
        assert_eq!(gpu.uniform(explosion, "time"), Some(UniformValue::F32(1.0)));
        let shockwave = techniques.shockwave.shader().id();
        assert_eq!(gpu.uniform(shockwave, "force"), Some(UniformValue::F32(15.0)));
        let smoke = techniques.smoke.shader().id();
        assert_eq!(
            gpu.uniform(smoke, "color"),
            Some(UniformValue::Vec4(glam::Vec4::new(0.41, 0.4, 0.39, 0.2)))
        );
    }

    #[test]
    fn configured_lifetime_reaches_every_shader() {
        let mut gpu = RecordingBackend::new();
        let techniques = EffectTechniques::new(&mut gpu, Viewport::full(800, 600)).unwrap();
        let mut config = small_config();
        config.lifetime = 5.0;
        let mut rng = particle_rng(Some(9));
        let start = Instant::now();
        let effect = Effect::new(
            &mut gpu,
            &mut rng,
            EffectId::from_raw(1),
            Vec2::ZERO,
            start,
            &config,
        )
        .unwrap();

        effect.draw(&mut gpu, &techniques, &FrameUniforms::default(), start);

        for technique in [&techniques.shockwave, &techniques.smoke, &techniques.explosion] {
            assert_eq!(
                gpu.uniform(technique.shader().id(), "lifetime"),
                Some(UniformValue::F32(5.0))
            );
        }
    }

    #[test]
    fn flat_command_carries_camera_and_color() {
        let mut gpu = RecordingBackend::new();
        let quad = crate::renderables::quad_renderable(&mut gpu, 8.0).unwrap();
        let command = flat_command(&quad, Color::WHITE, &FrameUniforms::default(), Mat4::IDENTITY);
        let names: Vec<&str> = command.uniforms().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["projection", "view", "model", "color"]);
    }
}
