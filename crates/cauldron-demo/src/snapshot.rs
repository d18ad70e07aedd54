//! Headless single-frame render to PNG

use crate::config::DemoConfig;
use anyhow::{bail, Context, Result};
use cauldron_particles::rand::particle_rng;
use cauldron_particles::{EffectManager, EffectTechniques};
use cauldron_render::{HeadlessContext, OrthoCamera, Viewport};
use glam::Vec2;
use std::path::Path;
use std::time::{Duration, Instant};

/// Render one effect spawned at the window center, `age` seconds after spawn
pub fn render_snapshot(config: &DemoConfig, age: f32, output: &Path) -> Result<()> {
    if !age.is_finite() || age < 0.0 {
        bail!("snapshot age must be a non-negative number of seconds, got {age}");
    }
    config.validate()?;
    let (width, height) = (config.window.width, config.window.height);

    let ctx = pollster::block_on(HeadlessContext::new(width, height))
        .context("Failed to create headless render context")?;
    let mut backend = ctx.create_backend();
    let techniques = EffectTechniques::new(&mut backend, Viewport::full(width, height))
        .context("Failed to compile effect shaders")?;
    let camera = OrthoCamera::new(width, height);

    let mut rng = particle_rng(config.seed);
    let mut effects = EffectManager::new(config.effects.clone());
    let spawned_at = Instant::now();
    let center = Vec2::new(width as f32 / 2.0, height as f32 / 2.0);
    effects
        .spawn(&mut backend, &mut rng, center, spawned_at)
        .context("Failed to spawn effect")?;

    let frame = camera.frame_uniforms();
    backend.begin_frame(config.window.clear_color);
    effects.draw(
        &mut backend,
        &techniques,
        &frame,
        spawned_at + Duration::from_secs_f32(age),
    );
    backend.end_frame(&ctx.color_view, &ctx.depth_view);

    let pixels = pollster::block_on(ctx.read_pixels()).context("Failed to read rendered pixels")?;
    let img = image::RgbaImage::from_raw(width, height, pixels)
        .context("Failed to create image from pixel data")?;
    img.save(output)
        .with_context(|| format!("Failed to save image to {}", output.display()))?;

    tracing::info!(width, height, age, path = %output.display(), "wrote snapshot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_age_is_rejected_before_touching_the_gpu() {
        let err = render_snapshot(&DemoConfig::default(), -1.0, Path::new("unused.png"))
            .unwrap_err();
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn zero_sized_target_is_rejected() {
        let mut config = DemoConfig::default();
        config.window.height = 0;
        let err = render_snapshot(&config, 0.5, Path::new("unused.png")).unwrap_err();
        assert!(err.to_string().contains("non-zero"));
    }

    #[test]
    fn nan_age_is_rejected() {
        assert!(render_snapshot(&DemoConfig::default(), f32::NAN, Path::new("unused.png")).is_err());
    }
}
