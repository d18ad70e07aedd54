//! Technique presets and the shared technique set effects draw with

use cauldron_render::{
    BlendFactor, Capability, GpuBackend, RenderError, ShaderProgram, ShaderSource, Technique,
    Viewport,
};
use std::rc::Rc;

pub const EXPLOSION_WGSL: &str = include_str!("shaders/explosion.wgsl");
pub const SMOKE_WGSL: &str = include_str!("shaders/smoke.wgsl");
pub const SHOCKWAVE_WGSL: &str = include_str!("shaders/shockwave.wgsl");
pub const FLAT_WGSL: &str = include_str!("shaders/flat.wgsl");

fn blended(label: &str, shader: Rc<ShaderProgram>, dst: BlendFactor, viewport: Viewport) -> Technique {
    Technique::new(label, shader)
        .enable(Capability::Blend)
        .disable(Capability::DepthTest)
        .blend_func(BlendFactor::SrcAlpha, dst)
        .viewport(viewport)
}

/// Additive blending
pub fn explosion_technique(shader: Rc<ShaderProgram>, viewport: Viewport) -> Technique {
    blended("explosion", shader, BlendFactor::One, viewport)
}

/// Alpha blending
pub fn smoke_technique(shader: Rc<ShaderProgram>, viewport: Viewport) -> Technique {
    blended("smoke", shader, BlendFactor::OneMinusSrcAlpha, viewport)
}

/// Additive blending
pub fn shockwave_technique(shader: Rc<ShaderProgram>, viewport: Viewport) -> Technique {
    blended("shockwave", shader, BlendFactor::One, viewport)
}

/// Alpha blending
pub fn flat_technique(shader: Rc<ShaderProgram>, viewport: Viewport) -> Technique {
    blended("flat", shader, BlendFactor::OneMinusSrcAlpha, viewport)
}

/// The techniques every effect draws with, compiled once per backend
#[derive(Debug, Clone)]
pub struct EffectTechniques {
    pub explosion: Technique,
    pub smoke: Technique,
    pub shockwave: Technique,
    pub flat: Technique,
}

impl EffectTechniques {
    pub fn new<B: GpuBackend>(gpu: &mut B, viewport: Viewport) -> Result<Self, RenderError> {
        let mut compile = |label: &str, wgsl: &str| -> Result<Rc<ShaderProgram>, RenderError> {
            Ok(Rc::new(gpu.create_program(&ShaderSource::new(label, wgsl))?))
        };
        let explosion = compile("explosion", EXPLOSION_WGSL)?;
        let smoke = compile("smoke", SMOKE_WGSL)?;
        let shockwave = compile("shockwave", SHOCKWAVE_WGSL)?;
        let flat = compile("flat", FLAT_WGSL)?;

        tracing::info!(?viewport, "effect techniques compiled");
        Ok(Self {
            explosion: explosion_technique(explosion, viewport),
            smoke: smoke_technique(smoke, viewport),
            shockwave: shockwave_technique(shockwave, viewport),
            flat: flat_technique(flat, viewport),
        })
    }

    /// Point every technique at a new viewport after a resize
    pub fn set_viewport(&mut self, viewport: Viewport) {
        for technique in [
            &mut self.explosion,
            &mut self.smoke,
            &mut self.shockwave,
            &mut self.flat,
        ] {
            technique.set_viewport(viewport);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cauldron_render::{reflect_uniform_block, RecordingBackend};

    fn offsets(wgsl: &str, label: &str) -> cauldron_render::UniformBlockDescriptor {
        reflect_uniform_block(&ShaderSource::new(label, wgsl)).unwrap()
    }

    #[test]
    fn explosion_shader_uniforms() {
        let block = offsets(EXPLOSION_WGSL, "explosion");
        assert_eq!(block.offset("projection"), Some(0));
        assert_eq!(block.offset("view"), Some(64));
        assert_eq!(block.offset("model"), Some(128));
        assert_eq!(block.offset("color"), Some(192));
        assert_eq!(block.offset("gravity"), Some(208));
        assert_eq!(block.offset("time"), Some(216));
        assert_eq!(block.offset("lifetime"), Some(220));
        assert_eq!(block.size(), 224);
    }

    #[test]
    fn smoke_shader_uniforms() {
        let block = offsets(SMOKE_WGSL, "smoke");
        assert_eq!(block.offset("rise"), Some(208));
        assert_eq!(block.offset("time"), Some(216));
    }

    #[test]
    fn shockwave_shader_uniforms() {
        let block = offsets(SHOCKWAVE_WGSL, "shockwave");
        assert_eq!(block.offset("force"), Some(208));
        assert_eq!(block.offset("time"), Some(212));
        assert_eq!(block.offset("lifetime"), Some(216));
        assert_eq!(block.size(), 224);
    }

    #[test]
    fn flat_shader_uniforms() {
        let block = offsets(FLAT_WGSL, "flat");
        assert_eq!(block.offset("color"), Some(192));
        assert!(!block.contains("time"));
    }

    #[test]
    fn presets_configure_blending() {
        let mut gpu = RecordingBackend::new();
        let techniques = EffectTechniques::new(&mut gpu, Viewport::full(800, 600)).unwrap();

        assert_eq!(
            techniques.explosion.blend(),
            Some((BlendFactor::SrcAlpha, BlendFactor::One))
        );
        assert_eq!(
            techniques.smoke.blend(),
            Some((BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha))
        );
        assert_eq!(
            techniques.shockwave.blend(),
            Some((BlendFactor::SrcAlpha, BlendFactor::One))
        );
        for technique in [&techniques.explosion, &techniques.smoke, &techniques.flat] {
            assert_eq!(technique.enables(), &[Capability::Blend]);
            assert_eq!(technique.disables(), &[Capability::DepthTest]);
        }
    }

    #[test]
    fn resize_reaches_every_technique() {
        let mut gpu = RecordingBackend::new();
        let mut techniques = EffectTechniques::new(&mut gpu, Viewport::full(800, 600)).unwrap();
        techniques.set_viewport(Viewport::full(1024, 768));
        assert_eq!(
            techniques.flat.current_viewport(),
            Some(Viewport::full(1024, 768))
        );
        assert_eq!(
            techniques.explosion.current_viewport(),
            Some(Viewport::full(1024, 768))
        );
    }
}
