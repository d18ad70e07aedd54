//! Techniques: a shader program plus the fixed-function state it draws with
//!
//! `execute` runs the protocol bind → commands → unbind. Unbinding resets the
//! state functions the technique configured (blend factors, cull face, depth
//! mask, depth function) to the engine defaults in [`crate::state::defaults`].
//! Capability toggles set by `enable`/`disable` are **not** reverted, so a
//! technique that relies on a capability being off must disable it itself.

use crate::backend::GpuBackend;
use crate::command::Command;
use crate::shader::ShaderProgram;
use crate::state::{defaults, BlendFactor, Capability, CullFace, DepthFunc, Viewport};
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct Technique {
    label: String,
    shader: Rc<ShaderProgram>,
    enables: Vec<Capability>,
    disables: Vec<Capability>,
    blend: Option<(BlendFactor, BlendFactor)>,
    cull_face: Option<CullFace>,
    depth_mask: Option<bool>,
    depth_func: Option<DepthFunc>,
    viewport: Option<Viewport>,
}

impl Technique {
    pub fn new(label: impl Into<String>, shader: Rc<ShaderProgram>) -> Self {
        Self {
            label: label.into(),
            shader,
            enables: Vec::new(),
            disables: Vec::new(),
            blend: None,
            cull_face: None,
            depth_mask: None,
            depth_func: None,
            viewport: None,
        }
    }

    pub fn enable(mut self, cap: Capability) -> Self {
        self.enables.push(cap);
        self
    }

    pub fn disable(mut self, cap: Capability) -> Self {
        self.disables.push(cap);
        self
    }

    pub fn blend_func(mut self, src: BlendFactor, dst: BlendFactor) -> Self {
        self.blend = Some((src, dst));
        self
    }

    pub fn cull_face(mut self, mode: CullFace) -> Self {
        self.cull_face = Some(mode);
        self
    }

    pub fn depth_mask(mut self, flag: bool) -> Self {
        self.depth_mask = Some(flag);
        self
    }

    pub fn depth_func(mut self, func: DepthFunc) -> Self {
        self.depth_func = Some(func);
        self
    }

    pub fn viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    /// Replace the viewport after a resize
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn shader(&self) -> &Rc<ShaderProgram> {
        &self.shader
    }

    pub fn enables(&self) -> &[Capability] {
        &self.enables
    }

    pub fn disables(&self) -> &[Capability] {
        &self.disables
    }

    pub fn blend(&self) -> Option<(BlendFactor, BlendFactor)> {
        self.blend
    }

    pub fn current_viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Bind, execute every command in order, then unbind.
    ///
    /// An empty batch still binds and unbinds.
    pub fn execute<B: GpuBackend>(&self, gpu: &mut B, commands: &[Command<'_, B>]) {
        self.bind(gpu);
        for command in commands {
            command.execute(gpu);
        }
        self.unbind(gpu);
    }

    fn bind<B: GpuBackend>(&self, gpu: &mut B) {
        gpu.use_program(&self.shader);
        for &cap in &self.enables {
            gpu.enable(cap);
        }
        for &cap in &self.disables {
            gpu.disable(cap);
        }
        if let Some((src, dst)) = self.blend {
            gpu.blend_func(src, dst);
        }
        if let Some(mode) = self.cull_face {
            gpu.cull_face(mode);
        }
        if let Some(flag) = self.depth_mask {
            gpu.depth_mask(flag);
        }
        if let Some(func) = self.depth_func {
            gpu.depth_func(func);
        }
        if let Some(viewport) = self.viewport {
            gpu.viewport(viewport);
        }
    }

    fn unbind<B: GpuBackend>(&self, gpu: &mut B) {
        if self.blend.is_some() {
            gpu.blend_func(defaults::BLEND_SRC, defaults::BLEND_DST);
        }
        if self.cull_face.is_some() {
            gpu.cull_face(defaults::CULL_FACE);
        }
        if self.depth_mask.is_some() {
            gpu.depth_mask(defaults::DEPTH_MASK);
        }
        if self.depth_func.is_some() {
            gpu.depth_func(defaults::DEPTH_FUNC);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{DrawDescriptor, IndexType, Topology};
    use crate::primitives::quad;
    use crate::recording::{GpuCall, RecordingBackend};
    use crate::renderable::Renderable;
    use crate::shader::{ShaderSource, UniformValue};
    use glam::Mat4;

    const SHADER: &str = r#"
struct Uniforms {
    projection: mat4x4<f32>,
    time: f32,
}

@group(0) @binding(0) var<uniform> u: Uniforms;

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return u.projection * vec4<f32>(position, 1.0 + u.time * 0.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0);
}
"#;

    fn setup() -> (RecordingBackend, Rc<ShaderProgram>, Renderable<RecordingBackend>) {
        let mut gpu = RecordingBackend::new();
        let program = gpu
            .create_program(&ShaderSource::new("test", SHADER))
            .unwrap();
        let geometry = quad(1.0, true, false);
        let quad = Renderable::upload(
            &mut gpu,
            "quad",
            &geometry.vertex_data(),
            &geometry.index_data(),
            geometry.interleaved_layout(),
            DrawDescriptor::instanced(Topology::Triangles, 6, IndexType::U16, 3),
        )
        .unwrap();
        gpu.clear_calls();
        (gpu, Rc::new(program), quad)
    }

    #[test]
    fn bind_order_then_commands_then_unbind() {
        let (mut gpu, program, quad) = setup();
        let technique = Technique::new("blended", program.clone())
            .enable(Capability::Blend)
            .disable(Capability::DepthTest)
            .blend_func(BlendFactor::SrcAlpha, BlendFactor::One)
            .viewport(Viewport::full(800, 600));

        let commands = [Command::new(&quad).uniform("time", 0.5f32)];
        technique.execute(&mut gpu, &commands);

        assert_eq!(
            gpu.calls(),
            vec![
                GpuCall::UseProgram(program.id()),
                GpuCall::Enable(Capability::Blend),
                GpuCall::Disable(Capability::DepthTest),
                GpuCall::BlendFunc(BlendFactor::SrcAlpha, BlendFactor::One),
                GpuCall::Viewport(Viewport::full(800, 600)),
                GpuCall::SetUniform {
                    name: "time".into(),
                    value: UniformValue::F32(0.5)
                },
                GpuCall::DrawElements {
                    program: Some(program.id()),
                    index_count: 6,
                    instance_count: 3,
                    instanced: true,
                },
                GpuCall::BlendFunc(defaults::BLEND_SRC, defaults::BLEND_DST),
            ]
        );
    }

    #[test]
    fn unbind_restores_only_configured_state() {
        let (mut gpu, program, _quad) = setup();
        let technique = Technique::new("depth", program)
            .enable(Capability::CullFace)
            .cull_face(CullFace::Front)
            .depth_mask(false)
            .depth_func(DepthFunc::Always);

        technique.execute(&mut gpu, &[]);

        let state = gpu.state();
        assert_eq!(state.cull_face, defaults::CULL_FACE);
        assert_eq!(state.depth_mask, defaults::DEPTH_MASK);
        assert_eq!(state.depth_func, defaults::DEPTH_FUNC);
        // toggles persist past unbind
        assert!(state.cull_enabled);
        assert!(!gpu.calls().iter().any(|c| matches!(c, GpuCall::BlendFunc(..))));
    }

    #[test]
    fn empty_batch_still_binds_and_unbinds() {
        let (mut gpu, program, _quad) = setup();
        let technique = Technique::new("empty", program.clone()).blend_func(
            BlendFactor::SrcAlpha,
            BlendFactor::OneMinusSrcAlpha,
        );
        technique.execute(&mut gpu, &[]);
        assert_eq!(
            gpu.calls(),
            vec![
                GpuCall::UseProgram(program.id()),
                GpuCall::BlendFunc(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha),
                GpuCall::BlendFunc(defaults::BLEND_SRC, defaults::BLEND_DST),
            ]
        );
    }

    #[test]
    fn repeated_execution_is_identical() {
        let (mut gpu, program, quad) = setup();
        let technique = Technique::new("repeat", program)
            .enable(Capability::Blend)
            .blend_func(BlendFactor::SrcAlpha, BlendFactor::One);
        let commands = [
            Command::new(&quad)
                .uniform("projection", Mat4::orthographic_rh(0.0, 800.0, 0.0, 600.0, -1.0, 1.0))
                .uniform("time", 1.5f32),
            Command::new(&quad).uniform("time", 2.0f32),
        ];

        technique.execute(&mut gpu, &commands);
        let first = gpu.calls();
        gpu.clear_calls();
        technique.execute(&mut gpu, &commands);
        assert_eq!(first, gpu.calls());
    }

    #[test]
    fn set_viewport_applies_on_next_execute() {
        let (mut gpu, program, _quad) = setup();
        let mut technique = Technique::new("resize", program).viewport(Viewport::full(100, 100));
        technique.set_viewport(Viewport::full(640, 480));
        technique.execute(&mut gpu, &[]);
        assert_eq!(gpu.state().viewport, Some(Viewport::full(640, 480)));
    }
}
