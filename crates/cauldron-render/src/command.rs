//! A single draw request: named uniforms plus the renderable they apply to

use crate::backend::GpuBackend;
use crate::renderable::Renderable;
use crate::shader::UniformValue;
use std::borrow::Cow;

/// Uniform values and a borrowed renderable, executed by a `Technique`.
///
/// Uniforms are pushed in insertion order; setting a name twice overwrites
/// the earlier value in place.
pub struct Command<'a, B: GpuBackend> {
    uniforms: Vec<(Cow<'static, str>, UniformValue)>,
    renderable: &'a Renderable<B>,
}

impl<'a, B: GpuBackend> Command<'a, B> {
    pub fn new(renderable: &'a Renderable<B>) -> Self {
        Self {
            uniforms: Vec::new(),
            renderable,
        }
    }

    /// Builder form of `set_uniform`
    pub fn uniform(
        mut self,
        name: impl Into<Cow<'static, str>>,
        value: impl Into<UniformValue>,
    ) -> Self {
        self.set_uniform(name, value);
        self
    }

    pub fn set_uniform(&mut self, name: impl Into<Cow<'static, str>>, value: impl Into<UniformValue>) {
        let name = name.into();
        let value = value.into();
        match self.uniforms.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.uniforms.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.uniforms
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Uniforms in the order they will be pushed
    pub fn uniforms(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.uniforms.iter().map(|(name, value)| (name.as_ref(), value))
    }

    pub fn renderable(&self) -> &'a Renderable<B> {
        self.renderable
    }

    /// Push every uniform, then draw
    pub fn execute(&self, gpu: &mut B) {
        for (name, value) in &self.uniforms {
            gpu.set_uniform(name, value);
        }
        self.renderable.draw(gpu);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{DrawDescriptor, IndexType, Topology};
    use crate::primitives::quad;
    use crate::recording::{GpuCall, RecordingBackend};
    use glam::{Mat4, Vec2};

    fn renderable(gpu: &mut RecordingBackend) -> Renderable<RecordingBackend> {
        let geometry = quad(1.0, true, false);
        Renderable::upload(
            gpu,
            "quad",
            &geometry.vertex_data(),
            &geometry.index_data(),
            geometry.interleaved_layout(),
            DrawDescriptor::elements(Topology::Triangles, 6, IndexType::U16),
        )
        .unwrap()
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut gpu = RecordingBackend::new();
        let quad = renderable(&mut gpu);
        let command = Command::new(&quad)
            .uniform("projection", Mat4::IDENTITY)
            .uniform("time", 0.5f32)
            .uniform("projection", Mat4::from_scale(glam::Vec3::splat(2.0)));

        let names: Vec<&str> = command.uniforms().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["projection", "time"]);
        assert_eq!(
            command.get("projection"),
            Some(&UniformValue::Mat4(Mat4::from_scale(glam::Vec3::splat(2.0))))
        );
        assert!(command.get("missing").is_none());
    }

    #[test]
    fn execute_pushes_uniforms_before_draw() {
        let mut gpu = RecordingBackend::new();
        let quad = renderable(&mut gpu);
        gpu.clear_calls();

        Command::new(&quad)
            .uniform("time", 1.25f32)
            .uniform(String::from("gravity"), Vec2::new(0.0, -200.0))
            .execute(&mut gpu);

        let calls = gpu.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls[0],
            GpuCall::SetUniform {
                name: "time".into(),
                value: UniformValue::F32(1.25)
            }
        );
        assert!(matches!(&calls[1], GpuCall::SetUniform { name, .. } if name == "gravity"));
        assert!(matches!(calls[2], GpuCall::DrawElements { .. }));
    }
}
