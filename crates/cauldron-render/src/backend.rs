//! The GPU interface the technique layer drives
//!
//! `GpuBackend` is a deliberately small, GL-flavoured state machine: global
//! capability toggles and state functions, one bound program that receives
//! named uniforms, and indexed draws. Buffers are owned values; dropping one
//! releases its storage.

use crate::buffer::{AttributeLayout, DrawDescriptor};
use crate::error::RenderError;
use crate::shader::{ShaderProgram, ShaderSource, UniformValue};
use crate::state::{BlendFactor, Capability, CullFace, DepthFunc, Viewport};

/// What a buffer is bound as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    Vertex,
    Index,
}

/// Everything a backend needs to issue one indexed draw
pub struct DrawCall<'a, Buf> {
    pub vertex_buffer: &'a Buf,
    pub index_buffer: &'a Buf,
    pub layout: &'a AttributeLayout,
    pub descriptor: &'a DrawDescriptor,
}

pub trait GpuBackend {
    /// Backend-owned buffer storage, released on drop
    type Buffer;

    /// Allocate `size` bytes of storage
    fn create_buffer(&mut self, usage: BufferUsage, size: usize, label: &str) -> Self::Buffer;

    /// Write `data` into `buffer` starting at byte `offset`
    fn write_buffer(&mut self, buffer: &Self::Buffer, offset: usize, data: &[u8]);

    /// Allocated size of `buffer` in bytes
    fn buffer_size(&self, buffer: &Self::Buffer) -> usize;

    /// Compile a program and resolve its uniform block
    fn create_program(&mut self, source: &ShaderSource) -> Result<ShaderProgram, RenderError>;

    /// Make `program` the target of subsequent uniforms and draws
    fn use_program(&mut self, program: &ShaderProgram);

    /// Set a named uniform on the bound program. Unknown names are ignored.
    fn set_uniform(&mut self, name: &str, value: &UniformValue);

    fn enable(&mut self, cap: Capability);
    fn disable(&mut self, cap: Capability);
    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor);
    fn cull_face(&mut self, mode: CullFace);
    fn depth_mask(&mut self, flag: bool);
    fn depth_func(&mut self, func: DepthFunc);
    fn viewport(&mut self, viewport: Viewport);

    /// Draw `descriptor.index_count` indices once
    fn draw_elements(&mut self, call: &DrawCall<'_, Self::Buffer>);

    /// Draw `descriptor.index_count` indices `descriptor.instance_count` times
    fn draw_elements_instanced(&mut self, call: &DrawCall<'_, Self::Buffer>);
}
