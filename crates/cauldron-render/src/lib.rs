//! Cauldron Render - technique/command rendering on a small GPU state machine
//!
//! Drawing goes through the [`GpuBackend`] trait: a GL-flavoured interface
//! with capability toggles, state functions, one bound program receiving
//! named uniforms, and indexed draws. On top of it:
//! - [`Renderable`] owns vertex/index buffers plus their [`AttributeLayout`]
//! - [`Command`] pairs uniform values with a renderable
//! - [`Technique`] binds program and state, runs commands, then unbinds
//!
//! Two backends ship: [`RecordingBackend`] records calls for tests, and
//! [`WgpuBackend`] emulates the state machine on wgpu.

mod backend;
mod buffer;
mod camera;
mod command;
mod context;
mod error;
mod headless;
pub mod primitives;
mod recording;
mod renderable;
pub mod shader;
pub mod state;
mod technique;
mod uniform_block;
mod wgpu_backend;

pub use backend::{BufferUsage, DrawCall, GpuBackend};
pub use buffer::{
    AttributeFormat, AttributeLayout, AttributePointer, ComponentType, DrawDescriptor, IndexData,
    IndexType, StepRate, Topology, VertexData,
};
pub use camera::{FrameUniforms, OrthoCamera};
pub use command::Command;
pub use context::RenderContext;
pub use error::RenderError;
pub use headless::HeadlessContext;
pub use primitives::GeometryData;
pub use recording::{GpuCall, RecordedBuffer, RecordingBackend};
pub use renderable::Renderable;
pub use shader::{reflect_uniform_block, ProgramId, ShaderProgram, ShaderSource, UniformValue};
pub use state::{BlendFactor, Capability, CullFace, DepthFunc, PipelineState, Viewport};
pub use technique::Technique;
pub use uniform_block::{UniformBlockDescriptor, UniformMember};
pub use wgpu_backend::{WgpuBackend, WgpuBuffer, DEPTH_FORMAT};
