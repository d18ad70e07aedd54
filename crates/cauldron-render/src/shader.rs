//! Shader sources, compiled program handles, and uniform values
//!
//! Programs are WGSL modules with `vs_main`/`fs_main` entry points. Their
//! uniforms live in a single struct bound at `@group(0) @binding(0)`; the
//! struct layout is reflected with naga so uniforms can be set by name.

use crate::error::RenderError;
use crate::uniform_block::UniformBlockDescriptor;
use cauldron_core::Color;
use glam::{Mat4, Vec2, Vec3, Vec4};
use std::path::Path;

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// WGSL source for one program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub label: String,
    pub wgsl: String,
}

impl ShaderSource {
    pub fn new(label: impl Into<String>, wgsl: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            wgsl: wgsl.into(),
        }
    }

    /// Read a WGSL file from disk, labelled by its file stem
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let wgsl = std::fs::read_to_string(path).map_err(|e| RenderError::ShaderNotFound {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { label, wgsl })
    }
}

/// Backend-assigned program identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId(pub u32);

/// A compiled program. Shared between techniques, never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderProgram {
    id: ProgramId,
    label: String,
    uniforms: UniformBlockDescriptor,
}

impl ShaderProgram {
    pub fn new(id: ProgramId, label: impl Into<String>, uniforms: UniformBlockDescriptor) -> Self {
        Self {
            id,
            label: label.into(),
            uniforms,
        }
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn uniforms(&self) -> &UniformBlockDescriptor {
        &self.uniforms
    }
}

/// Value of a single uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    F32(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

impl UniformValue {
    /// Raw bytes in the layout WGSL expects (matrices column-major)
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            UniformValue::F32(v) => bytemuck::bytes_of(v),
            UniformValue::Vec2(v) => bytemuck::bytes_of(v),
            UniformValue::Vec3(v) => bytemuck::bytes_of(v),
            UniformValue::Vec4(v) => bytemuck::bytes_of(v),
            UniformValue::Mat4(v) => bytemuck::bytes_of(v),
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::F32(v)
    }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self {
        UniformValue::Vec2(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        UniformValue::Vec4(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(v: Mat4) -> Self {
        UniformValue::Mat4(v)
    }
}

impl From<Color> for UniformValue {
    fn from(c: Color) -> Self {
        UniformValue::Vec4(c.to_vec4())
    }
}

/// Parse and validate `source`, then describe the uniform struct at group 0, binding 0.
///
/// A program without such a binding gets an empty descriptor.
pub fn reflect_uniform_block(source: &ShaderSource) -> Result<UniformBlockDescriptor, RenderError> {
    let module = naga::front::wgsl::parse_str(&source.wgsl).map_err(|e| {
        RenderError::ShaderCompilation {
            label: source.label.clone(),
            message: e.emit_to_string(&source.wgsl),
        }
    })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    )
    .validate(&module)
    .map_err(|e| RenderError::ShaderCompilation {
        label: source.label.clone(),
        message: format!("{:?}", e.as_inner()),
    })?;

    for entry in [VERTEX_ENTRY, FRAGMENT_ENTRY] {
        if !module.entry_points.iter().any(|ep| ep.name == entry) {
            return Err(RenderError::ShaderCompilation {
                label: source.label.clone(),
                message: format!("missing entry point `{entry}`"),
            });
        }
    }

    let uniform = module.global_variables.iter().find(|(_, var)| {
        var.space == naga::AddressSpace::Uniform
            && var
                .binding
                .as_ref()
                .is_some_and(|b| b.group == 0 && b.binding == 0)
    });

    let Some((_, var)) = uniform else {
        return Ok(UniformBlockDescriptor::default());
    };

    let naga::TypeInner::Struct { members, span } = &module.types[var.ty].inner else {
        return Err(RenderError::InvalidUniformBlock {
            label: source.label.clone(),
        });
    };

    let block_name = module.types[var.ty]
        .name
        .clone()
        .or_else(|| var.name.clone())
        .unwrap_or_default();
    let mut block = UniformBlockDescriptor::new(block_name, *span);
    for member in members {
        let Some(name) = &member.name else {
            continue;
        };
        let size = module.types[member.ty].inner.size(module.to_ctx());
        block.insert(name.clone(), member.offset, size);
    }

    Ok(block)
}
