//! Render error types

use cauldron_core::CauldronError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to create surface: {0}")]
    SurfaceCreation(String),
    #[error("Failed to get adapter")]
    AdapterNotFound,
    #[error("Failed to create device: {0}")]
    DeviceCreation(String),
    #[error("Surface error: {0}")]
    SurfaceError(String),
    #[error("Failed to read render buffer: {0}")]
    BufferReadFailed(String),
    #[error("Shader source `{path}` could not be read: {reason}")]
    ShaderNotFound { path: PathBuf, reason: String },
    #[error("Shader `{label}` failed to compile:\n{message}")]
    ShaderCompilation { label: String, message: String },
    #[error("Shader `{label}` binds a non-struct uniform at group 0, binding 0")]
    InvalidUniformBlock { label: String },
    #[error("Invalid vertex layout for `{label}`: {reason}")]
    InvalidLayout { label: String, reason: String },
}

impl From<RenderError> for CauldronError {
    fn from(err: RenderError) -> Self {
        CauldronError::Render(err.to_string())
    }
}
