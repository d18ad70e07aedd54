//! Orthographic 2D camera

use cauldron_core::Transform;
use glam::{Mat4, Vec2};

/// Pixel-space orthographic camera: (0, 0) is the bottom-left corner of the window
#[derive(Debug, Clone, PartialEq)]
pub struct OrthoCamera {
    pub transform: Transform,
    width: f32,
    height: f32,
}

impl OrthoCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            transform: Transform::IDENTITY,
            width: width.max(1) as f32,
            height: height.max(1) as f32,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1) as f32;
        self.height = height.max(1) as f32;
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::orthographic_rh(0.0, self.width, 0.0, self.height, -1.0, 1.0)
    }

    pub fn view(&self) -> Mat4 {
        self.transform.view_matrix()
    }

    pub fn frame_uniforms(&self) -> FrameUniforms {
        FrameUniforms {
            projection: self.projection(),
            view: self.view(),
        }
    }
}

/// Per-frame camera matrices shared by every command of a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub projection: Mat4,
    pub view: Mat4,
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
        }
    }
}
