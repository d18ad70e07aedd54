//! 2D transform used for effect placement and the camera

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// A 2D transform: rotation about +Z, translation in the XY plane, and scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Rotation in radians about +Z
    pub rotation: f32,
    pub translation: Vec2,
    pub scale: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        rotation: 0.0,
        translation: Vec2::ZERO,
        scale: Vec2::ONE,
    };

    pub fn from_translation(translation: Vec2) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Rotate relative to the current rotation
    pub fn rotate(&mut self, angle: f32) {
        self.rotation += angle;
    }

    /// Translate relative to the current translation
    pub fn translate(&mut self, translation: Vec2) {
        self.translation += translation;
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = Vec2::splat(scale);
    }

    pub fn translation_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation.extend(0.0))
    }

    pub fn rotation_matrix(&self) -> Mat4 {
        Mat4::from_rotation_z(self.rotation)
    }

    pub fn scale_matrix(&self) -> Mat4 {
        Mat4::from_scale(self.scale.extend(1.0))
    }

    /// Model matrix: translate * rotate * scale
    pub fn matrix(&self) -> Mat4 {
        self.translation_matrix() * self.rotation_matrix() * self.scale_matrix()
    }

    /// View matrix for a camera at this transform looking down -Z with +Y up
    pub fn view_matrix(&self) -> Mat4 {
        let eye = self.translation.extend(0.0);
        let center = eye - Vec3::Z;
        Mat4::look_at_rh(eye, center, Vec3::Y)
    }
}
