use std::f32::consts::PI;

use glam::{EulerRot, Quat, Vec3};

/// Degrees-to-radians factor applied to every rotation before it reaches a record.
pub const DEG_TO_RAD: f32 = PI / 180.0;

/// World transform of a scene entity.
///
/// Rotation is authored in degrees as Euler angles. They are applied roll (Z)
/// first, then pitch (X), then yaw (Y).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub scale: Vec3,
    pub rotation_degrees: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        scale: Vec3::ONE,
        rotation_degrees: Vec3::ZERO,
    };

    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    #[inline]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    #[inline]
    pub fn with_uniform_scale(self, scale: f32) -> Self {
        self.with_scale(Vec3::splat(scale))
    }

    #[inline]
    pub fn with_rotation_degrees(mut self, rotation_degrees: Vec3) -> Self {
        self.rotation_degrees = rotation_degrees;
        self
    }

    /// Euler rotation converted to radians, component-wise.
    #[inline]
    pub fn rotation_radians(&self) -> Vec3 {
        self.rotation_degrees * DEG_TO_RAD
    }

    pub fn rotation(&self) -> Quat {
        let r = self.rotation_radians();
        Quat::from_euler(EulerRot::YXZ, r.y, r.x, r.z)
    }

    /// Local +Y in world space.
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation() * Vec3::Y
    }

    /// Local -Z in world space (the direction lights and cameras face).
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
