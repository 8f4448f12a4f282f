use glam::{Mat4, Vec3};

use super::DEG_TO_RAD;

/// Active viewpoint of the scene.
///
/// Right-handed, looking down -Z in view space, depth mapped to `0..1`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            ..Self::default()
        }
    }

    pub fn view(&self) -> Mat4 {
        let dir = self.target - self.position;
        // look_at on a zero-length or up-parallel direction yields NaNs.
        let up = if dir.length_squared() <= f32::EPSILON
            || dir.normalize().cross(self.up).length_squared() <= f32::EPSILON
        {
            Vec3::Z
        } else {
            self.up
        };
        let target = if dir.length_squared() <= f32::EPSILON {
            self.position + Vec3::NEG_Z
        } else {
            self.target
        };
        Mat4::look_at_rh(self.position, target, up)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        Mat4::perspective_rh(self.fov_y_degrees * DEG_TO_RAD, aspect, self.near, self.far)
    }

    /// Matrices the kernel uses to rebuild a world-space ray per pixel.
    pub fn frame(&self, aspect: f32) -> CameraFrame {
        CameraFrame {
            camera_to_world: self.view().inverse(),
            inverse_projection: self.projection(aspect).inverse(),
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Per-frame camera uniforms.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraFrame {
    pub camera_to_world: Mat4,
    pub inverse_projection: Mat4,
}

impl CameraFrame {
    pub const IDENTITY: Self = Self {
        camera_to_world: Mat4::IDENTITY,
        inverse_projection: Mat4::IDENTITY,
    };
}
