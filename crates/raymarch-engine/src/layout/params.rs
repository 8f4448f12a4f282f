use std::mem::size_of;

use bytemuck::{Pod, Zeroable};

use crate::scene::{CameraFrame, RenderConfig};

/// Uniform block consumed by the kernel (160 bytes).
///
///  offset   0  camera_to_world     mat4x4<f32>  (column-major)
///  offset  64  inverse_projection  mat4x4<f32>
///  offset 128  shape_count         u32
///  offset 132  light_count         u32
///  offset 136  resolution          f32
///  offset 140  fog_rate            f32
///  offset 144  ambient_occlusion   u32
///  offset 148  fog                 u32
///  offset 152  glow                u32
///  offset 156  _pad                u32
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct KernelParams {
    pub camera_to_world: [[f32; 4]; 4],
    pub inverse_projection: [[f32; 4]; 4],
    pub shape_count: u32,
    pub light_count: u32,
    pub resolution: f32,
    pub fog_rate: f32,
    pub ambient_occlusion: u32,
    pub fog: u32,
    pub glow: u32,
    pub _pad: u32,
}

pub const KERNEL_PARAMS_SIZE: u64 = 160;
const _: () = assert!(size_of::<KernelParams>() as u64 == KERNEL_PARAMS_SIZE);

impl KernelParams {
    pub const KERNEL_NAME: &'static str = "KernelParams";

    pub fn set_camera(&mut self, camera: &CameraFrame) {
        self.camera_to_world = camera.camera_to_world.to_cols_array_2d();
        self.inverse_projection = camera.inverse_projection.to_cols_array_2d();
    }

    pub fn set_feature_flags(&mut self, config: RenderConfig) {
        let config = config.sanitized();
        self.ambient_occlusion = config.ambient_occlusion as u32;
        self.fog = config.fog as u32;
        self.fog_rate = config.fog_rate;
        self.glow = config.glow as u32;
    }
}

impl Default for KernelParams {
    /// Identity camera, nothing to draw, all features off.
    fn default() -> Self {
        let mut params = Self::zeroed();
        params.set_camera(&CameraFrame::IDENTITY);
        params
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};

    use super::*;

    #[test]
    fn matrices_are_column_major() {
        let t = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let mut p = KernelParams::default();
        p.set_camera(&CameraFrame { camera_to_world: t, inverse_projection: Mat4::IDENTITY });
        // Translation lives in the fourth column.
        assert_eq!(p.camera_to_world[3], [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn flags_are_encoded_as_u32() {
        let mut p = KernelParams::default();
        p.set_feature_flags(RenderConfig {
            ambient_occlusion: true,
            fog: false,
            fog_rate: 2.0,
            glow: true,
        });
        assert_eq!((p.ambient_occlusion, p.fog, p.glow), (1, 0, 1));
        assert_eq!(p.fog_rate, 1.0);
    }

    #[test]
    fn default_draws_nothing() {
        let p = KernelParams::default();
        assert_eq!(p.shape_count, 0);
        assert_eq!(p.light_count, 0);
        assert_eq!(p.camera_to_world, Mat4::IDENTITY.to_cols_array_2d());
    }
}
