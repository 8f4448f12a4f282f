/// One acquired swapchain image plus the encoder recording into it.
///
/// Holding it blocks acquisition of the next image. Hand it back through
/// [`Gpu::submit`](super::Gpu::submit) or [`Gpu::discard`](super::Gpu::discard).
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    /// Composite target for the raymarch output.
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
