use super::backend::Extent;

/// Device access for one frame, handed to the draw callback.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    /// Format of the composite destination.
    pub surface_format: wgpu::TextureFormat,
    /// Display size in physical pixels.
    pub extent: Extent,
}

impl<'a> RenderCtx<'a> {
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        extent: Extent,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            extent,
        }
    }

    /// Encoder for work outside the frame loop (teardown, uploads).
    pub fn side_encoder(&self, label: &str) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) })
    }
}

/// The acquired display image and the encoder recording into it.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    /// Composite destination.
    pub view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, view: &'a wgpu::TextureView) -> Self {
        Self { encoder, view }
    }
}
