/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Raymarching is fill-bound; default to the discrete adapter.
    pub power_preference: wgpu::PowerPreference,

    /// Prefer an sRGB swapchain. The kernel writes linear color and the
    /// composite pass relies on the target to encode it.
    pub prefer_srgb: bool,

    pub present_mode: wgpu::PresentMode,

    /// Falls back to a supported mode when unset or unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Core WebGPU covers the kernel (compute + rgba32float storage writes).
    pub required_features: wgpu::Features,

    /// Limits requested from the device. Record and output allocations are
    /// validated against these before they reach wgpu.
    pub required_limits: wgpu::Limits,

    /// Request whatever the adapter supports instead of `required_limits`.
    ///
    /// Raises the storage-buffer ceiling for large scenes.
    pub adapter_limits: bool,

    /// Hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            adapter_limits: false,
            desired_maximum_frame_latency: 2,
        }
    }
}
