use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::window::Window;

use super::surface::{self, SurfaceErrorAction};
use super::{GpuFrame, GpuInit};
use crate::render::Extent;

/// wgpu objects for one window: device, queue and the configured swapchain.
///
/// The window must outlive `Gpu`; the surface borrows it for `'w`.
pub struct Gpu<'w> {
    _instance: wgpu::Instance,
    surface: wgpu::Surface<'w>,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    /// Physical pixels; zero while minimized.
    size: Extent,
}

impl<'w> Gpu<'w> {
    /// Binds a surface to `window` and opens a compute-capable device for it.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let inner = window.inner_size();
        let size = Extent::new(inner.width, inner.height);
        anyhow::ensure!(!size.is_empty(), "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter can present to this window")?;
        ensure_compute(&adapter.get_downlevel_capabilities())?;

        let (device, queue) = open_device(&adapter, &init).await?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps.formats, init.prefer_srgb)
            .context("surface reports no formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: init.present_mode,
            alpha_mode: surface::choose_alpha_mode(&caps.alpha_modes, init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        surface.configure(&device, &config);

        let info = adapter.get_info();
        let limits = device.limits();
        log::info!(
            "gpu ready: {} ({:?}), surface {format:?} {}x{}, storage binding <= {} bytes, texture <= {}",
            info.name,
            info.backend,
            size.width,
            size.height,
            limits.max_storage_buffer_binding_size,
            limits.max_texture_dimension_2d,
        );

        Ok(Self {
            _instance: instance,
            surface,
            adapter,
            device,
            queue,
            config,
            size,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn size(&self) -> Extent {
        self.size
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Tracks the new size; the surface is reconfigured only for non-zero sizes.
    pub fn resize(&mut self, new_size: Extent) {
        surface::apply_resize(
            &self.surface,
            &self.device,
            &mut self.config,
            &mut self.size,
            new_size,
        );
    }

    /// Acquires the next swapchain image and an encoder for it.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("raymarch frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the frame's commands and presents the image.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame {
            surface_texture,
            view,
            encoder,
        } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }

    /// Drops a frame unsubmitted; the previous image stays on screen.
    pub fn discard(&self, frame: GpuFrame) {
        drop(frame);
    }

    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        surface::map_surface_error(&self.surface, &self.device, &self.config, self.size, err)
    }
}

async fn open_device(
    adapter: &wgpu::Adapter,
    init: &GpuInit,
) -> Result<(wgpu::Device, wgpu::Queue)> {
    let required_limits = if init.adapter_limits {
        adapter.limits()
    } else {
        init.required_limits.clone()
    };

    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("raymarch-engine device"),
            required_features: init.required_features,
            required_limits,
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await
        .context("failed to create wgpu device/queue")
}

/// The kernel is a compute shader; downlevel adapters (WebGL2 class) can't run it.
fn ensure_compute(caps: &wgpu::DownlevelCapabilities) -> Result<()> {
    anyhow::ensure!(
        caps.flags.contains(wgpu::DownlevelFlags::COMPUTE_SHADERS),
        "adapter does not support compute shaders"
    );
    Ok(())
}
