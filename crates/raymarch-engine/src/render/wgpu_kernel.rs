use std::collections::HashMap;
use std::num::NonZeroU64;

use wgpu::util::DeviceExt;

use crate::error::{RenderError, RenderResult};
use crate::layout::{KernelParams, SchemaVersion, verify_kernel_layout};

use super::RAYMARCH_KERNEL;
use super::backend::{
    BufferDesc, BufferHandle, BufferSlots, Extent, KernelBackend, KernelBindings, KernelSlot,
    SurfaceHandle,
};
use super::ctx::RenderCtx;
use super::dispatch::WorkGroups;

const BLIT_SHADER: &str = include_str!("shaders/blit.wgsl");

const OUTPUT_RESOURCE: &str = "output surface";

/// Output image format written by the kernel.
pub const OUTPUT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

/// Persistent wgpu state for the raymarch kernel.
///
/// Owns the compute pipeline, the uniform buffer and every buffer/surface a
/// handle points at. Per-frame work goes through [`WgpuKernel::frame`].
pub struct WgpuKernel {
    limits: wgpu::Limits,

    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    params_ubo: wgpu::Buffer,

    // Bound when a collection is empty; the kernel never reads them.
    empty_shapes: wgpu::Buffer,
    empty_lights: wgpu::Buffer,

    buffers: HashMap<BufferHandle, wgpu::Buffer>,
    surfaces: HashMap<SurfaceHandle, OutputTexture>,
    next_id: u64,

    blit: Option<BlitPipeline>,
}

struct OutputTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

struct BlitPipeline {
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl WgpuKernel {
    /// Verifies the shipped kernel against `schema` and builds its pipeline.
    pub fn new(device: &wgpu::Device, schema: SchemaVersion) -> RenderResult<Self> {
        let layout = verify_kernel_layout(RAYMARCH_KERNEL, schema)?;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("raymarch kernel shader"),
            source: wgpu::ShaderSource::Wgsl(RAYMARCH_KERNEL.into()),
        });

        let storage = |binding: u32, stride: u64| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: true },
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(stride),
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("raymarch kernel bgl"),
            entries: &[
                storage(KernelSlot::Shapes.binding(), layout.shape_stride),
                storage(KernelSlot::Lights.binding(), layout.light_stride),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(layout.params_size),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 4,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: OUTPUT_FORMAT,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("raymarch kernel pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("raymarch kernel pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        });

        let params_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("raymarch params ubo"),
            size: layout.params_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let placeholder = |label, size| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage: wgpu::BufferUsages::STORAGE,
                mapped_at_creation: false,
            })
        };
        let empty_shapes = placeholder("raymarch empty shapes", layout.shape_stride);
        let empty_lights = placeholder("raymarch empty lights", layout.light_stride);

        log::info!(
            "raymarch kernel ready (schema {:?}, shape stride {}, light stride {})",
            layout.version,
            layout.shape_stride,
            layout.light_stride
        );

        Ok(Self {
            limits: device.limits(),
            pipeline,
            bind_group_layout,
            params_ubo,
            empty_shapes,
            empty_lights,
            buffers: HashMap::new(),
            surfaces: HashMap::new(),
            next_id: 0,
            blit: None,
        })
    }

    /// Live record buffers; zero between frames.
    #[inline]
    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    /// Binds this kernel to one frame's encoder.
    pub fn frame<'a>(
        &'a mut self,
        ctx: &RenderCtx<'a>,
        encoder: &'a mut wgpu::CommandEncoder,
    ) -> WgpuFrame<'a> {
        WgpuFrame {
            kernel: self,
            device: ctx.device,
            queue: ctx.queue,
            target_format: ctx.surface_format,
            encoder,
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Buffer bound to `slot`, or the slot's placeholder when nothing is bound.
    fn slot_buffer(&self, slots: &BufferSlots, slot: KernelSlot) -> RenderResult<&wgpu::Buffer> {
        match slots.get(slot) {
            Some(h) => self
                .buffers
                .get(&h)
                .ok_or(RenderError::UnknownHandle("buffer")),
            None => Ok(match slot {
                KernelSlot::Shapes => &self.empty_shapes,
                KernelSlot::Lights => &self.empty_lights,
            }),
        }
    }

    fn ensure_blit(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat) {
        if self.blit.as_ref().is_some_and(|b| b.format == format) {
            return;
        }

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("raymarch blit shader"),
            source: wgpu::ShaderSource::Wgsl(BLIT_SHADER.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("raymarch blit bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: false },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("raymarch blit pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("raymarch blit pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("blit pipeline built for {format:?}");

        self.blit = Some(BlitPipeline {
            format,
            pipeline,
            bind_group_layout,
        });
    }
}

/// One frame's view of a [`WgpuKernel`]: records into the frame's encoder.
pub struct WgpuFrame<'a> {
    kernel: &'a mut WgpuKernel,
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    target_format: wgpu::TextureFormat,
    encoder: &'a mut wgpu::CommandEncoder,
}

impl KernelBackend for WgpuFrame<'_> {
    type Image = wgpu::TextureView;

    fn create_buffer(&mut self, desc: &BufferDesc<'_>) -> RenderResult<BufferHandle> {
        let resource = desc.slot.name();
        let size = desc.stride * u64::from(desc.count);
        if size != desc.contents.len() as u64 {
            return Err(RenderError::allocation(
                resource,
                format!("{} bytes supplied for {size}-byte buffer", desc.contents.len()),
            ));
        }

        check_buffer_size(&self.kernel.limits, resource, size)?;

        let label = match desc.slot {
            KernelSlot::Shapes => "raymarch shapes buffer",
            KernelSlot::Lights => "raymarch lights buffer",
        };
        let buffer = out_of_memory_scope(self.device, resource, || {
            self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: desc.contents,
                usage: wgpu::BufferUsages::STORAGE,
            })
        })?;

        let handle = BufferHandle(self.kernel.next_id());
        self.kernel.buffers.insert(handle, buffer);
        Ok(handle)
    }

    fn destroy_buffer(&mut self, handle: BufferHandle) {
        // Dropping only releases our reference; recorded commands keep theirs.
        self.kernel.buffers.remove(&handle);
    }

    fn create_surface(&mut self, extent: Extent) -> RenderResult<SurfaceHandle> {
        check_surface_extent(&self.kernel.limits, extent)?;

        let texture = out_of_memory_scope(self.device, OUTPUT_RESOURCE, || {
            self.device.create_texture(&wgpu::TextureDescriptor {
                label: Some("raymarch output"),
                size: wgpu::Extent3d {
                    width: extent.width,
                    height: extent.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: OUTPUT_FORMAT,
                usage: wgpu::TextureUsages::STORAGE_BINDING
                    | wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_SRC,
                view_formats: &[],
            })
        })?;
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let handle = SurfaceHandle(self.kernel.next_id());
        self.kernel.surfaces.insert(
            handle,
            OutputTexture {
                _texture: texture,
                view,
            },
        );
        Ok(handle)
    }

    fn destroy_surface(&mut self, handle: SurfaceHandle) {
        self.kernel.surfaces.remove(&handle);
    }

    fn dispatch(
        &mut self,
        bindings: &KernelBindings<'_, wgpu::TextureView>,
        params: &KernelParams,
        groups: WorkGroups,
    ) -> RenderResult<()> {
        let kernel = &*self.kernel;

        let output = &kernel
            .surfaces
            .get(&bindings.output)
            .ok_or(RenderError::UnknownHandle("surface"))?
            .view;
        let shapes = kernel.slot_buffer(&bindings.buffers, KernelSlot::Shapes)?;
        let lights = kernel.slot_buffer(&bindings.buffers, KernelSlot::Lights)?;

        // One dispatch per frame, so the write lands before it runs.
        self.queue
            .write_buffer(&kernel.params_ubo, 0, bytemuck::bytes_of(params));

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("raymarch kernel bind group"),
            layout: &kernel.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: KernelSlot::Shapes.binding(),
                    resource: shapes.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: KernelSlot::Lights.binding(),
                    resource: lights.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: kernel.params_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(bindings.source),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::TextureView(output),
                },
            ],
        });

        let mut cpass = self.encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("raymarch kernel pass"),
            timestamp_writes: None,
        });
        cpass.set_pipeline(&kernel.pipeline);
        cpass.set_bind_group(0, &bind_group, &[]);
        cpass.dispatch_workgroups(groups.x, groups.y, groups.z);

        Ok(())
    }

    fn composite(
        &mut self,
        surface: SurfaceHandle,
        destination: &wgpu::TextureView,
    ) -> RenderResult<()> {
        self.kernel.ensure_blit(self.device, self.target_format);

        let kernel = &*self.kernel;
        let Some(output) = kernel.surfaces.get(&surface) else {
            return Err(RenderError::UnknownHandle("surface"));
        };
        let Some(blit) = kernel.blit.as_ref() else {
            return Err(RenderError::allocation("blit pipeline", "not built"));
        };

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("raymarch blit bind group"),
            layout: &blit.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&output.view),
            }],
        });

        let mut rpass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("raymarch blit pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: destination,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        rpass.set_pipeline(&blit.pipeline);
        rpass.set_bind_group(0, &bind_group, &[]);
        rpass.draw(0..3, 0..1);

        Ok(())
    }
}

/// Largest record buffer the kernel can bind as one storage binding.
fn max_record_buffer(limits: &wgpu::Limits) -> u64 {
    limits
        .max_buffer_size
        .min(u64::from(limits.max_storage_buffer_binding_size))
}

fn check_buffer_size(limits: &wgpu::Limits, resource: &'static str, size: u64) -> RenderResult<()> {
    let max = max_record_buffer(limits);
    if size > max {
        return Err(RenderError::allocation(
            resource,
            format!("{size} bytes exceeds device limit of {max}"),
        ));
    }
    Ok(())
}

fn check_surface_extent(limits: &wgpu::Limits, extent: Extent) -> RenderResult<()> {
    let max = limits.max_texture_dimension_2d;
    if extent.is_empty() || extent.width > max || extent.height > max {
        return Err(RenderError::allocation(
            OUTPUT_RESOURCE,
            format!("{}x{} outside 1..={max} per side", extent.width, extent.height),
        ));
    }
    Ok(())
}

/// Runs `create` inside an out-of-memory error scope.
///
/// Without the scope wgpu hands the failure to the uncaptured-error handler,
/// which panics by default.
fn out_of_memory_scope<T>(
    device: &wgpu::Device,
    resource: &'static str,
    create: impl FnOnce() -> T,
) -> RenderResult<T> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    let created = create();
    match pollster::block_on(scope.pop()) {
        Some(err) => {
            log::warn!("{resource} allocation failed: {err}");
            Err(RenderError::allocation(resource, err.to_string()))
        }
        None => Ok(created),
    }
}
