use crate::error::RenderResult;
use crate::layout::{KernelParams, LightRecord, SchemaVersion, ShapeRecord};
use crate::scene::{SceneProvider, collect_lights, collect_shapes};

use super::backend::{BufferSlots, Extent, KernelBackend, KernelBindings, KernelSlot};
use super::buffers::{FrameBuffers, RecordBuffer};
use super::dispatch::WorkGroups;
use super::output::{OutputSurface, OutputSurfaceManager};

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct OrchestratorConfig {
    /// Record layout the kernel was built against.
    pub schema: SchemaVersion,
}

/// What one frame did.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FrameReport {
    pub shape_count: u32,
    pub light_count: u32,
    pub groups: WorkGroups,
    pub extent: Extent,
    pub surface_recreated: bool,
}

/// Per-frame driver: collect, upload, dispatch, composite, release.
///
/// Holds the output surface across frames. Record buffers live only inside
/// one `render_frame` call.
#[derive(Debug, Default)]
pub struct FrameOrchestrator {
    config: OrchestratorConfig,
    surfaces: OutputSurfaceManager,
    frames: u64,
}

impl FrameOrchestrator {
    pub fn new(config: OrchestratorConfig) -> Self {
        Self {
            config,
            surfaces: OutputSurfaceManager::new(),
            frames: 0,
        }
    }

    #[inline]
    pub fn schema(&self) -> SchemaVersion {
        self.config.schema
    }

    /// Frames that reached dispatch.
    #[inline]
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn render_frame<B, S>(
        &mut self,
        backend: &mut B,
        scene: &S,
        source: &B::Image,
        destination: &B::Image,
        display_extent: Extent,
    ) -> RenderResult<FrameReport>
    where
        B: KernelBackend + ?Sized,
        S: SceneProvider,
    {
        let shapes = collect_shapes(scene);
        let lights = collect_lights(scene);

        let (surface, surface_recreated) = self.surfaces.ensure_surface(backend, display_extent)?;

        let mut buffers = FrameBuffers::default();
        let result = self.encode(
            backend,
            scene,
            &shapes,
            &lights,
            &mut buffers,
            surface,
            source,
            destination,
        );
        // Handles only; work already recorded keeps the memory alive.
        buffers.release(backend);

        let (params, groups) = result?;
        self.frames += 1;

        log::trace!(
            "frame {}: {} shapes, {} lights, {}x{}x{} groups",
            self.frames,
            params.shape_count,
            params.light_count,
            groups.x,
            groups.y,
            groups.z
        );

        Ok(FrameReport {
            shape_count: params.shape_count,
            light_count: params.light_count,
            groups,
            extent: surface.extent,
            surface_recreated,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn encode<B, S>(
        &self,
        backend: &mut B,
        scene: &S,
        shapes: &[ShapeRecord],
        lights: &[LightRecord],
        buffers: &mut FrameBuffers,
        surface: OutputSurface,
        source: &B::Image,
        destination: &B::Image,
    ) -> RenderResult<(KernelParams, WorkGroups)>
    where
        B: KernelBackend + ?Sized,
        S: SceneProvider,
    {
        let schema = self.config.schema;
        let mut params = KernelParams::default();
        let mut slots = BufferSlots::default();

        if !shapes.is_empty() {
            buffers.shapes = RecordBuffer::upload(backend, KernelSlot::Shapes, shapes, schema)?;
            buffers.shapes.bind(&mut slots, KernelSlot::Shapes);
            params.shape_count = buffers.shapes.count();

            params.set_camera(&scene.camera().frame(surface.extent.aspect()));

            buffers.lights = RecordBuffer::upload(backend, KernelSlot::Lights, lights, schema)?;
            buffers.lights.bind(&mut slots, KernelSlot::Lights);
            params.light_count = buffers.lights.count();

            if schema.supports_feature_flags() {
                params.set_feature_flags(scene.render_config());
            }
        }

        params.resolution = surface.extent.width as f32;

        let bindings = KernelBindings {
            buffers: slots,
            source,
            output: surface.handle,
        };
        let groups = WorkGroups::covering(surface.extent);

        backend.dispatch(&bindings, &params, groups)?;
        backend.composite(surface.handle, destination)?;

        Ok((params, groups))
    }

    /// Releases the output surface. Call before dropping the backend.
    pub fn shutdown<B: KernelBackend + ?Sized>(&mut self, backend: &mut B) {
        self.surfaces.release(backend);
    }
}
