//! In-memory backend that records every call, for driving the frame pipeline
//! without a GPU.

use std::collections::HashMap;

use crate::error::{RenderError, RenderResult};
use crate::layout::KernelParams;

use super::backend::{
    BufferDesc, BufferHandle, Extent, KernelBackend, KernelBindings, KernelSlot, SurfaceHandle,
};
use super::dispatch::{WORKGROUP_SIZE, WorkGroups};

/// Stand-in for a texture view.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TestImage(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedBuffer {
    pub slot: KernelSlot,
    pub stride: u64,
    pub count: u32,
    pub bytes: Vec<u8>,
}

/// Snapshot of one dispatch, taken while its resources were alive.
#[derive(Debug, Clone)]
pub struct RecordedDispatch {
    pub shapes: Option<RecordedBuffer>,
    pub lights: Option<RecordedBuffer>,
    pub params: KernelParams,
    pub groups: WorkGroups,
    pub source: TestImage,
    pub output: SurfaceHandle,
    pub output_extent: Extent,
    /// Output pixels no invocation landed on.
    pub uncovered_pixels: u64,
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    next_id: u64,
    buffers: HashMap<BufferHandle, RecordedBuffer>,
    surfaces: HashMap<SurfaceHandle, Extent>,
    buffers_created: usize,
    buffers_destroyed: usize,
    surfaces_created: usize,
    fail_buffers_after: Option<usize>,
    dispatches: Vec<RecordedDispatch>,
    composites: Vec<(SurfaceHandle, TestImage)>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every buffer allocation after `n` have succeeded.
    pub fn failing_buffers_after(mut self, n: usize) -> Self {
        self.fail_buffers_after = Some(n);
        self
    }

    pub fn buffer(&self, h: BufferHandle) -> Option<&RecordedBuffer> {
        self.buffers.get(&h)
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    pub fn live_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    pub fn buffers_created(&self) -> usize {
        self.buffers_created
    }

    pub fn buffers_destroyed(&self) -> usize {
        self.buffers_destroyed
    }

    pub fn surfaces_created(&self) -> usize {
        self.surfaces_created
    }

    pub fn dispatches(&self) -> &[RecordedDispatch] {
        &self.dispatches
    }

    pub fn composites(&self) -> &[(SurfaceHandle, TestImage)] {
        &self.composites
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn snapshot(&self, h: Option<BufferHandle>) -> RenderResult<Option<RecordedBuffer>> {
        h.map(|h| {
            self.buffers
                .get(&h)
                .cloned()
                .ok_or(RenderError::UnknownHandle("buffer"))
        })
        .transpose()
    }
}

/// Counts pixels of `extent` that no invocation of `groups` reaches.
fn uncovered(extent: Extent, groups: WorkGroups) -> u64 {
    let (w, h) = (extent.width as usize, extent.height as usize);
    let mut hit = vec![false; w * h];
    let size = WORKGROUP_SIZE as usize;
    for gy in 0..groups.y as usize {
        for gx in 0..groups.x as usize {
            for ly in 0..size {
                for lx in 0..size {
                    let (x, y) = (gx * size + lx, gy * size + ly);
                    if x < w && y < h {
                        hit[y * w + x] = true;
                    }
                }
            }
        }
    }
    hit.iter().filter(|h| !**h).count() as u64
}

impl KernelBackend for RecordingBackend {
    type Image = TestImage;

    fn create_buffer(&mut self, desc: &BufferDesc<'_>) -> RenderResult<BufferHandle> {
        if self
            .fail_buffers_after
            .is_some_and(|n| self.buffers_created >= n)
        {
            return Err(RenderError::allocation(desc.slot.name(), "injected failure"));
        }
        assert_eq!(
            desc.contents.len() as u64,
            desc.stride * u64::from(desc.count),
            "buffer contents must be stride * count bytes"
        );

        let h = BufferHandle(self.next_id());
        self.buffers.insert(
            h,
            RecordedBuffer {
                slot: desc.slot,
                stride: desc.stride,
                count: desc.count,
                bytes: desc.contents.to_vec(),
            },
        );
        self.buffers_created += 1;
        Ok(h)
    }

    fn destroy_buffer(&mut self, handle: BufferHandle) {
        if self.buffers.remove(&handle).is_some() {
            self.buffers_destroyed += 1;
        }
    }

    fn create_surface(&mut self, extent: Extent) -> RenderResult<SurfaceHandle> {
        let h = SurfaceHandle(self.next_id());
        self.surfaces.insert(h, extent);
        self.surfaces_created += 1;
        Ok(h)
    }

    fn destroy_surface(&mut self, handle: SurfaceHandle) {
        self.surfaces.remove(&handle);
    }

    fn dispatch(
        &mut self,
        bindings: &KernelBindings<'_, TestImage>,
        params: &KernelParams,
        groups: WorkGroups,
    ) -> RenderResult<()> {
        let output_extent = *self
            .surfaces
            .get(&bindings.output)
            .ok_or(RenderError::UnknownHandle("surface"))?;
        let shapes = self.snapshot(bindings.buffers.get(KernelSlot::Shapes))?;
        let lights = self.snapshot(bindings.buffers.get(KernelSlot::Lights))?;

        self.dispatches.push(RecordedDispatch {
            shapes,
            lights,
            params: *params,
            groups,
            source: *bindings.source,
            output: bindings.output,
            output_extent,
            uncovered_pixels: uncovered(output_extent, groups),
        });
        Ok(())
    }

    fn composite(&mut self, surface: SurfaceHandle, destination: &TestImage) -> RenderResult<()> {
        if !self.surfaces.contains_key(&surface) {
            return Err(RenderError::UnknownHandle("surface"));
        }
        self.composites.push((surface, *destination));
        Ok(())
    }
}
