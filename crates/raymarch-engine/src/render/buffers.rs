use crate::error::{RenderError, RenderResult};
use crate::layout::{GpuRecord, SchemaVersion, encode};

use super::backend::{BufferDesc, BufferHandle, BufferSlots, KernelBackend, KernelSlot};

/// One frame's claim on a structured buffer of packed records.
///
/// An empty upload allocates nothing and binds nothing.
#[derive(Debug, Default)]
pub struct RecordBuffer {
    handle: Option<BufferHandle>,
    count: u32,
    stride: u64,
}

impl RecordBuffer {
    /// Packs `records` at `version` and uploads them into a fresh buffer.
    pub fn upload<B, R>(
        backend: &mut B,
        slot: KernelSlot,
        records: &[R],
        version: SchemaVersion,
    ) -> RenderResult<Self>
    where
        B: KernelBackend + ?Sized,
        R: GpuRecord,
    {
        let stride = R::stride(version);
        if records.is_empty() {
            return Ok(Self {
                handle: None,
                count: 0,
                stride,
            });
        }

        let count = u32::try_from(records.len()).map_err(|_| {
            RenderError::allocation(slot.name(), format!("{} records exceed u32", records.len()))
        })?;
        let contents = encode(records, version);

        let handle = backend.create_buffer(&BufferDesc {
            slot,
            stride,
            count,
            contents: &contents,
        })?;

        log::trace!(
            "uploaded {count} {} ({} bytes, stride {stride})",
            R::KERNEL_NAME,
            contents.len()
        );

        Ok(Self {
            handle: Some(handle),
            count,
            stride,
        })
    }

    /// Binds the buffer to `slot`. No-op when nothing was uploaded.
    pub fn bind(&self, slots: &mut BufferSlots, slot: KernelSlot) {
        if let Some(h) = self.handle {
            slots.set(slot, h);
        }
    }

    /// Gives the buffer back to the backend. Safe to call more than once.
    pub fn release<B: KernelBackend + ?Sized>(&mut self, backend: &mut B) {
        if let Some(h) = self.handle.take() {
            backend.destroy_buffer(h);
        }
        self.count = 0;
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub fn stride(&self) -> u64 {
        self.stride
    }

    #[inline]
    pub fn handle(&self) -> Option<BufferHandle> {
        self.handle
    }

    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.handle.is_some()
    }
}

/// Record buffers owned by a single frame.
#[derive(Debug, Default)]
pub struct FrameBuffers {
    pub shapes: RecordBuffer,
    pub lights: RecordBuffer,
}

impl FrameBuffers {
    pub fn release<B: KernelBackend + ?Sized>(&mut self, backend: &mut B) {
        self.shapes.release(backend);
        self.lights.release(backend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LightRecord, ShapeRecord};
    use crate::render::recording::RecordingBackend;

    #[test]
    fn empty_upload_allocates_nothing() {
        let mut backend = RecordingBackend::new();
        let buf = RecordBuffer::upload(
            &mut backend,
            KernelSlot::Shapes,
            &[] as &[ShapeRecord],
            SchemaVersion::LATEST,
        )
        .unwrap();

        assert!(!buf.is_allocated());
        assert_eq!(buf.count(), 0);
        assert_eq!(buf.stride(), 104);
        assert_eq!(backend.buffers_created(), 0);

        let mut slots = BufferSlots::default();
        buf.bind(&mut slots, KernelSlot::Shapes);
        assert_eq!(slots.get(KernelSlot::Shapes), None);
    }

    #[test]
    fn upload_sizes_buffer_from_stride_and_count() {
        let mut backend = RecordingBackend::new();
        let lights = vec![LightRecord::default(); 3];
        let mut buf =
            RecordBuffer::upload(&mut backend, KernelSlot::Lights, &lights, SchemaVersion::V3)
                .unwrap();

        let h = buf.handle().unwrap();
        let stored = backend.buffer(h).unwrap();
        assert_eq!(stored.slot, KernelSlot::Lights);
        assert_eq!(stored.stride, 72);
        assert_eq!(stored.count, 3);
        assert_eq!(stored.bytes.len(), 3 * 72);

        buf.release(&mut backend);
        assert_eq!(backend.live_buffers(), 0);
    }

    #[test]
    fn older_schema_uses_older_stride() {
        let mut backend = RecordingBackend::new();
        let shapes = [ShapeRecord::default(); 2];
        let buf =
            RecordBuffer::upload(&mut backend, KernelSlot::Shapes, &shapes, SchemaVersion::V1)
                .unwrap();

        let stored = backend.buffer(buf.handle().unwrap()).unwrap();
        assert_eq!(stored.stride, 64);
        assert_eq!(stored.bytes.len(), 128);
    }

    #[test]
    fn release_is_idempotent() {
        let mut backend = RecordingBackend::new();
        let mut buf = RecordBuffer::upload(
            &mut backend,
            KernelSlot::Shapes,
            &[ShapeRecord::default()],
            SchemaVersion::LATEST,
        )
        .unwrap();

        buf.release(&mut backend);
        buf.release(&mut backend);
        assert_eq!(backend.live_buffers(), 0);
        assert_eq!(backend.buffers_destroyed(), 1);
    }

    #[test]
    fn allocation_failure_surfaces() {
        let mut backend = RecordingBackend::new().failing_buffers_after(0);
        let err = RecordBuffer::upload(
            &mut backend,
            KernelSlot::Shapes,
            &[ShapeRecord::default()],
            SchemaVersion::LATEST,
        )
        .unwrap_err();

        assert!(matches!(err, RenderError::ResourceAllocation { .. }));
        assert_eq!(backend.live_buffers(), 0);
    }
}
