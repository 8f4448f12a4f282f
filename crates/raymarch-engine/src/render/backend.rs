use crate::error::RenderResult;
use crate::layout::KernelParams;

use super::dispatch::WorkGroups;

/// Opaque id of a structured buffer owned by a backend.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferHandle(pub(crate) u64);

/// Opaque id of a writable output image owned by a backend.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SurfaceHandle(pub(crate) u64);

/// Size of an image in physical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn aspect(self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    #[inline]
    pub const fn pixel_count(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Structured-buffer slots declared by the kernel.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum KernelSlot {
    Shapes,
    Lights,
}

impl KernelSlot {
    /// Variable name in the kernel source.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Shapes => "shapes",
            Self::Lights => "lights",
        }
    }

    /// `@binding` index in group 0.
    #[inline]
    pub const fn binding(self) -> u32 {
        match self {
            Self::Shapes => 0,
            Self::Lights => 1,
        }
    }
}

/// Description of one record buffer to allocate and fill.
#[derive(Debug, Copy, Clone)]
pub struct BufferDesc<'a> {
    pub slot: KernelSlot,
    pub stride: u64,
    pub count: u32,
    /// Exactly `stride * count` bytes.
    pub contents: &'a [u8],
}

/// Buffers bound to the kernel's structured-buffer slots for one dispatch.
///
/// An unbound slot means "no records"; the kernel sees a count of zero.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct BufferSlots {
    shapes: Option<BufferHandle>,
    lights: Option<BufferHandle>,
}

impl BufferSlots {
    #[inline]
    pub fn set(&mut self, slot: KernelSlot, handle: BufferHandle) {
        match slot {
            KernelSlot::Shapes => self.shapes = Some(handle),
            KernelSlot::Lights => self.lights = Some(handle),
        }
    }

    #[inline]
    pub fn get(&self, slot: KernelSlot) -> Option<BufferHandle> {
        match slot {
            KernelSlot::Shapes => self.shapes,
            KernelSlot::Lights => self.lights,
        }
    }
}

/// Everything the kernel reads and writes in one dispatch, besides uniforms.
pub struct KernelBindings<'a, I: ?Sized> {
    pub buffers: BufferSlots,
    pub source: &'a I,
    pub output: SurfaceHandle,
}

/// GPU operations the frame driver needs.
///
/// Implementations own the resources behind the handles. Destroying a handle
/// only drops the caller's claim: work already recorded against it must still
/// see valid memory (reference-counted or fenced release).
pub trait KernelBackend {
    /// Image type for the source and destination views.
    type Image: ?Sized;

    fn create_buffer(&mut self, desc: &BufferDesc<'_>) -> RenderResult<BufferHandle>;

    /// Releases a buffer. Unknown handles are ignored.
    fn destroy_buffer(&mut self, handle: BufferHandle);

    /// Creates a float RGBA image writable by the kernel.
    fn create_surface(&mut self, extent: Extent) -> RenderResult<SurfaceHandle>;

    /// Releases an output image. Unknown handles are ignored.
    fn destroy_surface(&mut self, handle: SurfaceHandle);

    fn dispatch(
        &mut self,
        bindings: &KernelBindings<'_, Self::Image>,
        params: &KernelParams,
        groups: WorkGroups,
    ) -> RenderResult<()>;

    /// Copies the output image onto `destination` without blending.
    fn composite(&mut self, surface: SurfaceHandle, destination: &Self::Image) -> RenderResult<()>;
}
