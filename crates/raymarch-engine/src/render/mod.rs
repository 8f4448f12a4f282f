//! Frame pipeline: buffers, output surface, dispatch and composite.
//!
//! Responsibilities:
//! - own per-frame record buffers and release them on every exit path
//! - keep one float output image sized to the display
//! - drive one kernel dispatch per frame and composite the result
//!
//! GPU access goes through [`KernelBackend`]; [`WgpuKernel`] is the wgpu
//! implementation.

mod backend;
mod buffers;
mod ctx;
mod dispatch;
mod orchestrator;
mod output;
#[cfg(test)]
pub(crate) mod recording;
mod wgpu_kernel;

pub use backend::{
    BufferDesc, BufferHandle, BufferSlots, Extent, KernelBackend, KernelBindings, KernelSlot,
    SurfaceHandle,
};
pub use buffers::{FrameBuffers, RecordBuffer};
pub use ctx::{RenderCtx, RenderTarget};
pub use dispatch::{WORKGROUP_SIZE, WorkGroups};
pub use orchestrator::{FrameOrchestrator, FrameReport, OrchestratorConfig};
pub use output::{OutputSurface, OutputSurfaceManager};
pub use wgpu_kernel::{OUTPUT_FORMAT, WgpuFrame, WgpuKernel};

/// WGSL source of the raymarch compute kernel (entry point `main`).
pub const RAYMARCH_KERNEL: &str = include_str!("shaders/raymarch.wgsl");
