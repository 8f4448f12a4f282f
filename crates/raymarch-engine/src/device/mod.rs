//! GPU device + swapchain.
//!
//! Creates the wgpu instance/adapter/device/queue for one window, keeps the
//! surface configured across resizes and hands out frames to record into.

mod context;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use frame::GpuFrame;
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
