use winit::event::WindowEvent;

use super::ctx::FrameCtx;
use crate::device::Gpu;
use crate::render::Extent;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called for every window event, before the runtime handles it.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called after the surface was resized (physical pixels, may be zero).
    fn on_resize(&mut self, size: Extent) {
        let _ = size;
    }

    /// Called once when the app or the window asks to exit, while the device
    /// is still alive. GPU resources held by the app are released here.
    fn on_exit(&mut self, gpu: &Gpu<'_>) {
        let _ = gpu;
    }

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
