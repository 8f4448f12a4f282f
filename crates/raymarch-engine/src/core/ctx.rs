use anyhow::Result;
use winit::window::Window;

use crate::device::{Gpu, SurfaceErrorAction};
use crate::render::{Extent, RenderCtx, RenderTarget};
use crate::time::FrameTime;

use super::app::AppControl;

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Drawable size in physical pixels.
    pub fn size(&self) -> Extent {
        self.gpu.size()
    }

    /// Acquires a frame, calls `draw` with a ready [`RenderCtx`] and
    /// [`RenderTarget`], then submits and presents it.
    ///
    /// If `draw` fails the frame is logged and discarded without submitting;
    /// the loop carries on with the next one. Only a fatal surface error
    /// returns [`AppControl::Exit`].
    pub fn render<F>(&mut self, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>) -> Result<()>,
    {
        let size = self.gpu.size();
        if size.is_empty() {
            // Minimized; nothing to draw into.
            return AppControl::Continue;
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                log::warn!("failed to acquire frame: {err}");
                if self.gpu.handle_surface_error(err) == SurfaceErrorAction::Fatal {
                    log::error!("fatal surface error, exiting");
                    return AppControl::Exit;
                }
                return AppControl::Continue;
            }
        };

        let rctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            size,
        );

        // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
        let result = {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            draw(&rctx, &mut target)
        };

        if let Err(e) = result {
            log::error!("frame {} dropped: {e:#}", self.time.frame_index);
            self.gpu.discard(frame);
            return AppControl::Continue;
        }

        self.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}
