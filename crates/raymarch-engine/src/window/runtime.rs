use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx};
use crate::device::{Gpu, GpuInit};
use crate::render::Extent;
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "raymarch".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window, binds a GPU surface to it and drives `app` until the
    /// window closes or the app asks to exit.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.startup_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    exit_latch: ExitLatch,
    startup_error: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            exit_latch: ExitLatch::default(),
            startup_error: None,
        }
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        WindowEntryTryBuilder {
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")
    }

    /// Every exit path goes through here: Esc, close button, fatal frame errors.
    fn exit(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_latch.trip() {
            if let Some(entry) = &self.entry {
                let app = &mut self.app;
                entry.with_gpu(|gpu| app.on_exit(gpu));
            }
        }
        // Drop the surface before the window goes away.
        self.entry = None;
        event_loop.exit();
    }
}

/// Set by the first exit request; later requests skip the app's exit hook.
#[derive(Debug, Default)]
struct ExitLatch(bool);

impl ExitLatch {
    /// Returns true only for the first call.
    fn trip(&mut self) -> bool {
        !std::mem::replace(&mut self.0, true)
    }

    fn is_set(&self) -> bool {
        self.0
    }
}

fn extent_of(size: PhysicalSize<u32>) -> Extent {
    Extent::new(size.width, size.height)
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.entry = Some(entry);
            }
            Err(e) => {
                log::error!("failed to create window: {e:#}");
                self.startup_error = Some(e);
                self.exit(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_latch.is_set() {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw: the scene is animated every frame.
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_latch.is_set() {
            event_loop.exit();
            return;
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.exit(event_loop);
            return;
        }

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, entry) = (&mut self.app, &mut self.entry);
        let Some(entry) = entry.as_mut() else {
            return;
        };

        match &event {
            WindowEvent::CloseRequested => {
                self.exit(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                let size = extent_of(*new_size);
                entry.with_gpu_mut(|gpu| gpu.resize(size));
                app.on_resize(size);
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let size = entry.with_window(|w| extent_of(w.inner_size()));
                entry.with_gpu_mut(|gpu| gpu.resize(size));
                app.on_resize(size);
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::RedrawRequested => {
                let control = entry.with_mut(|fields| {
                    let mut ctx = FrameCtx {
                        window: fields.window,
                        gpu: fields.gpu,
                        time: fields.clock.tick(),
                    };
                    app.on_frame(&mut ctx)
                });

                if control == AppControl::Exit {
                    self.exit(event_loop);
                }
            }

            _ => {}
        }
    }
}
