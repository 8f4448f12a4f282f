mod backdrop;
mod demo;

use anyhow::Result;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};

use raymarch_engine::core::{App, AppControl, FrameCtx};
use raymarch_engine::device::{Gpu, GpuInit};
use raymarch_engine::logging::{LoggingConfig, init_logging};
use raymarch_engine::render::{FrameOrchestrator, OrchestratorConfig, RenderCtx, WgpuKernel};
use raymarch_engine::scene::{Color, SceneProvider, SceneRegistry};
use raymarch_engine::window::{Runtime, RuntimeConfig};

use backdrop::Backdrop;
use demo::{Orbit, demo_scene};

/// GPU objects created on the first frame, once a device exists.
struct GpuState {
    kernel: WgpuKernel,
    backdrop: Backdrop,
}

struct Viewer {
    scene: SceneRegistry,
    orbit: Orbit,
    orchestrator: FrameOrchestrator,
    gpu: Option<GpuState>,
}

impl Viewer {
    fn new() -> Self {
        Self {
            scene: demo_scene(),
            orbit: Orbit::new(9.0, 2.5, 0.35),
            orchestrator: FrameOrchestrator::new(OrchestratorConfig::default()),
            gpu: None,
        }
    }

    fn toggle(&mut self, key: &str) {
        let mut config = self.scene.render_config();
        match key {
            "1" => config.ambient_occlusion = !config.ambient_occlusion,
            "2" => config.fog = !config.fog,
            "3" => config.glow = !config.glow,
            _ => return,
        }
        log::info!(
            "ao={} fog={} glow={}",
            config.ambient_occlusion,
            config.fog,
            config.glow
        );
        self.scene.set_render_config(config);
    }
}

impl App for Viewer {
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return AppControl::Continue;
        };
        if event.state != ElementState::Pressed || event.repeat {
            return AppControl::Continue;
        }

        match &event.logical_key {
            Key::Named(NamedKey::Escape) => return AppControl::Exit,
            Key::Named(NamedKey::Space) => self.orbit.paused = !self.orbit.paused,
            Key::Character(c) => self.toggle(c.as_str()),
            _ => {}
        }
        AppControl::Continue
    }

    /// Releases the orchestrator's output surface while the device is alive.
    fn on_exit(&mut self, gpu: &Gpu<'_>) {
        let Some(state) = self.gpu.as_mut() else {
            return;
        };
        let rctx = RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format(), gpu.size());
        // Never submitted; releasing handles records no GPU work.
        let mut encoder = rctx.side_encoder("raymarch shutdown");
        let mut backend = state.kernel.frame(&rctx, &mut encoder);
        self.orchestrator.shutdown(&mut backend);
        log::debug!("output surface released");
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.gpu.is_none() {
            let device = ctx.gpu.device();
            let kernel = match WgpuKernel::new(device, self.orchestrator.schema()) {
                Ok(k) => k,
                Err(e) => {
                    log::error!("raymarch kernel unavailable: {e}");
                    return AppControl::Exit;
                }
            };
            let backdrop = Backdrop::new(
                device,
                ctx.gpu.queue(),
                Color::from_srgb_u8(86, 120, 168, 255),
                Color::from_srgb_u8(220, 214, 200, 255),
            );
            self.gpu = Some(GpuState { kernel, backdrop });
        }

        self.orbit.advance(ctx.time.dt);
        self.scene.set_camera(self.orbit.camera());

        let Some(gpu) = self.gpu.as_mut() else {
            return AppControl::Continue;
        };
        let (orchestrator, scene) = (&mut self.orchestrator, &self.scene);
        let frame_index = ctx.time.frame_index;

        ctx.render(|rctx, target| {
            let mut backend = gpu.kernel.frame(rctx, &mut *target.encoder);
            let report = orchestrator.render_frame(
                &mut backend,
                scene,
                gpu.backdrop.view(),
                target.view,
                rctx.extent,
            )?;
            drop(backend);

            if report.surface_recreated || frame_index % 600 == 0 {
                log::debug!(
                    "frame {frame_index}: {} shapes, {} lights, {}x{}x{} groups at {}x{}, {} buffers live",
                    report.shape_count,
                    report.light_count,
                    report.groups.x,
                    report.groups.y,
                    report.groups.z,
                    report.extent.width,
                    report.extent.height,
                    gpu.kernel.live_buffers(),
                );
            }
            Ok(())
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "raymarch viewer".to_string(),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuInit::default(), Viewer::new())
}
