//! Tarmac viewer: two textured quads (or an OBJ model) with a tuning panel
//! for anisotropic filtering and camera panning.
//!
//! Usage: `tarmac-viewer [config.toml]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use winit::event::WindowEvent;
use winit::keyboard::{Key, NamedKey};
use winit::window::Window;

use tarmac_engine::config::EngineConfig;
use tarmac_engine::core::{App, AppControl, FrameCtx};
use tarmac_engine::device::Gpu;
use tarmac_engine::frame::{FrameOrchestrator, SurfaceBackend};
use tarmac_engine::logging::init_logging;
use tarmac_engine::overlay::{Overlay, OverlayFrame, TuningPanel, TuningState};
use tarmac_engine::scene::{Camera, Scene, SceneBuilder, SceneConfig};
use tarmac_engine::window::Runtime;

fn main() -> Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = EngineConfig::load_or_default(config_path.as_deref())
        .context("failed to load configuration")?;

    init_logging(config.logging());
    match &config_path {
        Some(path) => log::info!("configuration loaded from {}", path.display()),
        None => log::info!("no configuration file given, using defaults"),
    }

    let scene = config.scene().context("failed to prepare scene settings")?;
    Runtime::run(config.runtime(), config.gpu_init(), Viewer::new(scene))
}

struct Running {
    scene: Scene,
    panel: TuningPanel,
    orchestrator: FrameOrchestrator,
    camera: Camera,
}

struct Viewer {
    pending: Option<SceneConfig>,
    running: Option<Running>,
}

impl Viewer {
    fn new(scene: SceneConfig) -> Self {
        Self {
            pending: Some(scene),
            running: None,
        }
    }
}

impl App for Viewer {
    fn on_gpu_ready(&mut self, gpu: &mut Gpu<'_>, _window: &Window) -> Result<()> {
        let Some(config) = self.pending.take() else {
            return Ok(());
        };

        let scene = SceneBuilder::new(config)
            .build(gpu.context(), gpu.surface_format())
            .context("failed to build scene")?;

        let size = gpu.size();
        let panel = TuningPanel::new(TuningState {
            anisotropy: scene.anisotropy(),
            ..TuningState::default()
        });
        let orchestrator = FrameOrchestrator::new(scene.clear_color());

        self.running = Some(Running {
            scene,
            panel,
            orchestrator,
            camera: Camera::new(size.width, size.height),
        });
        Ok(())
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        if let WindowEvent::KeyboardInput { event: key, .. } = event {
            if key.state.is_pressed() && key.logical_key == Key::Named(NamedKey::Escape) {
                return AppControl::Exit;
            }
        }

        if let Some(running) = self.running.as_mut() {
            running.panel.handle_event(event);
            if let WindowEvent::Resized(size) = event {
                running.camera.set_viewport(size.width, size.height);
            }
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        let Some(running) = self.running.as_mut() else {
            return Ok(AppControl::Exit);
        };

        let tuning = running.panel.state();
        running.scene.set_anisotropy(ctx.gpu.device(), tuning.anisotropy)?;
        running.camera.set_pan(tuning.camera_pan);
        running
            .scene
            .update(ctx.gpu.queue(), &running.camera, ctx.time.elapsed)?;

        let viewport = ctx.viewport();
        running.panel.begin_frame(&OverlayFrame {
            device: ctx.gpu.device(),
            queue: ctx.gpu.queue(),
            format: ctx.gpu.surface_format(),
            viewport,
        });

        let mut backend =
            SurfaceBackend::new(ctx.gpu, running.scene.pipeline(), running.scene.table());
        running
            .orchestrator
            .render(&mut backend, running.scene.draws(), &running.panel)?;

        Ok(AppControl::Continue)
    }
}
