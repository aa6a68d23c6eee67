use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx};
use crate::device::{Gpu, GpuInit};
use crate::time::FrameClock;

/// Window configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub title: String,
    /// Initial inner size in physical pixels.
    pub initial_size: PhysicalSize<u32>,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "tarmac".to_string(),
            initial_size: PhysicalSize::new(1200, 800),
            resizable: true,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, negotiates the GPU session and drives `app` until the
    /// window closes, the app exits, or a callback fails.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
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

struct AppState<A> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    // Declared before `entry`: the app's GPU objects drop before the session.
    app: A,

    entry: Option<WindowEntry>,
    fatal: Option<anyhow::Error>,
}

impl<A: App + 'static> AppState<A> {
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        self.entry = None;
        event_loop.exit();
    }

    fn open_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(self.config.resizable);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let mut entry = WindowEntryTryBuilder {
            clock: FrameClock::new(),
            window,
            gpu_builder: |w| Gpu::new(w, gpu_init),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let app = &mut self.app;
        entry
            .with_mut(|fields| app.on_gpu_ready(fields.gpu, fields.window))
            .context("application setup failed")?;

        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
        Ok(())
    }

    fn redraw(&mut self) -> Result<AppControl> {
        let (app, entry) = (&mut self.app, &mut self.entry);
        let Some(entry) = entry.as_mut() else {
            return Ok(AppControl::Exit);
        };

        entry.with_mut(|fields| {
            let time = fields.clock.tick();
            let mut ctx = FrameCtx {
                window: fields.window,
                gpu: fields.gpu,
                time,
            };
            let control = app.on_frame(&mut ctx);
            fields.window.pre_present_notify();
            control
        })
    }
}

impl<A: App + 'static> ApplicationHandler for AppState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }
        if let Err(err) = self.open_window(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw.
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if self.entry.is_none() {
            return;
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.entry = None;
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window closed");
                self.entry = None;
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.entry.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                }
            }

            WindowEvent::RedrawRequested => match self.redraw() {
                Ok(AppControl::Continue) => {}
                Ok(AppControl::Exit) => {
                    self.entry = None;
                    event_loop.exit();
                }
                Err(err) => self.fail(event_loop, err.context("frame failed")),
            },

            _ => {}
        }
    }
}
