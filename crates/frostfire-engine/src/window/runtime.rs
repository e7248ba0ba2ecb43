use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::FrameClock;

/// Window title and size.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "frostfire".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Single-window event loop driving one [`App`].
pub struct Runtime;

impl Runtime {
    /// Blocks until the window closes or the app returns [`AppControl::Exit`].
    ///
    /// Window or GPU creation failures are returned after the loop ends.
    pub fn run<A: App + 'static>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit event loop")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut handler = Handler {
            config,
            gpu_init,
            app,
            entry: None,
            exiting: false,
            startup_error: None,
        };
        event_loop
            .run_app(&mut handler)
            .context("winit event loop terminated with error")?;

        handler.startup_error.map_or(Ok(()), Err)
    }
}

/// The window and the GPU context borrowing it, plus per-window input.
#[self_referencing]
struct WindowEntry {
    input: InputState,
    input_frame: InputFrame,
    clock: FrameClock,
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl WindowEntry {
    fn open(event_loop: &ActiveEventLoop, config: &RuntimeConfig, gpu_init: GpuInit) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size);
        let window = event_loop.create_window(attrs).context("failed to create window")?;

        WindowEntryTryBuilder {
            input: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::new(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")
    }
}

struct Handler<A> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    entry: Option<WindowEntry>,
    exiting: bool,
    startup_error: Option<anyhow::Error>,
}

impl<A: App> Handler<A> {
    fn exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exiting = true;
        event_loop.exit();
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let (app, entry) = (&mut self.app, &mut self.entry);
        let Some(entry) = entry.as_mut() else { return };

        entry.with_gpu_mut(|gpu| {
            if gpu.resize(new_size) {
                log::debug!("surface resized to {}x{}", new_size.width, new_size.height);
                app.on_resize(gpu, new_size);
            }
        });
    }

    /// Runs one `on_frame`, then drops this frame's input transitions.
    fn frame(&mut self) -> AppControl {
        let (app, entry) = (&mut self.app, &mut self.entry);
        let Some(entry) = entry.as_mut() else {
            return AppControl::Continue;
        };

        entry.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: WindowCtx { window: fields.window },
                gpu: fields.gpu,
                input: fields.input,
                input_frame: fields.input_frame,
                time: fields.clock.tick(),
            };
            let control = app.on_frame(&mut ctx);
            fields.input_frame.clear();
            control
        })
    }
}

impl<A: App> ApplicationHandler for Handler<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        match WindowEntry::open(event_loop, &self.config, self.gpu_init.clone()) {
            Ok(entry) => {
                log::info!("window \"{}\" ready", self.config.title);
                self.entry = Some(entry);
            }
            Err(e) => {
                log::error!("{e:#}");
                self.startup_error = Some(e);
                self.exit(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // Every demo animates; draw as fast as the present mode allows.
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if self.exiting {
            return;
        }

        if let Some(entry) = self.entry.as_mut() {
            entry.with_mut(|fields| {
                let scale_factor = fields.window.scale_factor();
                if let Some(ev) = translate_window_event(scale_factor, &event) {
                    fields.input.apply_event(fields.input_frame, ev);
                }
            });
        }

        match event {
            WindowEvent::CloseRequested => {
                self.entry = None;
                self.exit(event_loop);
            }
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.entry.as_ref().map(|e| e.with_window(|w| w.inner_size())) {
                    self.resize(size);
                }
            }
            WindowEvent::RedrawRequested => {
                if self.frame() == AppControl::Exit {
                    self.exit(event_loop);
                }
            }
            _ => {}
        }
    }
}
