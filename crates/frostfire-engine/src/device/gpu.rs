use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface::{self, SurfaceErrorAction};
use super::GpuInit;

/// Depth format of every depth attachment, including the overhead snow depth.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// One acquired swapchain image and the encoder recording into it.
///
/// Hand it back through [`Gpu::submit`] before acquiring the next one.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
    /// Surface size at acquisition, never zero.
    pub size: (u32, u32),
}

/// Device, queue and the window surface they present to.
pub struct Gpu<'w> {
    _instance: wgpu::Instance,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    /// Last size reported by the window; may be zero while minimized.
    size: PhysicalSize<u32>,
    measure_frame_time: bool,
    last_gpu_time: Option<Duration>,
}

impl<'w> Gpu<'w> {
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(surface::is_presentable(size), "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter can present to this window")?;
        let info = adapter.get_info();
        log::info!("adapter: {} ({:?}, {:?})", info.name, info.backend, info.device_type);

        let features = init.device_features(adapter.features());
        let missing = init.optional_features - features;
        if !missing.is_empty() {
            log::warn!("adapter lacks optional features {missing:?}");
        }

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("frostfire device"),
                required_features: features,
                required_limits: init.required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device")?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps, init.prefer_srgb)
            .context("surface reports no formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: init.present_mode,
            alpha_mode: surface::choose_alpha_mode(&caps, init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        surface.configure(&device, &config);
        log::info!("surface: {format:?}, {:?}, {}x{}", init.present_mode, size.width, size.height);

        Ok(Self {
            _instance: instance,
            surface,
            device,
            queue,
            config,
            size,
            measure_frame_time: init.measure_frame_time,
            last_gpu_time: None,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Window size in physical pixels; zero while minimized.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Width over height, safe while minimized.
    pub fn aspect(&self) -> f32 {
        self.size.width.max(1) as f32 / self.size.height.max(1) as f32
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Submit-to-idle wall time of the last frame, when timing is enabled.
    pub fn last_gpu_time(&self) -> Option<Duration> {
        self.last_gpu_time
    }

    /// Records the new window size and reconfigures the surface for it.
    ///
    /// Returns `false` (and leaves the surface alone) for a zero size.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) -> bool {
        self.size = new_size;
        if !surface::is_presentable(new_size) {
            return false;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        true
    }

    pub fn begin_frame(&self) -> Result<GpuFrame, wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frostfire frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
            size: (self.config.width, self.config.height),
        })
    }

    /// Submits the frame's commands and presents it.
    pub fn submit(&mut self, frame: GpuFrame) {
        let GpuFrame {
            surface_texture,
            view,
            encoder,
            ..
        } = frame;
        let start = Instant::now();
        self.queue.submit(std::iter::once(encoder.finish()));

        if self.measure_frame_time {
            match self.wait_idle() {
                Ok(()) => self.last_gpu_time = Some(start.elapsed()),
                Err(e) => log::warn!("frame timing wait failed: {e:#}"),
            }
        }

        drop(view);
        surface_texture.present();
    }

    /// Submits work recorded outside the frame encoder (compute steps, uploads).
    pub fn submit_commands(&self, commands: wgpu::CommandBuffer) {
        self.queue.submit(std::iter::once(commands));
    }

    pub fn wait_idle(&self) -> Result<()> {
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .context("device poll failed")?;
        Ok(())
    }

    /// Reacts to a failed [`begin_frame`](Self::begin_frame).
    pub fn handle_surface_error(&mut self, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        let action = surface::classify_surface_error(&err);
        match action {
            SurfaceErrorAction::Reconfigured => {
                if surface::is_presentable(self.size) {
                    self.surface.configure(&self.device, &self.config);
                }
                log::debug!("surface {err}; reconfigured");
            }
            SurfaceErrorAction::SkipFrame => log::warn!("surface {err}; frame skipped"),
            SurfaceErrorAction::Fatal => log::error!("surface {err}"),
        }
        action
    }
}
