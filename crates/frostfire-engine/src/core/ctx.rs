use winit::window::Window;

use crate::device::Gpu;
use crate::input::{InputFrame, InputState};
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameTime;

use super::app::AppControl;

/// The demo's window.
pub struct WindowCtx<'a> {
    pub window: &'a Window,
}

impl WindowCtx<'_> {
    /// `(width, height)` in logical pixels, the space pointer positions use.
    pub fn logical_size(&self) -> (f32, f32) {
        let size = self.window.inner_size().to_logical::<f64>(self.window.scale_factor());
        (size.width as f32, size.height as f32)
    }

    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Everything [`App::on_frame`](super::App::on_frame) gets.
///
/// `'a` is the callback, `'w` the window borrow inside [`Gpu`].
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
}

impl FrameCtx<'_, '_> {
    /// Acquires the next swapchain image, lets `draw` record every pass
    /// (clears included), then submits and presents.
    ///
    /// A failed acquire skips `draw`; only an out-of-memory surface exits.
    pub fn render<F>(&mut self, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                return if self.gpu.handle_surface_error(err).is_fatal() {
                    AppControl::Exit
                } else {
                    AppControl::Continue
                };
            }
        };

        {
            let rctx = RenderCtx::new(self.gpu.device(), self.gpu.queue(), self.gpu.surface_format(), frame.size);
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            draw(&rctx, &mut target);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);
        AppControl::Continue
    }
}
