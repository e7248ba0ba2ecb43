use winit::dpi::PhysicalSize;

use crate::device::Gpu;

use super::ctx::FrameCtx;

/// Whether the runtime keeps going after a callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// What a demo implements to be driven by [`Runtime`](crate::window::Runtime).
pub trait App {
    /// The surface was reconfigured to `size` (never zero). Window-sized
    /// targets are recreated here.
    fn on_resize(&mut self, gpu: &Gpu<'_>, size: PhysicalSize<u32>) {
        let _ = (gpu, size);
    }

    /// One frame: read input, update, render.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
