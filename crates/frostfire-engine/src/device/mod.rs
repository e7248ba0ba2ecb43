//! wgpu device, queue and window surface.
//!
//! [`Gpu`] is created once per window by the runtime. Demos only borrow its
//! device and queue; frame acquisition and submission stay here.

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame, DEPTH_FORMAT};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
