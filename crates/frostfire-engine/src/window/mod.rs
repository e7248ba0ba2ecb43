//! winit event loop owning the demo window and its [`Gpu`](crate::device::Gpu).

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
