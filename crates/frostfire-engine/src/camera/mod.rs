//! Cameras driven by `InputState`/`InputFrame`.
//!
//! - [`OrbitCamera`]: looks at a target; left-drag rotates, wheel zooms.
//! - [`FlyCamera`]: first person; WASD moves, right-drag looks, shift sprints.

mod fly;
mod orbit;
mod uniform;

pub use fly::FlyCamera;
pub use orbit::OrbitCamera;
pub use uniform::{CameraUniform, Projection};
