//! Keyboard and pointer input, independent of winit.
//!
//! The runtime feeds translated [`InputEvent`]s into one [`InputState`]
//! (what is held) and one [`InputFrame`] (what changed this frame).

mod frame;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{ButtonState, InputEvent, Key, MouseButton};
