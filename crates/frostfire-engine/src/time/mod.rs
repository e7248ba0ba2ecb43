//! Frame timing: a per-window [`FrameClock`] and the once-per-second
//! [`FpsCounter`] behind the title-bar statistics.

mod fps;
mod frame_clock;

pub use fps::{FpsCounter, FpsReport};
pub use frame_clock::{FrameClock, FrameTime};
