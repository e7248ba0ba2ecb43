//! Snow accumulation feedback loop.
//!
//! Two fields alternate roles every quantum: the one being read feeds a
//! deposit step, the result is blurred into the other. [`SnowAccumulation`]
//! is the CPU model of the GPU textures driven by `SnowAccumulator` in the
//! demos crate; both follow the same tick order.

mod field;
mod ortho;
mod ping_pong;
mod schedule;

pub use field::{SnowAccumulation, SnowField, SNOW_MAX_DEPTH};
pub use ortho::{ortho_view_proj, snow_matrix, world_radius_to_uv, world_to_snow_uv, ORTHO_HALF_EXTENT};
pub use ping_pong::{PingPong, Slot};
pub use schedule::AccumulationSchedule;

/// Side length of the accumulation textures.
pub const ACCUMULATION_SIZE: u32 = 1024;
