//! Window, GPU and input plumbing under the frostfire demos.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`window`] | `Runtime`: the winit loop owning the window and its `Gpu` |
//! | [`core`] | `App` trait and `FrameCtx` handed to it each frame |
//! | [`device`] | adapter/device/surface setup, frame acquire and present |
//! | [`input`] | platform-neutral key and pointer state |
//! | [`time`] | frame clock, fps reports |
//! | [`camera`] | orbit and fly cameras, projection, camera uniform |
//! | [`render`] | offscreen targets, uniforms, meshes, pass helpers, blit |
//! | [`logging`] | `env_logger` initialization |

pub mod camera;
pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
