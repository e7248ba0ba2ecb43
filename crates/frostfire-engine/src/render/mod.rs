//! GPU rendering helpers shared by the demos.
//!
//! Each demo renderer owns its GPU resources (pipelines, buffers) and builds
//! them lazily on first use. This module only provides the common pieces:
//! offscreen targets, uniform buffers, procedural meshes and a fullscreen blit.
//!
//! Convention:
//! - world space is right-handed, +Y up
//! - clip space depth is `0..1` (wgpu)

mod blit;
mod ctx;
mod mesh;
mod pipeline;
mod target;
mod uniform;

pub use blit::Blit;
pub use ctx::{RenderCtx, RenderTarget};
pub use mesh::{Mesh, MeshData, Vertex};
pub use pipeline::{additive_blend, begin_pass, depth_stencil, linear_sampler, PassTarget};
pub use target::{DepthBuffer, RenderTexture};
pub use uniform::{DynamicUniforms, UniformBuffer, DYNAMIC_STRIDE};
