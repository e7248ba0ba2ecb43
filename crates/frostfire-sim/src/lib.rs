//! Simulation core for the **frostfire** demos.
//!
//! This crate owns every piece of demo logic that has real invariants and
//! keeps it free of wgpu / winit so it can be exercised headless. The GPU
//! kernels in `frostfire-demos` mirror the math defined here.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`particles`] | `FireworkParams`, `ParticleCount`, `Phase`, `CpuIntegrator`, `ParticleController` |
//! | [`accumulation`] | `PingPong`, `AccumulationSchedule`, `SnowField`, `SnowAccumulation`, `snow_matrix` |
//! | [`composite`] | `DisplayMode`, `ScenePass`, `combine_texel` |
//! | [`forest`] | `ForestParams`, `TreeInstance`, `generate_forest` |
//! | [`traffic`] | `CarAnimation`, `BlinkingLamp` |
//! | [`picking`] | `Ray`, `cursor_ray` |
//! | [`error`] | `ParticleCountError`, `LayoutError` |
//!
//! # Quick start
//!
//! ```rust
//! use frostfire_sim::particles::{CpuIntegrator, FireworkParams, ParticleCount};
//!
//! let params = FireworkParams::default();
//! let mut sim = CpuIntegrator::new(ParticleCount::MAX);
//! sim.reset(ParticleCount::new(256).unwrap());
//! sim.step(0.5, 1.0 / 60.0, &params);
//! assert_eq!(sim.states().len(), 256);
//! ```

pub mod accumulation;
pub mod composite;
pub mod error;
pub mod forest;
pub mod particles;
pub mod picking;
pub mod traffic;

pub use error::{LayoutError, ParticleCountError};
