//! Firework particle simulation.
//!
//! Responsibilities:
//! - tunable parameters ([`FireworkParams`]) passed explicitly to every step
//! - the phase policy (launch → thrust/explosion → drift → fade), with alpha
//!   fading from `fade_delay` on
//! - a CPU reference integrator matching `fireworks.wgsl` bit-for-bit in structure
//! - the host-side controller deciding when particle state must be reset
//!
//! Per-particle randomness comes from [`hash`], which the WGSL kernel reimplements
//! with identical constants so CPU and GPU runs agree on rockets and directions.

mod controller;
mod count;
pub mod hash;
mod integrator;
mod params;
mod phase;

pub use controller::{ParticleController, StepPlan};
pub use count::{ParticleCount, WORKGROUP_SIZE};
pub use integrator::{CpuIntegrator, ParticleState};
pub use params::{FireworkParams, FireworkUniform};
pub use phase::{cycle_age, phase_at, Phase, PhaseTimeline};

/// Number of consecutive particles that share one rocket (launch pad, launch
/// velocity, color and time offset).
pub const ROCKET_SIZE: u32 = 64;
