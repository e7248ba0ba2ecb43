//! Stateless per-particle randomness.
//!
//! `fireworks.wgsl` carries a line-for-line copy of these functions; keep the
//! constants in sync.

use std::f32::consts::TAU;

use glam::Vec3;

use super::ROCKET_SIZE;

const PARTICLE_STREAM: u32 = 0x8000_0000;

/// PCG-style integer hash (RXS-M-XS output permutation).
#[inline]
pub fn pcg(x: u32) -> u32 {
    let state = x.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    let word = ((state >> ((state >> 28) + 4)) ^ state).wrapping_mul(277_803_737);
    (word >> 22) ^ word
}

/// Maps a hash to `[0, 1)` using its top 24 bits.
#[inline]
pub fn rand01(h: u32) -> f32 {
    (h >> 8) as f32 / 16_777_216.0
}

/// Hash for value `k` of rocket `rocket`.
#[inline]
pub fn rocket_seed(rocket: u32, k: u32) -> u32 {
    pcg(rocket.wrapping_mul(8).wrapping_add(k))
}

/// Hash for value `k` of particle `index`, on a stream disjoint from rockets.
#[inline]
pub fn particle_seed(index: u32, k: u32) -> u32 {
    pcg(index.wrapping_mul(8).wrapping_add(k).wrapping_add(PARTICLE_STREAM))
}

#[inline]
pub fn rocket_of(index: u32) -> u32 {
    index / ROCKET_SIZE
}

/// Per-rocket constants derived from the rocket index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rocket {
    /// Fraction of the lifespan this rocket runs ahead of the global clock.
    pub phase_offset: f32,
    pub launch_pad: Vec3,
    /// Unit launch direction, tilted from +Y by at most the spread.
    pub direction: Vec3,
    /// Fraction between min and max initial speed.
    pub speed_t: f32,
    pub color: Vec3,
}

impl Rocket {
    pub fn from_index(rocket: u32, spread_degrees: f32) -> Self {
        let r = |k| rand01(rocket_seed(rocket, k));

        let pad_angle = r(1) * TAU;
        let pad_radius = 5.0 + 3.0 * r(2);
        let launch_pad = Vec3::new(pad_radius * pad_angle.cos(), 0.0, pad_radius * pad_angle.sin());

        let tilt = (r(4) * spread_degrees).to_radians();
        let azimuth = r(5) * TAU;
        let direction = Vec3::new(
            tilt.sin() * azimuth.cos(),
            tilt.cos(),
            tilt.sin() * azimuth.sin(),
        );

        let hue = r(6);
        let color = Vec3::new(
            0.5 + 0.5 * (TAU * hue).cos(),
            0.5 + 0.5 * (TAU * (hue + 0.33)).cos(),
            0.5 + 0.5 * (TAU * (hue + 0.67)).cos(),
        );

        Self { phase_offset: r(0), launch_pad, direction, speed_t: r(3), color }
    }
}

/// Uniformly distributed unit vector for the burst of particle `index`.
pub fn burst_direction(index: u32) -> Vec3 {
    let z = rand01(particle_seed(index, 0)) * 2.0 - 1.0;
    let phi = rand01(particle_seed(index, 1)) * TAU;
    let s = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(s * phi.cos(), z, s * phi.sin())
}
