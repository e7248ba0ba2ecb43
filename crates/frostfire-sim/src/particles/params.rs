use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Simulation parameters for the firework integrator.
///
/// All durations are in seconds and measured from the start of a particle's
/// lifespan cycle unless stated otherwise. Edits to any field except
/// `particle_size` invalidate the running simulation; callers signal that
/// through [`ParticleController::invalidate`](super::ParticleController::invalidate).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireworkParams {
    /// Vertical acceleration (negative pulls down).
    pub gravity: f32,
    /// World-space size of a fully lit particle sprite.
    pub particle_size: f32,
    /// Length of one launch → fade cycle.
    pub lifespan: f32,
    pub min_initial_velocity: f32,
    pub max_initial_velocity: f32,
    /// Duration of the launch phase.
    pub init_delay: f32,
    /// Coasting time between the end of launch and the burst.
    pub explosion_delay: f32,
    /// Window during which burst force is applied, tapering to zero.
    pub explosion_thrust_time: f32,
    pub explosion_force: f32,
    /// Time after the burst before sprites grow to full size.
    pub explosion_light_delay: f32,
    /// Cycle age at which alpha starts to fall.
    pub fade_delay: f32,
    /// Time for alpha to fall from one to zero.
    pub fade_time: f32,
    /// Maximum tilt of a launch direction away from vertical, in degrees.
    pub rocket_spread: f32,
}

/// GPU layout of [`FireworkParams`] (std140-compatible, 80 bytes).
///
/// Field order must match `struct Params` in `fireworks.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct FireworkUniform {
    pub elapsed: f32,
    pub dt: f32,
    pub particle_count: u32,
    pub _pad0: u32,
    pub gravity: f32,
    pub particle_size: f32,
    pub lifespan: f32,
    pub min_initial_velocity: f32,
    pub max_initial_velocity: f32,
    pub init_delay: f32,
    pub explosion_delay: f32,
    pub explosion_thrust_time: f32,
    pub explosion_force: f32,
    pub explosion_light_delay: f32,
    pub fade_delay: f32,
    pub fade_time: f32,
    pub rocket_spread: f32,
    pub _pad1: [f32; 3],
}

impl Default for FireworkParams {
    fn default() -> Self {
        Self {
            gravity: -9.81,
            particle_size: 0.2,
            lifespan: 5.0,
            min_initial_velocity: 14.0,
            max_initial_velocity: 16.0,
            init_delay: 0.1,
            explosion_delay: 0.9,
            explosion_thrust_time: 0.33,
            explosion_force: 10.0,
            explosion_light_delay: 0.1,
            fade_delay: 0.35,
            fade_time: 3.0,
            rocket_spread: 3.0,
        }
    }
}

impl FireworkParams {
    /// Clamps every delay to the lifespan after the lifespan was shortened.
    pub fn clamp_to_lifespan(&mut self) {
        let l = self.lifespan;
        self.init_delay = self.init_delay.min(l);
        self.explosion_delay = self.explosion_delay.min(l);
        self.explosion_thrust_time = self.explosion_thrust_time.min(l);
        self.fade_delay = self.fade_delay.min(l);
        self.fade_time = self.fade_time.min(l);
    }

    /// Sets the minimum launch speed, dragging the maximum along if needed.
    pub fn set_min_initial_velocity(&mut self, v: f32) {
        self.min_initial_velocity = v;
        self.max_initial_velocity = self.max_initial_velocity.max(v);
    }

    /// Sets the maximum launch speed, dragging the minimum along if needed.
    pub fn set_max_initial_velocity(&mut self, v: f32) {
        self.max_initial_velocity = v;
        self.min_initial_velocity = self.min_initial_velocity.min(v);
    }

    /// Packs the parameters plus per-step timing into the uniform block read by
    /// `fireworks.wgsl`.
    pub fn to_uniform(&self, particle_count: u32, elapsed: f32, dt: f32) -> FireworkUniform {
        FireworkUniform {
            elapsed,
            dt,
            particle_count,
            _pad0: 0,
            gravity: self.gravity,
            particle_size: self.particle_size,
            lifespan: self.lifespan,
            min_initial_velocity: self.min_initial_velocity,
            max_initial_velocity: self.max_initial_velocity,
            init_delay: self.init_delay,
            explosion_delay: self.explosion_delay,
            explosion_thrust_time: self.explosion_thrust_time,
            explosion_force: self.explosion_force,
            explosion_light_delay: self.explosion_light_delay,
            fade_delay: self.fade_delay,
            fade_time: self.fade_time,
            rocket_spread: self.rocket_spread,
            _pad1: [0.0; 3],
        }
    }

    /// Clamps every field into the range the key bindings can reach.
    pub fn sanitized(mut self) -> Self {
        self.particle_size = self.particle_size.clamp(0.05, 0.5);
        self.lifespan = self.lifespan.clamp(1.0, 10.0);
        self.rocket_spread = self.rocket_spread.clamp(0.0, 20.0);
        self.min_initial_velocity = self.min_initial_velocity.clamp(5.0, 20.0);
        self.max_initial_velocity = self.max_initial_velocity.clamp(self.min_initial_velocity, 20.0);
        self.init_delay = self.init_delay.max(0.05);
        self.explosion_force = self.explosion_force.clamp(1.0, 20.0);
        self.explosion_light_delay = self.explosion_light_delay.clamp(0.0, 1.0);
        self.explosion_delay = self.explosion_delay.max(0.0);
        self.explosion_thrust_time = self.explosion_thrust_time.max(0.0);
        self.fade_delay = self.fade_delay.max(0.0);
        self.fade_time = self.fade_time.max(0.0);
        self.clamp_to_lifespan();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_to_lifespan_shortens_long_delays() {
        let mut p = FireworkParams { fade_time: 3.0, lifespan: 2.0, ..Default::default() };
        p.clamp_to_lifespan();
        assert_eq!(p.fade_time, 2.0);
        assert_eq!(p.init_delay, 0.1);
    }

    #[test]
    fn velocity_setters_keep_min_below_max() {
        let mut p = FireworkParams::default();
        p.set_min_initial_velocity(18.0);
        assert_eq!(p.max_initial_velocity, 18.0);
        p.set_max_initial_velocity(10.0);
        assert_eq!(p.min_initial_velocity, 10.0);
    }

    #[test]
    fn sanitized_default_is_identity() {
        assert_eq!(FireworkParams::default().sanitized(), FireworkParams::default());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let p: FireworkParams = serde_json::from_str(r#"{ "gravity": -3.0 }"#).unwrap();
        assert_eq!(p.gravity, -3.0);
        assert_eq!(p.lifespan, 5.0);
    }

    #[test]
    fn uniform_carries_every_field_in_order() {
        let p = FireworkParams::default();
        let u = p.to_uniform(1024, 2.5, 1.0 / 60.0);
        assert_eq!(u.particle_count, 1024);
        assert_eq!(u.elapsed, 2.5);
        assert_eq!(u.gravity, p.gravity);
        assert_eq!(u.rocket_spread, p.rocket_spread);
        assert_eq!(std::mem::size_of::<FireworkUniform>() % 16, 0);
    }
}
