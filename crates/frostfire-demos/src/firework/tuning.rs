use frostfire_sim::particles::FireworkParams;

/// Firework parameter, cycled with Left/Right and nudged with Up/Down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tunable {
    Gravity,
    ParticleSize,
    Lifespan,
    MinVelocity,
    MaxVelocity,
    InitDelay,
    ExplosionDelay,
    ThrustTime,
    ExplosionForce,
    LightDelay,
    FadeDelay,
    FadeTime,
    RocketSpread,
}

impl Tunable {
    pub const ALL: [Tunable; 13] = [
        Tunable::Gravity,
        Tunable::ParticleSize,
        Tunable::Lifespan,
        Tunable::MinVelocity,
        Tunable::MaxVelocity,
        Tunable::InitDelay,
        Tunable::ExplosionDelay,
        Tunable::ThrustTime,
        Tunable::ExplosionForce,
        Tunable::LightDelay,
        Tunable::FadeDelay,
        Tunable::FadeTime,
        Tunable::RocketSpread,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tunable::Gravity => "gravity",
            Tunable::ParticleSize => "particle size",
            Tunable::Lifespan => "lifespan",
            Tunable::MinVelocity => "min initial velocity",
            Tunable::MaxVelocity => "max initial velocity",
            Tunable::InitDelay => "init delay",
            Tunable::ExplosionDelay => "explosion delay",
            Tunable::ThrustTime => "explosion thrust time",
            Tunable::ExplosionForce => "explosion force",
            Tunable::LightDelay => "explosion light delay",
            Tunable::FadeDelay => "fade delay",
            Tunable::FadeTime => "fade time",
            Tunable::RocketSpread => "rocket spread",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|&t| t == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|&t| t == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// `false` for draw-only values; everything else invalidates running particles.
    pub fn restarts_simulation(self) -> bool {
        self != Tunable::ParticleSize
    }

    fn step(self) -> f32 {
        match self {
            Tunable::ParticleSize => 0.01,
            Tunable::Gravity | Tunable::Lifespan | Tunable::MinVelocity | Tunable::MaxVelocity => 0.5,
            Tunable::ExplosionForce | Tunable::RocketSpread => 1.0,
            _ => 0.05,
        }
    }

    pub fn get(self, p: &FireworkParams) -> f32 {
        match self {
            Tunable::Gravity => p.gravity,
            Tunable::ParticleSize => p.particle_size,
            Tunable::Lifespan => p.lifespan,
            Tunable::MinVelocity => p.min_initial_velocity,
            Tunable::MaxVelocity => p.max_initial_velocity,
            Tunable::InitDelay => p.init_delay,
            Tunable::ExplosionDelay => p.explosion_delay,
            Tunable::ThrustTime => p.explosion_thrust_time,
            Tunable::ExplosionForce => p.explosion_force,
            Tunable::LightDelay => p.explosion_light_delay,
            Tunable::FadeDelay => p.fade_delay,
            Tunable::FadeTime => p.fade_time,
            Tunable::RocketSpread => p.rocket_spread,
        }
    }

    /// Moves the value `steps` increments and re-clamps the whole set.
    pub fn nudge(self, params: &FireworkParams, steps: f32) -> FireworkParams {
        let mut p = *params;
        let v = self.get(&p) + steps * self.step();
        match self {
            Tunable::Gravity => p.gravity = v,
            Tunable::ParticleSize => p.particle_size = v,
            Tunable::Lifespan => p.lifespan = v,
            Tunable::MinVelocity => p.set_min_initial_velocity(v),
            Tunable::MaxVelocity => p.set_max_initial_velocity(v),
            Tunable::InitDelay => p.init_delay = v,
            Tunable::ExplosionDelay => p.explosion_delay = v,
            Tunable::ThrustTime => p.explosion_thrust_time = v,
            Tunable::ExplosionForce => p.explosion_force = v,
            Tunable::LightDelay => p.explosion_light_delay = v,
            Tunable::FadeDelay => p.fade_delay = v,
            Tunable::FadeTime => p.fade_time = v,
            Tunable::RocketSpread => p.rocket_spread = v,
        }
        p.sanitized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_wraps_both_ways() {
        assert_eq!(Tunable::RocketSpread.next(), Tunable::Gravity);
        assert_eq!(Tunable::Gravity.prev(), Tunable::RocketSpread);
    }

    #[test]
    fn only_particle_size_is_draw_only() {
        assert!(!Tunable::ParticleSize.restarts_simulation());
        assert!(Tunable::ALL.iter().filter(|t| !t.restarts_simulation()).count() == 1);
    }

    #[test]
    fn nudge_moves_only_the_selected_value() {
        let p = FireworkParams::default();
        let q = Tunable::ExplosionForce.nudge(&p, 2.0);
        assert_eq!(q.explosion_force, 12.0);
        assert_eq!(q.gravity, p.gravity);
    }

    #[test]
    fn nudge_respects_ranges() {
        let p = FireworkParams::default();
        assert_eq!(Tunable::ExplosionForce.nudge(&p, 100.0).explosion_force, 20.0);
        assert_eq!(Tunable::Lifespan.nudge(&p, -100.0).lifespan, 1.0);
    }

    #[test]
    fn shorter_lifespan_clamps_delays() {
        let p = FireworkParams::default();
        let q = Tunable::Lifespan.nudge(&p, -6.0);
        assert_eq!(q.lifespan, 2.0);
        assert_eq!(q.fade_time, 2.0);
    }

    #[test]
    fn min_velocity_drags_max() {
        let p = FireworkParams::default();
        let q = Tunable::MinVelocity.nudge(&p, 8.0);
        assert_eq!(q.min_initial_velocity, 18.0);
        assert_eq!(q.max_initial_velocity, 18.0);
    }
}
