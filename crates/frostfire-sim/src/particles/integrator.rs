use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

use super::hash::{burst_direction, rocket_of, Rocket};
use super::phase::{cycle_age, Phase, PhaseTimeline};
use super::{FireworkParams, ParticleCount};

/// One particle as laid out in the GPU storage buffer (48 bytes).
///
/// - `position.w`: sprite size factor (0 hides the particle)
/// - `velocity.w`: [`Phase`] tag of the previous step
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ParticleState {
    pub position: Vec4,
    pub velocity: Vec4,
    pub color: Vec4,
}

impl ParticleState {
    /// State every particle returns to on reset.
    pub const fn neutral() -> Self {
        Self { position: Vec4::ZERO, velocity: Vec4::ZERO, color: Vec4::ONE }
    }

    pub fn phase(&self) -> Phase {
        Phase::from_tag(self.velocity.w)
    }

    pub fn is_visible(&self) -> bool {
        self.position.w > 0.0 && self.color.w > 0.0
    }
}

impl Default for ParticleState {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Advances particle `index` by `dt`, with `elapsed` the global clock after the step.
///
/// Mirrors `main` in `fireworks.wgsl`.
pub fn advance(index: u32, prev: ParticleState, elapsed: f32, dt: f32, params: &FireworkParams) -> ParticleState {
    let rocket = Rocket::from_index(rocket_of(index), params.rocket_spread);
    let timeline = PhaseTimeline::new(params);
    let age = cycle_age(elapsed, rocket.phase_offset, params.lifespan);
    let phase = timeline.phase(age);
    let prev_phase = prev.phase();

    if prev_phase == Phase::Unlaunched && phase != Phase::Launch {
        return prev;
    }

    let mut pos = prev.position.truncate();
    let mut vel = prev.velocity.truncate();
    let mut rgb = prev.color.truncate();

    if phase.relaunches_from(prev_phase) {
        let speed = params.min_initial_velocity
            + (params.max_initial_velocity - params.min_initial_velocity) * rocket.speed_t;
        pos = rocket.launch_pad;
        vel = rocket.direction * speed;
        rgb = rocket.color;
    }

    vel.y += params.gravity * dt;

    if phase == Phase::Thrust && age >= timeline.explosion && params.explosion_thrust_time > 0.0 {
        let t = age - timeline.explosion;
        let taper = (1.0 - t / params.explosion_thrust_time).max(0.0);
        vel += burst_direction(index) * (params.explosion_force * taper * dt);
    }

    pos += vel * dt;

    let size = if age >= timeline.explosion + params.explosion_light_delay { 1.0 } else { 0.5 };
    let alpha = fade_alpha(age, timeline.fade_start, params.fade_time);

    ParticleState {
        position: pos.extend(size),
        velocity: vel.extend(phase.tag()),
        color: rgb.extend(alpha),
    }
}

fn fade_alpha(age: f32, fade_start: f32, fade_time: f32) -> f32 {
    if age < fade_start {
        1.0
    } else if fade_time > 0.0 {
        (1.0 - (age - fade_start) / fade_time).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Host-side reference integrator.
///
/// Holds the full capacity; only the active prefix is stepped.
pub struct CpuIntegrator {
    states: Vec<ParticleState>,
    active: ParticleCount,
}

impl CpuIntegrator {
    pub fn new(capacity: ParticleCount) -> Self {
        Self { states: vec![ParticleState::neutral(); capacity.as_usize()], active: capacity }
    }

    pub fn capacity(&self) -> usize {
        self.states.len()
    }

    pub fn active(&self) -> ParticleCount {
        self.active
    }

    /// Returns every particle to the neutral state and sets the active count.
    ///
    /// The whole capacity is cleared so stale particles beyond the active
    /// prefix never reappear after a later count increase.
    pub fn reset(&mut self, active: ParticleCount) {
        self.states.fill(ParticleState::neutral());
        self.active = active.min(self.capacity_count());
    }

    pub fn step(&mut self, elapsed: f32, dt: f32, params: &FireworkParams) {
        let n = self.active.as_usize();
        for (i, s) in self.states[..n].iter_mut().enumerate() {
            *s = advance(i as u32, *s, elapsed, dt, params);
        }
    }

    /// Active prefix.
    pub fn states(&self) -> &[ParticleState] {
        &self.states[..self.active.as_usize()]
    }

    fn capacity_count(&self) -> ParticleCount {
        ParticleCount::from_exponent(self.states.len().trailing_zeros())
    }
}

/// World position of a particle's launch pad; used by the demo to place markers.
pub fn launch_pad(index: u32, params: &FireworkParams) -> Vec3 {
    Rocket::from_index(rocket_of(index), params.rocket_spread).launch_pad
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::ROCKET_SIZE;

    const DT: f32 = 1.0 / 120.0;

    fn count(n: u32) -> ParticleCount {
        ParticleCount::new(n).unwrap()
    }

    /// Runs `steps` steps of `DT` starting at elapsed 0.
    fn run(sim: &mut CpuIntegrator, params: &FireworkParams, steps: usize) -> f32 {
        let mut elapsed = 0.0;
        for _ in 0..steps {
            elapsed += DT;
            sim.step(elapsed, DT, params);
        }
        elapsed
    }

    // ── reset ─────────────────────────────────────────────────────────────

    #[test]
    fn reset_neutralizes_whole_capacity() {
        let params = FireworkParams::default();
        let mut sim = CpuIntegrator::new(count(1024));
        run(&mut sim, &params, 600);
        assert!(sim.states().iter().any(|s| s.phase() != Phase::Unlaunched));

        sim.reset(count(256));
        assert_eq!(sim.states().len(), 256);
        assert!(sim.states.iter().all(|s| *s == ParticleState::neutral()));
    }

    #[test]
    fn count_changes_reinitialize_every_time() {
        let params = FireworkParams::default();
        let mut sim = CpuIntegrator::new(ParticleCount::MAX);
        for n in [256, 1024, 256] {
            sim.reset(count(n));
            assert!(sim.states().iter().all(|s| *s == ParticleState::neutral()));
            run(&mut sim, &params, 240);
            assert_eq!(sim.states().len(), n as usize);
        }
    }

    #[test]
    fn reset_clamps_to_capacity() {
        let mut sim = CpuIntegrator::new(count(512));
        sim.reset(count(4096));
        assert_eq!(sim.states().len(), 512);
    }

    // ── phase policy ──────────────────────────────────────────────────────

    #[test]
    fn unlaunched_particles_wait_for_launch() {
        let params = FireworkParams::default();
        let waiting = (0..64u32)
            .find(|&r| {
                let offset = Rocket::from_index(r, params.rocket_spread).phase_offset;
                cycle_age(0.5, offset, params.lifespan) >= params.init_delay
            })
            .unwrap();
        let p = advance(waiting * ROCKET_SIZE, ParticleState::neutral(), 0.5, DT, &params);
        assert_eq!(p, ParticleState::neutral());
        assert!(!p.is_visible());
    }

    #[test]
    fn launch_places_particle_on_pad_with_rocket_velocity() {
        let params = FireworkParams::default();
        // Choose elapsed so rocket 0 is at the start of its launch window.
        let rocket = Rocket::from_index(0, params.rocket_spread);
        let elapsed = params.lifespan * (1.0 - rocket.phase_offset) + 0.01;
        let s = advance(0, ParticleState::neutral(), elapsed, DT, &params);
        assert_eq!(s.phase(), Phase::Launch);
        assert!((s.position.truncate() - rocket.launch_pad).length() < 0.5);
        assert_eq!(s.position.w, 0.5);

        // Siblings share the launch velocity exactly.
        let t = advance(ROCKET_SIZE - 1, ParticleState::neutral(), elapsed, DT, &params);
        assert_eq!(s.velocity, t.velocity);
    }

    #[test]
    fn launch_speed_within_bounds() {
        let params = FireworkParams { gravity: 0.0, ..Default::default() };
        for r in 0..32u32 {
            let rocket = Rocket::from_index(r, params.rocket_spread);
            let elapsed = params.lifespan * (1.0 - rocket.phase_offset) + 0.01;
            let s = advance(r * ROCKET_SIZE, ParticleState::neutral(), elapsed, DT, &params);
            let speed = s.velocity.truncate().length();
            assert!(speed >= params.min_initial_velocity - 1e-3);
            assert!(speed <= params.max_initial_velocity + 1e-3);
        }
    }

    #[test]
    fn burst_spreads_particles_of_one_rocket() {
        let params = FireworkParams::default();
        let mut sim = CpuIntegrator::new(count(256));
        sim.reset(count(256));
        // Two full cycles guarantee every rocket launched and burst at least once.
        let mut elapsed = 0.0;
        let mut max_spread: f32 = 0.0;
        while elapsed < 2.0 * params.lifespan {
            elapsed += DT;
            sim.step(elapsed, DT, &params);
            let s = sim.states();
            if s[0].phase() >= Phase::Drift && s[1].phase() >= Phase::Drift {
                max_spread = max_spread.max((s[0].position - s[1].position).truncate().length());
            }
        }
        assert!(max_spread > 0.1, "rocket 0 never burst apart ({max_spread})");
    }

    #[test]
    fn fade_reaches_zero_alpha() {
        assert_eq!(fade_alpha(1.0, 2.0, 3.0), 1.0);
        assert!((fade_alpha(3.5, 2.0, 3.0) - 0.5).abs() < 1e-6);
        assert_eq!(fade_alpha(9.0, 2.0, 3.0), 0.0);
        assert_eq!(fade_alpha(2.0, 2.0, 0.0), 0.0);
    }

    #[test]
    fn alpha_drops_from_fade_delay_during_the_burst() {
        let params = FireworkParams::default();
        let rocket = Rocket::from_index(0, params.rocket_spread);
        let at_age = |age: f32| params.lifespan * (1.0 - rocket.phase_offset) + age;

        let launched = advance(0, ParticleState::neutral(), at_age(0.05), DT, &params);
        assert_eq!(launched.phase(), Phase::Launch);
        assert_eq!(launched.color.w, 1.0);

        let early = advance(0, launched, at_age(0.3), DT, &params);
        assert_eq!(early.color.w, 1.0);

        let bursting = advance(0, early, at_age(1.0), DT, &params);
        assert_eq!(bursting.phase(), Phase::Thrust);
        let expected = 1.0 - (1.0 - params.fade_delay) / params.fade_time;
        assert!((bursting.color.w - expected).abs() < 1e-3, "alpha {}", bursting.color.w);
    }

    // ── continuity ────────────────────────────────────────────────────────

    #[test]
    fn positions_are_continuous_except_at_launch() {
        let params = FireworkParams::default();
        let mut sim = CpuIntegrator::new(count(256));
        sim.reset(count(256));
        let mut elapsed = 0.0;
        let mut prev: Vec<ParticleState> = sim.states().to_vec();
        // Max per-step travel: launch speed plus gravity and thrust headroom.
        let bound = (params.max_initial_velocity + params.explosion_force + 20.0) * DT;
        for _ in 0..(params.lifespan / DT) as usize * 2 {
            elapsed += DT;
            sim.step(elapsed, DT, &params);
            for (a, b) in prev.iter().zip(sim.states()) {
                if b.phase().relaunches_from(a.phase()) || b.phase() == Phase::Unlaunched {
                    continue;
                }
                let jump = (b.position.truncate() - a.position.truncate()).length();
                assert!(jump <= bound, "jump {jump} > {bound}");
            }
            prev.copy_from_slice(sim.states());
        }
    }
}
