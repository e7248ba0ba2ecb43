use super::{FireworkParams, ParticleCount};

/// What the host must do for the coming simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPlan {
    /// Particle buffers must be returned to the neutral state first.
    pub reset: bool,
    pub count: ParticleCount,
    /// Global clock value the step integrates up to.
    pub elapsed: f32,
    pub dt: f32,
}

/// Tracks the simulation clock and decides when particle state is reset.
///
/// A reset happens on the first step, whenever the active count changes, and
/// whenever parameters were edited ([`invalidate`](Self::invalidate)). The
/// clock then restarts at zero.
#[derive(Debug, Clone)]
pub struct ParticleController {
    active: ParticleCount,
    desired: ParticleCount,
    elapsed: f32,
    reset_pending: bool,
}

impl ParticleController {
    pub fn new(count: ParticleCount) -> Self {
        Self { active: count, desired: count, elapsed: 0.0, reset_pending: true }
    }

    pub fn active(&self) -> ParticleCount {
        self.active
    }

    pub fn desired(&self) -> ParticleCount {
        self.desired
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Requests a new count; applied (with a reset) on the next step.
    pub fn set_desired(&mut self, count: ParticleCount) {
        self.desired = count;
    }

    /// Marks the running simulation stale after a parameter edit.
    pub fn invalidate(&mut self) {
        self.reset_pending = true;
    }

    pub fn begin_step(&mut self, dt: f32, params: &FireworkParams) -> StepPlan {
        let mut reset = std::mem::take(&mut self.reset_pending);

        if self.desired != self.active {
            log::info!("particle count {} -> {}", self.active, self.desired);
            self.active = self.desired;
            reset = true;
        }

        if reset {
            log::debug!("particle reset ({} active)", self.active);
            self.elapsed = 0.0;
        } else {
            self.elapsed += dt;
            // Ages are taken modulo the lifespan, so wrapping keeps precision
            // without changing any phase.
            if params.lifespan > 0.0 {
                self.elapsed = self.elapsed.rem_euclid(params.lifespan);
            }
        }

        StepPlan { reset, count: self.active, elapsed: self.elapsed, dt }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::{CpuIntegrator, ParticleState};

    fn count(n: u32) -> ParticleCount {
        ParticleCount::new(n).unwrap()
    }

    // ── reset triggers ────────────────────────────────────────────────────

    #[test]
    fn first_step_resets() {
        let mut c = ParticleController::new(count(256));
        let p = FireworkParams::default();
        assert!(c.begin_step(0.1, &p).reset);
        assert!(!c.begin_step(0.1, &p).reset);
    }

    #[test]
    fn clock_advances_and_wraps() {
        let mut c = ParticleController::new(count(256));
        let p = FireworkParams { lifespan: 1.0, ..Default::default() };
        c.begin_step(0.1, &p);
        let mut last = 0.0;
        for _ in 0..15 {
            last = c.begin_step(0.1, &p).elapsed;
        }
        assert!((last - 0.5).abs() < 1e-4, "{last}");
    }

    #[test]
    fn invalidate_restarts_clock() {
        let mut c = ParticleController::new(count(256));
        let p = FireworkParams::default();
        c.begin_step(0.1, &p);
        c.begin_step(0.1, &p);
        c.invalidate();
        let plan = c.begin_step(0.1, &p);
        assert!(plan.reset);
        assert_eq!(plan.elapsed, 0.0);
    }

    // ── count changes ─────────────────────────────────────────────────────

    #[test]
    fn count_round_trip_resets_each_time() {
        let p = FireworkParams::default();
        let mut c = ParticleController::new(count(256));
        let mut sim = CpuIntegrator::new(ParticleCount::MAX);

        for n in [256, 1024, 256] {
            c.set_desired(count(n));
            let plan = c.begin_step(1.0 / 60.0, &p);
            assert!(plan.reset, "count {n} did not reset");
            assert_eq!(plan.count.get(), n);
            sim.reset(plan.count);
            assert!(sim.states().iter().all(|s| *s == ParticleState::neutral()));
            sim.step(plan.elapsed, plan.dt, &p);

            for _ in 0..30 {
                let plan = c.begin_step(1.0 / 60.0, &p);
                assert!(!plan.reset);
                sim.step(plan.elapsed, plan.dt, &p);
            }
        }
    }

    #[test]
    fn unchanged_desired_count_does_not_reset() {
        let p = FireworkParams::default();
        let mut c = ParticleController::new(count(512));
        c.begin_step(0.01, &p);
        c.set_desired(count(512));
        assert!(!c.begin_step(0.01, &p).reset);
    }
}
