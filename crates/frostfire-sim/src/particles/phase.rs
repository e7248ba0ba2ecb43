use super::FireworkParams;

/// Lifecycle stage of a particle, stored as a tag in `velocity.w`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u32)]
pub enum Phase {
    /// Neutral state after a reset; waits for its rocket's next launch.
    Unlaunched = 0,
    Launch = 1,
    /// Coasting rocket followed by the tapering burst force.
    Thrust = 2,
    /// Past thrust, before `fade_delay` (only when the delay outlasts thrust).
    Drift = 3,
    /// Past thrust and past `fade_delay`.
    Fade = 4,
}

impl Phase {
    pub fn tag(self) -> f32 {
        self as u32 as f32
    }

    pub fn from_tag(tag: f32) -> Self {
        match tag.round() as i32 {
            1 => Phase::Launch,
            2 => Phase::Thrust,
            3 => Phase::Drift,
            4 => Phase::Fade,
            _ => Phase::Unlaunched,
        }
    }

    /// `true` when moving from `prev` into `self` places the particle back on
    /// its launch pad.
    pub fn relaunches_from(self, prev: Phase) -> bool {
        match (prev, self) {
            (_, Phase::Unlaunched) => false,
            (Phase::Unlaunched, next) => next == Phase::Launch,
            (prev, Phase::Launch) => prev != Phase::Launch,
            (prev, next) => next < prev,
        }
    }
}

/// Absolute phase boundaries within one lifespan cycle.
///
/// Fading runs on its own clock: alpha starts to drop at `fade_delay` even
/// while a rocket still launches or bursts. The motion phases win when
/// tagging, so [`Phase::Fade`] is reported once thrust has ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseTimeline {
    pub launch_end: f32,
    pub explosion: f32,
    pub thrust_end: f32,
    pub fade_start: f32,
}

impl PhaseTimeline {
    pub fn new(p: &FireworkParams) -> Self {
        let launch_end = p.init_delay;
        let explosion = launch_end + p.explosion_delay;
        let thrust_end = explosion + p.explosion_thrust_time;
        Self { launch_end, explosion, thrust_end, fade_start: p.fade_delay }
    }

    pub fn phase(&self, age: f32) -> Phase {
        if age < self.launch_end {
            Phase::Launch
        } else if age < self.thrust_end {
            Phase::Thrust
        } else if age < self.fade_start {
            Phase::Drift
        } else {
            Phase::Fade
        }
    }
}

/// Phase of a particle whose cycle age is `age`.
pub fn phase_at(age: f32, params: &FireworkParams) -> Phase {
    PhaseTimeline::new(params).phase(age)
}

/// Cycle age for a rocket offset (fraction of the lifespan) at `elapsed`.
pub fn cycle_age(elapsed: f32, offset_fraction: f32, lifespan: f32) -> f32 {
    if lifespan <= 0.0 {
        return 0.0;
    }
    (elapsed + offset_fraction * lifespan).rem_euclid(lifespan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> FireworkParams {
        FireworkParams::default()
    }

    // ── phase boundaries ──────────────────────────────────────────────────

    #[test]
    fn default_timeline() {
        let t = PhaseTimeline::new(&params());
        assert!((t.explosion - 1.0).abs() < 1e-6);
        assert!((t.thrust_end - 1.33).abs() < 1e-5);
        assert!((t.fade_start - 0.35).abs() < 1e-6);
    }

    #[test]
    fn phases_in_order() {
        let p = params();
        assert_eq!(phase_at(0.0, &p), Phase::Launch);
        assert_eq!(phase_at(0.5, &p), Phase::Thrust);
        assert_eq!(phase_at(1.2, &p), Phase::Thrust);
        assert_eq!(phase_at(1.5, &p), Phase::Fade);
        assert_eq!(phase_at(4.9, &p), Phase::Fade);
    }

    #[test]
    fn fade_starts_at_fade_delay_not_after_thrust() {
        let p = FireworkParams { fade_delay: 0.35, ..params() };
        assert_eq!(PhaseTimeline::new(&p).fade_start, 0.35);
        // Already fading, but still bursting.
        assert_eq!(phase_at(1.0, &p), Phase::Thrust);
    }

    #[test]
    fn drift_only_when_delay_outlasts_thrust() {
        let p = FireworkParams { fade_delay: 2.0, ..params() };
        assert_eq!(phase_at(1.5, &p), Phase::Drift);
        assert_eq!(phase_at(2.0, &p), Phase::Fade);
    }

    // ── relaunch rule ─────────────────────────────────────────────────────

    #[test]
    fn relaunch_on_cycle_wrap() {
        assert!(Phase::Launch.relaunches_from(Phase::Fade));
        assert!(Phase::Launch.relaunches_from(Phase::Unlaunched));
        assert!(!Phase::Launch.relaunches_from(Phase::Launch));
        assert!(!Phase::Fade.relaunches_from(Phase::Drift));
    }

    #[test]
    fn skipped_launch_still_relaunches() {
        // A large step can jump from Fade straight into Thrust.
        assert!(Phase::Thrust.relaunches_from(Phase::Fade));
        assert!(!Phase::Thrust.relaunches_from(Phase::Unlaunched));
    }

    #[test]
    fn tag_round_trip() {
        for p in [Phase::Unlaunched, Phase::Launch, Phase::Thrust, Phase::Drift, Phase::Fade] {
            assert_eq!(Phase::from_tag(p.tag()), p);
        }
    }

    #[test]
    fn cycle_age_wraps() {
        assert!((cycle_age(6.0, 0.0, 5.0) - 1.0).abs() < 1e-6);
        assert!((cycle_age(4.0, 0.4, 5.0) - 1.0).abs() < 1e-5);
        assert_eq!(cycle_age(3.0, 0.5, 0.0), 0.0);
    }
}
