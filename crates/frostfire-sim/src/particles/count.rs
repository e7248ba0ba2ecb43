use std::fmt;

use crate::error::ParticleCountError;

/// Compute workgroup width of `fireworks.wgsl`.
pub const WORKGROUP_SIZE: u32 = 256;

/// Number of simulated particles.
///
/// Always a power of two in `[MIN, MAX]`, so `count / WORKGROUP_SIZE`
/// workgroups cover it without a tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticleCount(u32);

impl ParticleCount {
    pub const MIN: Self = Self(WORKGROUP_SIZE);
    pub const MAX: Self = Self(131_072);

    pub fn new(count: u32) -> Result<Self, ParticleCountError> {
        if count < Self::MIN.0 {
            return Err(ParticleCountError::BelowMinimum { count, min: Self::MIN.0 });
        }
        if count > Self::MAX.0 {
            return Err(ParticleCountError::AboveCapacity { count, capacity: Self::MAX.0 });
        }
        if !count.is_power_of_two() {
            return Err(ParticleCountError::NotPowerOfTwo(count));
        }
        Ok(Self(count))
    }

    /// Builds a count from its base-two exponent, clamped into range.
    pub fn from_exponent(exp: u32) -> Self {
        let exp = exp.clamp(Self::MIN.exponent(), Self::MAX.exponent());
        Self(1 << exp)
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn workgroups(self) -> u32 {
        self.0 / WORKGROUP_SIZE
    }

    #[inline]
    pub fn exponent(self) -> u32 {
        self.0.trailing_zeros()
    }

    pub fn step_up(self) -> Self {
        Self((self.0 << 1).min(Self::MAX.0))
    }

    pub fn step_down(self) -> Self {
        Self((self.0 >> 1).max(Self::MIN.0))
    }
}

impl Default for ParticleCount {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for ParticleCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for ParticleCount {
    type Error = ParticleCountError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── validation ────────────────────────────────────────────────────────

    #[test]
    fn accepts_powers_of_two_in_range() {
        for exp in 8..=17 {
            let c = ParticleCount::new(1 << exp).unwrap();
            assert_eq!(c.exponent(), exp);
            assert_eq!(c.workgroups() * WORKGROUP_SIZE, c.get());
        }
    }

    #[test]
    fn rejects_non_power_of_two() {
        assert_eq!(ParticleCount::new(300), Err(ParticleCountError::NotPowerOfTwo(300)));
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(ParticleCount::new(128), Err(ParticleCountError::BelowMinimum { .. })));
        assert!(matches!(
            ParticleCount::new(262_144),
            Err(ParticleCountError::AboveCapacity { capacity: 131_072, .. })
        ));
    }

    // ── stepping ──────────────────────────────────────────────────────────

    #[test]
    fn step_saturates_at_bounds() {
        assert_eq!(ParticleCount::MAX.step_up(), ParticleCount::MAX);
        assert_eq!(ParticleCount::MIN.step_down(), ParticleCount::MIN);
        assert_eq!(ParticleCount::MIN.step_up().get(), 512);
    }

    #[test]
    fn from_exponent_clamps() {
        assert_eq!(ParticleCount::from_exponent(3), ParticleCount::MIN);
        assert_eq!(ParticleCount::from_exponent(40), ParticleCount::MAX);
        assert_eq!(ParticleCount::from_exponent(10).get(), 1024);
    }
}
