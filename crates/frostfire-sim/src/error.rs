use thiserror::Error;

/// Rejected particle counts.
///
/// The integrator dispatches `count / WORKGROUP_SIZE` groups, so only powers
/// of two inside the allocated capacity are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParticleCountError {
    #[error("particle count {0} is not a power of two")]
    NotPowerOfTwo(u32),
    #[error("particle count {count} is below the minimum of {min}")]
    BelowMinimum { count: u32, min: u32 },
    #[error("particle count {count} exceeds the allocated capacity of {capacity}")]
    AboveCapacity { count: u32, capacity: u32 },
}

/// Layout generation failures.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LayoutError {
    /// Rejection sampling ran out of attempts before placing every instance.
    #[error("placed only {placed} of {requested} instances after {attempts} attempts (gap {gap})")]
    Exhausted {
        placed: usize,
        requested: usize,
        attempts: usize,
        gap: f32,
    },
    /// The sampling area is empty or inverted.
    #[error("sampling area is degenerate")]
    DegenerateArea,
}
