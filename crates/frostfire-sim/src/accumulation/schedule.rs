/// Decides when the accumulation loop advances.
///
/// The quantum shrinks as more snow falls:
/// `100 ms / max(1, log2(snow_count) - 7)`. At most one tick fires per
/// [`poll`](Self::poll); a late frame catches up one quantum at a time.
#[derive(Debug, Clone)]
pub struct AccumulationSchedule {
    quantum_ms: f64,
    last_tick_ms: f64,
    ticks: u64,
}

impl AccumulationSchedule {
    pub fn new(snow_count: u32) -> Self {
        Self { quantum_ms: Self::quantum_for(snow_count), last_tick_ms: 0.0, ticks: 0 }
    }

    /// Whole powers of two only: counts between two powers share the lower
    /// one's quantum.
    pub fn quantum_for(snow_count: u32) -> f64 {
        let exp = snow_count.max(1).ilog2() as f64 - 7.0;
        100.0 / exp.max(1.0)
    }

    pub fn quantum_ms(&self) -> f64 {
        self.quantum_ms
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Returns `true` if the quantum changed.
    pub fn set_snow_count(&mut self, snow_count: u32) -> bool {
        let quantum = Self::quantum_for(snow_count);
        let changed = quantum != self.quantum_ms;
        self.quantum_ms = quantum;
        changed
    }

    /// Returns `true` when a tick is due at `now_ms`.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        if now_ms - self.last_tick_ms < self.quantum_ms {
            return false;
        }
        self.last_tick_ms += self.quantum_ms;
        self.ticks += 1;
        log::trace!("accumulation tick {} at {now_ms:.1} ms", self.ticks);
        true
    }

    /// Skips any backlog so the next tick is one quantum after `now_ms`.
    pub fn resync(&mut self, now_ms: f64) {
        self.last_tick_ms = now_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantum_scales_with_count() {
        assert_eq!(AccumulationSchedule::quantum_for(256), 100.0);
        assert_eq!(AccumulationSchedule::quantum_for(2048), 25.0);
        // Counts at or below 2^8 keep the full quantum.
        assert_eq!(AccumulationSchedule::quantum_for(16), 100.0);
        assert_eq!(AccumulationSchedule::quantum_for(0), 100.0);
    }

    #[test]
    fn quantum_steps_at_powers_of_two() {
        // 1000 sits between 2^9 and 2^10 and keeps the 2^9 quantum.
        assert_eq!(AccumulationSchedule::quantum_for(1000), 50.0);
        assert_eq!(AccumulationSchedule::quantum_for(1023), 50.0);
        assert_eq!(AccumulationSchedule::quantum_for(1024), 100.0 / 3.0);
        assert_eq!(AccumulationSchedule::quantum_for(300), 100.0);
    }

    #[test]
    fn at_most_one_tick_per_poll() {
        let mut s = AccumulationSchedule::new(2048);
        assert!(s.poll(1000.0));
        assert!(s.poll(1000.0));
        // Backlog drains one quantum per poll.
        let mut n = 2;
        while s.poll(1000.0) {
            n += 1;
        }
        assert_eq!(n, 40);
        assert!(!s.poll(1010.0));
        assert!(s.poll(1025.0));
    }

    #[test]
    fn resync_drops_backlog() {
        let mut s = AccumulationSchedule::new(256);
        s.resync(5000.0);
        assert!(!s.poll(5050.0));
        assert!(s.poll(5100.0));
        assert_eq!(s.ticks(), 1);
    }

    #[test]
    fn count_change_reports_new_quantum() {
        let mut s = AccumulationSchedule::new(256);
        assert!(!s.set_snow_count(128));
        assert!(s.set_snow_count(4096));
        assert_eq!(s.quantum_ms(), 20.0);
    }
}
