use std::time::{Duration, Instant};

/// Longest step handed to the simulations. A debugger pause or a window drag
/// otherwise launches every particle at once.
const MAX_DT: Duration = Duration::from_millis(250);

/// Timing of one frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous frame, at most 0.25.
    pub dt: f32,
    /// Seconds since the clock started. Not clamped; schedules key off this.
    pub elapsed: f64,
    pub frame_index: u64,
}

impl FrameTime {
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed * 1000.0
    }
}

#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self { start: now, last: now, frames: 0 }
    }

    /// Call once per presented frame.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now.saturating_duration_since(self.last).min(MAX_DT);
        self.last = now;
        let frame_index = self.frames;
        self.frames += 1;
        FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start).as_secs_f64(),
            frame_index,
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
