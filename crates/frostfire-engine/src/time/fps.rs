use std::time::Duration;

/// Averages over one reporting window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FpsReport {
    pub fps: f32,
    pub frame_ms: f32,
    /// Average GPU time per frame, if any frame reported one.
    pub gpu_ms: Option<f32>,
}

impl FpsReport {
    /// Compact form used in window titles.
    pub fn summary(&self) -> String {
        match self.gpu_ms {
            Some(gpu) => format!("{:.0} fps | cpu {:.2} ms | gpu {:.2} ms", self.fps, self.frame_ms, gpu),
            None => format!("{:.0} fps | cpu {:.2} ms", self.fps, self.frame_ms),
        }
    }
}

/// Accumulates frame times and emits a report once per window.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window: f32,
    acc: f32,
    frames: u32,
    gpu_acc: Duration,
    gpu_frames: u32,
}

impl FpsCounter {
    pub fn new(window_secs: f32) -> Self {
        Self { window: window_secs, acc: 0.0, frames: 0, gpu_acc: Duration::ZERO, gpu_frames: 0 }
    }

    pub fn record(&mut self, dt: f32, gpu: Option<Duration>) -> Option<FpsReport> {
        self.acc += dt;
        self.frames += 1;
        if let Some(g) = gpu {
            self.gpu_acc += g;
            self.gpu_frames += 1;
        }

        if self.acc < self.window {
            return None;
        }

        let report = FpsReport {
            fps: self.frames as f32 / self.acc,
            frame_ms: self.acc * 1000.0 / self.frames as f32,
            gpu_ms: (self.gpu_frames > 0)
                .then(|| self.gpu_acc.as_secs_f32() * 1000.0 / self.gpu_frames as f32),
        };
        *self = Self::new(self.window);
        Some(report)
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_window() {
        let mut c = FpsCounter::new(1.0);
        let mut reports = 0;
        for _ in 0..8 {
            if c.record(0.25, None).is_some() {
                reports += 1;
            }
        }
        assert_eq!(reports, 2);
    }

    #[test]
    fn averages_frame_and_gpu_time() {
        let mut c = FpsCounter::new(0.5);
        assert!(c.record(0.25, Some(Duration::from_millis(2))).is_none());
        let r = c.record(0.25, Some(Duration::from_millis(4))).unwrap();
        assert!((r.fps - 4.0).abs() < 1e-4);
        assert!((r.frame_ms - 250.0).abs() < 1e-3);
        assert!((r.gpu_ms.unwrap() - 3.0).abs() < 1e-3);
    }

    #[test]
    fn summary_omits_missing_gpu_time() {
        let r = FpsReport { fps: 60.0, frame_ms: 16.67, gpu_ms: None };
        assert_eq!(r.summary(), "60 fps | cpu 16.67 ms");
    }
}
