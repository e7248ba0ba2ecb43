use frostfire_engine::core::FrameCtx;
use frostfire_engine::time::{FpsCounter, FpsReport};

/// Once-per-second frame statistics in the log and the window title.
pub struct Diagnostics {
    name: &'static str,
    fps: FpsCounter,
}

impl Diagnostics {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fps: FpsCounter::new(1.0),
        }
    }

    /// Records this frame. `status` is appended to the title when a report is due.
    pub fn frame(&mut self, ctx: &FrameCtx<'_, '_>, status: &str) {
        let Some(report) = self.fps.record(ctx.time.dt, ctx.gpu.last_gpu_time()) else {
            return;
        };
        log::info!("{}: {}", self.name, report.summary());
        ctx.window.set_title(&title(self.name, &report, status));
    }
}

fn title(name: &str, report: &FpsReport, status: &str) -> String {
    if status.is_empty() {
        format!("frostfire {name} | {}", report.summary())
    } else {
        format!("frostfire {name} | {} | {status}", report.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_carries_status_when_present() {
        let r = FpsReport { fps: 60.0, frame_ms: 16.67, gpu_ms: None };
        assert_eq!(title("snow", &r, ""), "frostfire snow | 60 fps | cpu 16.67 ms");
        assert!(title("snow", &r, "Final").ends_with("| Final"));
    }
}
