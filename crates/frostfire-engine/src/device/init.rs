/// How the runtime sets up the adapter, device and surface.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends to try. Defaults to `WGPU_BACKEND` when set, all otherwise.
    pub backends: wgpu::Backends,
    pub power_preference: wgpu::PowerPreference,

    /// Pick an sRGB swapchain format when the surface offers one.
    pub prefer_srgb: bool,
    pub present_mode: wgpu::PresentMode,
    /// Falls back to the first supported mode when unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    pub desired_maximum_frame_latency: u32,

    pub required_features: wgpu::Features,
    /// Requested only where the adapter offers them.
    pub optional_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Wait for the queue after every frame and report the wait as GPU time.
    pub measure_frame_time: bool,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::from_env().unwrap_or(wgpu::Backends::all()),
            power_preference: wgpu::PowerPreference::HighPerformance,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            desired_maximum_frame_latency: 2,
            required_features: wgpu::Features::empty(),
            optional_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            measure_frame_time: false,
        }
    }
}

impl GpuInit {
    /// Features to request from an adapter offering `available`.
    pub(crate) fn device_features(&self, available: wgpu::Features) -> wgpu::Features {
        self.required_features | (self.optional_features & available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_vsync_without_timing() {
        let init = GpuInit::default();
        assert_eq!(init.present_mode, wgpu::PresentMode::Fifo);
        assert!(!init.measure_frame_time);
        assert!(init.required_features.is_empty());
    }

    #[test]
    fn optional_features_only_where_offered() {
        let init = GpuInit {
            optional_features: wgpu::Features::POLYGON_MODE_LINE,
            ..GpuInit::default()
        };
        assert_eq!(init.device_features(wgpu::Features::empty()), wgpu::Features::empty());
        assert_eq!(
            init.device_features(wgpu::Features::POLYGON_MODE_LINE | wgpu::Features::DEPTH_CLIP_CONTROL),
            wgpu::Features::POLYGON_MODE_LINE
        );
    }
}
