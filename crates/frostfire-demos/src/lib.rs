//! The three frostfire demos on top of `frostfire-engine`.
//!
//! | Demo | Module | Shows |
//! |------|--------|-------|
//! | car | [`car`] | forest, street lamps, spot lights, fog / toon / night vision |
//! | firework | [`firework`] | compute-shader fireworks, reflection + mask + combine passes |
//! | snow | [`snow`] | ping-pong snow accumulation, broom picking, falling flakes |
//!
//! Every demo builds its GPU state on the first frame and owns it from then
//! on; [`run`] only picks one and hands it to the runtime.

pub mod car;
pub mod diagnostics;
pub mod firework;
pub mod scene;
pub mod settings;
pub mod snow;

use std::fmt;

use anyhow::Result;
use frostfire_engine::device::GpuInit;
use frostfire_engine::window::{Runtime, RuntimeConfig};

pub use settings::{CarSettings, DemoSettings, FireworkSettings, SnowSettings};

/// Which demo to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoKind {
    Car,
    Firework,
    Snow,
}

impl DemoKind {
    pub fn title(self) -> &'static str {
        match self {
            DemoKind::Car => "frostfire car",
            DemoKind::Firework => "frostfire firework castle",
            DemoKind::Snow => "frostfire snowy castle",
        }
    }
}

impl fmt::Display for DemoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DemoKind::Car => "car",
            DemoKind::Firework => "firework",
            DemoKind::Snow => "snow",
        })
    }
}

/// Opens the window for `kind` and runs it until it exits.
pub fn run(kind: DemoKind, settings: DemoSettings) -> Result<()> {
    let config = RuntimeConfig {
        title: kind.title().to_string(),
        ..RuntimeConfig::default()
    };
    // Frame times in the title come from blocking on the queue each frame.
    // Wireframe in the snow scene needs line polygons where available.
    let gpu = GpuInit {
        measure_frame_time: true,
        optional_features: wgpu::Features::POLYGON_MODE_LINE,
        ..GpuInit::default()
    };

    log::info!("starting {kind} demo (seed {})", settings.seed);
    match kind {
        DemoKind::Car => Runtime::run(config, gpu, car::CarDemo::new(settings.car, settings.seed)),
        DemoKind::Firework => Runtime::run(config, gpu, firework::FireworkDemo::new(settings.firework)),
        DemoKind::Snow => Runtime::run(config, gpu, snow::SnowDemo::new(settings.snow, settings.seed)),
    }
}
