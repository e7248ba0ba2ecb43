//! Demo tunables, loadable from JSON. Missing fields take their defaults.

use frostfire_sim::forest::ForestParams;
use frostfire_sim::particles::{FireworkParams, ParticleCount};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    /// Seed for every random layout (forest, snowflakes, blinking lamp).
    pub seed: u64,
    pub firework: FireworkSettings,
    pub snow: SnowSettings,
    pub car: CarSettings,
}

impl DemoSettings {
    /// Reseeds every random layout.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.car.forest.seed = seed;
        self
    }

    /// Clamps every field into the range the key bindings can reach.
    pub fn sanitized(mut self) -> Self {
        self.firework.params = self.firework.params.sanitized();
        self.firework.mirror_factor = self.firework.mirror_factor.clamp(0.0, 1.0);
        self.firework.particle_count = round_count(self.firework.particle_count);
        self.snow.snow_count = round_count(self.snow.snow_count);
        self.snow.deposit_amount = self.snow.deposit_amount.clamp(0.0, 1.0);
        self.snow.broom_radius = self.snow.broom_radius.max(0.0);
        self.car.toon_levels = self.car.toon_levels.clamp(4, 20);
        self.car.forest.count = self.car.forest.count.clamp(1, 1500);
        self
    }
}

/// Nearest valid particle count at or below `count` (clamped into range).
fn round_count(count: u32) -> u32 {
    let clamped = count.clamp(ParticleCount::MIN.get(), ParticleCount::MAX.get());
    ParticleCount::from_exponent(31 - clamped.leading_zeros()).get()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireworkSettings {
    pub params: FireworkParams,
    pub particle_count: u32,
    /// Strength of the lake reflection in the combine pass.
    pub mirror_factor: f32,
    /// Step particles on the host and upload them instead of dispatching the kernel.
    pub cpu_particles: bool,
}

impl Default for FireworkSettings {
    fn default() -> Self {
        Self {
            params: FireworkParams::default(),
            particle_count: 256,
            mirror_factor: 0.8,
            cpu_particles: false,
        }
    }
}

impl FireworkSettings {
    pub fn count(&self) -> ParticleCount {
        ParticleCount::new(round_count(self.particle_count)).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowSettings {
    pub snow_count: u32,
    /// Depth added per quantum on open surfaces.
    pub deposit_amount: f32,
    /// World-space radius of the broom groove.
    pub broom_radius: f32,
    /// Orbit angle of the point light, radians.
    pub light_angle: f32,
    /// Degrees per second the light angle advances while auto-orbit is on.
    pub light_speed: f32,
    /// Falling flakes.
    pub show_snow: bool,
    /// Accumulated snow on lit surfaces.
    pub show_snow_layer: bool,
    /// Displaced snow sheet built from the accumulation field.
    pub show_snow_terrain: bool,
    /// Line polygons in the visible pass, where the device supports them.
    pub wireframe: bool,
}

impl Default for SnowSettings {
    fn default() -> Self {
        Self {
            snow_count: 2048,
            deposit_amount: 0.01,
            broom_radius: 0.6,
            light_angle: std::f32::consts::TAU,
            light_speed: 0.0,
            show_snow: true,
            show_snow_layer: true,
            show_snow_terrain: true,
            wireframe: false,
        }
    }
}

impl SnowSettings {
    pub fn count(&self) -> ParticleCount {
        ParticleCount::new(round_count(self.snow_count)).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarSettings {
    pub forest: ForestParams,
    pub fog: bool,
    pub fog_density: f32,
    pub toon_shading: bool,
    pub toon_levels: u32,
    pub night_vision: bool,
    /// Seconds between coin flips of the blinking lamp.
    pub blink_interval: f32,
    /// Start in the first-person camera.
    pub first_person: bool,
}

impl Default for CarSettings {
    fn default() -> Self {
        Self {
            forest: ForestParams::default(),
            fog: false,
            fog_density: 0.15,
            toon_shading: false,
            toon_levels: 10,
            night_vision: false,
            blink_interval: 0.5,
            first_person: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── serde ─────────────────────────────────────────────────────────────

    #[test]
    fn empty_object_is_default() {
        let s: DemoSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(s, DemoSettings::default());
    }

    #[test]
    fn partial_nested_fields_keep_other_defaults() {
        let s: DemoSettings = serde_json::from_str(
            r#"{ "seed": 7, "firework": { "mirror_factor": 0.3, "params": { "lifespan": 8.0 } } }"#,
        )
        .unwrap();
        assert_eq!(s.seed, 7);
        assert_eq!(s.firework.mirror_factor, 0.3);
        assert_eq!(s.firework.params.lifespan, 8.0);
        assert_eq!(s.firework.params.gravity, -9.81);
        assert_eq!(s.firework.particle_count, 256);
        assert_eq!(s.snow, SnowSettings::default());
    }

    #[test]
    fn settings_round_trip_through_json() {
        let mut s = DemoSettings::default();
        s.car.fog = true;
        s.snow.snow_count = 4096;
        let text = serde_json::to_string(&s).unwrap();
        assert_eq!(serde_json::from_str::<DemoSettings>(&text).unwrap(), s);
    }

    // ── sanitizing ────────────────────────────────────────────────────────

    #[test]
    fn counts_round_down_to_powers_of_two() {
        let mut s = DemoSettings::default();
        s.firework.particle_count = 3000;
        s.snow.snow_count = 1;
        let s = s.sanitized();
        assert_eq!(s.firework.particle_count, 2048);
        assert_eq!(s.snow.snow_count, 256);
    }

    #[test]
    fn oversized_count_is_capped() {
        let mut s = FireworkSettings::default();
        s.particle_count = u32::MAX;
        assert_eq!(s.count(), ParticleCount::MAX);
    }

    #[test]
    fn snow_sheet_on_and_wireframe_off_by_default() {
        let s: SnowSettings = serde_json::from_str(r#"{ "show_snow_layer": false }"#).unwrap();
        assert!(s.show_snow_terrain);
        assert!(!s.wireframe);
        assert!(!s.show_snow_layer);
    }

    #[test]
    fn with_seed_reaches_the_forest() {
        let s = DemoSettings::default().with_seed(42);
        assert_eq!(s.seed, 42);
        assert_eq!(s.car.forest.seed, 42);
    }

    #[test]
    fn mirror_factor_is_clamped() {
        let mut s = DemoSettings::default();
        s.firework.mirror_factor = 3.0;
        assert_eq!(s.sanitized().firework.mirror_factor, 1.0);
    }
}
