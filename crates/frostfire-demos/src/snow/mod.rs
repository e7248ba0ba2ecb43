//! Snowy castle: snow piles up on every surface the overhead camera sees, a
//! broom under the cursor sweeps grooves into it.
//!
//! Keys:
//! - `Tab` cycle display (final, field A, field B, overhead), `C` clear snow
//! - `PageUp` / `PageDown` double / halve the snow count
//! - `Minus` / `Equal` lower / raise the deposit per quantum
//! - `F` falling flakes, `G` snow coverage, `T` snow sheet, `W` wireframe
//! - `B` broom
//! - `Left` / `Right` move the light
//! - left drag orbits, wheel zooms

mod accumulator;
mod flakes;

use std::rc::Rc;

use frostfire_engine::camera::{CameraUniform, OrbitCamera, Projection};
use frostfire_engine::core::{App, AppControl, FrameCtx};
use frostfire_engine::device::Gpu;
use frostfire_engine::input::Key;
use frostfire_engine::render::{begin_pass, Blit, DepthBuffer, Mesh, MeshData, PassTarget};
use frostfire_sim::accumulation::{
    ortho_view_proj, snow_matrix, AccumulationSchedule, Slot, ORTHO_HALF_EXTENT, SNOW_MAX_DEPTH,
};
use frostfire_sim::picking::cursor_ray;
use glam::{Mat4, Vec2, Vec3};
use winit::dpi::PhysicalSize;

use crate::diagnostics::Diagnostics;
use crate::firework::CastleGrounds;
use crate::scene::{
    shapes, Light, LightsUniform, Material, ObjectId, Pattern, SceneObject, SceneParams, SceneRegistry,
    SceneRenderer, SceneView, Shading,
};
use crate::settings::SnowSettings;

pub use accumulator::{SnowAccumulator, ACCUMULATION_FORMAT, OVERHEAD_FORMAT};
pub use flakes::{spawn_flakes, SnowFlakes, FALL_HEIGHT};

const SKY: wgpu::Color = wgpu::Color {
    r: 0.55,
    g: 0.6,
    b: 0.68,
    a: 1.0,
};

/// Height the broom display floats above the picked ground point.
const BROOM_LIFT: f32 = 4.0;
/// Light orbit speed while an arrow key is held, radians per second.
const LIGHT_KEY_SPEED: f32 = 1.0;
/// Grid cells per side of the snow sheet.
const SNOW_TERRAIN_CELLS: u32 = 256;

/// Accumulation-side work recorded ahead of the visible pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SnowStep {
    /// Overhead color and depth; every frame, so coverage never lags.
    Overhead,
    Tick,
    Sweep,
    Clear,
}

/// This frame's steps in recording order.
fn snow_steps(tick: bool, sweep: bool, clear: bool) -> impl Iterator<Item = SnowStep> {
    [
        (true, SnowStep::Overhead),
        (tick, SnowStep::Tick),
        (sweep, SnowStep::Sweep),
        (clear, SnowStep::Clear),
    ]
    .into_iter()
    .filter_map(|(on, step)| on.then_some(step))
}

/// Shadings drawn in the visible pass; rebuilt when wireframe flips.
const FINAL_SHADINGS: [Shading; 3] = [Shading::Lit, Shading::Unlit, Shading::SnowTerrain];

/// What ends up on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnowDisplay {
    #[default]
    Final,
    Field(Slot),
    Overhead,
}

impl SnowDisplay {
    pub fn next(self) -> Self {
        match self {
            SnowDisplay::Final => SnowDisplay::Field(Slot::A),
            SnowDisplay::Field(Slot::A) => SnowDisplay::Field(Slot::B),
            SnowDisplay::Field(Slot::B) => SnowDisplay::Overhead,
            SnowDisplay::Overhead => SnowDisplay::Final,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SnowDisplay::Final => "Final",
            SnowDisplay::Field(Slot::A) => "Snow field A",
            SnowDisplay::Field(Slot::B) => "Snow field B",
            SnowDisplay::Overhead => "Overhead",
        }
    }
}

/// Point light on a sphere of radius 15; `angle` sweeps azimuth six times
/// faster than elevation.
pub fn light_position(angle: f32) -> Vec3 {
    let elevation = angle / 6.0;
    15.0 * Vec3::new(elevation.cos() * angle.sin(), elevation.sin(), elevation.cos() * angle.cos())
}

struct SnowScene {
    scene: SceneRenderer,
    registry: SceneRegistry,
    grounds: CastleGrounds,
    snow_terrain: ObjectId,
    light_marker: ObjectId,
    broom: ObjectId,
    broom_disc: ObjectId,
    view: SceneView,
    ortho: SceneView,
    depth: DepthBuffer,
    accumulator: SnowAccumulator,
    flakes: SnowFlakes,
    /// Indexed by the slot the lit pass samples.
    snow_groups: [wgpu::BindGroup; 2],
    blit: Blit,
}

impl SnowScene {
    fn new(gpu: &Gpu<'_>, settings: &SnowSettings, seed: u64) -> Self {
        let device = gpu.device();
        let queue = gpu.queue();
        let size = gpu.size();
        let format = gpu.surface_format();

        let mut scene = SceneRenderer::new(device);
        let mut registry = SceneRegistry::new();
        let grounds = CastleGrounds::build(device, &mut registry);

        let sheet = MeshData::plane(2.0 * ORTHO_HALF_EXTENT, SNOW_TERRAIN_CELLS);
        let sheet = Rc::new(Mesh::upload(device, "snow terrain", &sheet));
        let snow_terrain =
            registry.push(SceneObject::new(sheet, Mat4::IDENTITY, Material::phong(Vec3::splat(0.95))));

        let sphere = Rc::new(Mesh::upload(device, "sphere", &MeshData::uv_sphere(16, 12)));
        let light_marker = registry.push(SceneObject::new(sphere, Mat4::IDENTITY, Material::emissive(Vec3::ONE)));
        let broom_mesh = Rc::new(Mesh::upload(device, "broom", &shapes::broom()));
        let broom = registry.push(
            SceneObject::new(broom_mesh, Mat4::IDENTITY, Material::phong(Vec3::new(0.75, 0.55, 0.3)))
                .with_pattern(Pattern::Grain, 4.0),
        );
        let disc = Rc::new(Mesh::upload(device, "broom disc", &MeshData::cylinder(24)));
        let broom_disc = registry.push(SceneObject::new(disc, Mat4::IDENTITY, Material::emissive(Vec3::ZERO)));

        scene.set_wireframe(device, settings.wireframe);
        for shading in FINAL_SHADINGS {
            scene.prepare(device, shading, format);
        }
        scene.prepare(device, Shading::Overhead, OVERHEAD_FORMAT);
        scene.prepare(device, Shading::Broom, ACCUMULATION_FORMAT);

        let view = scene.create_view(device, "frostfire snow camera");
        let ortho = scene.create_view(device, "frostfire snow overhead camera");
        ortho.write(queue, &CameraUniform::new(Mat4::IDENTITY, ortho_view_proj(), Vec3::new(0.0, 50.0, 0.0)));

        let accumulator = SnowAccumulator::new(device, settings.deposit_amount);
        let snow_groups = [Slot::A, Slot::B].map(|slot| {
            scene.snow_bind_group(
                device,
                "frostfire snow coverage",
                accumulator.overhead_depth(),
                accumulator.field(slot).view(),
            )
        });
        let flakes = SnowFlakes::new(device, queue, view.camera(), settings.count(), seed);

        Self {
            scene,
            registry,
            grounds,
            snow_terrain,
            light_marker,
            broom,
            broom_disc,
            view,
            ortho,
            depth: DepthBuffer::new(device, "snow scene", (size.width, size.height)),
            accumulator,
            flakes,
            snow_groups,
            blit: Blit::new(),
        }
    }
}

/// The snowy castle application.
pub struct SnowDemo {
    settings: SnowSettings,
    seed: u64,
    display: SnowDisplay,
    schedule: AccumulationSchedule,
    camera: OrbitCamera,
    projection: Projection,
    broom_enabled: bool,
    clear_requested: bool,
    diagnostics: Diagnostics,
    state: Option<SnowScene>,
}

impl SnowDemo {
    pub fn new(settings: SnowSettings, seed: u64) -> Self {
        Self {
            schedule: AccumulationSchedule::new(settings.count().get()),
            settings,
            seed,
            display: SnowDisplay::Final,
            camera: OrbitCamera::new(0.0, 25f32.to_radians(), 30.0),
            projection: Projection::default(),
            broom_enabled: true,
            clear_requested: false,
            diagnostics: Diagnostics::new("snow"),
            state: None,
        }
    }

    fn handle_keys(&mut self, ctx: &FrameCtx<'_, '_>) {
        let pressed = |k| ctx.input_frame.key_pressed(k);

        if pressed(Key::Tab) {
            self.display = self.display.next();
            log::info!("display: {}", self.display.label());
        }
        if pressed(Key::C) {
            self.clear_requested = true;
            log::info!("snow cleared");
        }
        if pressed(Key::PageUp) || pressed(Key::PageDown) {
            let count = self.settings.count();
            let next = if pressed(Key::PageUp) { count.step_up() } else { count.step_down() };
            self.settings.snow_count = next.get();
        }
        if pressed(Key::Equal) || pressed(Key::Minus) {
            let factor = if pressed(Key::Equal) { 2.0 } else { 0.5 };
            self.settings.deposit_amount = (self.settings.deposit_amount * factor).clamp(0.000_5, 1.0);
            log::info!("deposit per quantum: {:.4}", self.settings.deposit_amount);
        }
        if pressed(Key::F) {
            self.settings.show_snow = !self.settings.show_snow;
        }
        if pressed(Key::G) {
            self.settings.show_snow_layer = !self.settings.show_snow_layer;
        }
        if pressed(Key::T) {
            self.settings.show_snow_terrain = !self.settings.show_snow_terrain;
        }
        if pressed(Key::W) {
            self.settings.wireframe = !self.settings.wireframe;
        }
        if pressed(Key::B) {
            self.broom_enabled = !self.broom_enabled;
            log::info!("broom {}", if self.broom_enabled { "on" } else { "off" });
        }

        let mut spin = self.settings.light_speed.to_radians();
        if ctx.input.key_down(Key::ArrowLeft) {
            spin -= LIGHT_KEY_SPEED;
        }
        if ctx.input.key_down(Key::ArrowRight) {
            spin += LIGHT_KEY_SPEED;
        }
        self.settings.light_angle = (self.settings.light_angle + spin * ctx.time.dt).rem_euclid(std::f32::consts::TAU);
    }

    /// Ground point under the cursor, if the cursor is over the window and
    /// the ray hits the ground ahead of the camera.
    fn pick_ground(&self, ctx: &FrameCtx<'_, '_>, camera: &CameraUniform) -> Option<Vec3> {
        let (x, y) = ctx.input.pointer_pos?;
        let (w, h) = ctx.window.logical_size();
        let ray = cursor_ray(Vec2::new(x, y), Vec2::new(w, h), camera.view_proj())?;
        ray.intersect_plane_y(0.0)
    }
}

impl App for SnowDemo {
    fn on_resize(&mut self, gpu: &Gpu<'_>, size: PhysicalSize<u32>) {
        if let Some(state) = self.state.as_mut() {
            state.depth.resize(gpu.device(), (size.width, size.height));
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.state.is_none() {
            self.state = Some(SnowScene::new(ctx.gpu, &self.settings, self.seed));
            self.schedule.resync(ctx.time.elapsed_ms());
        }
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        self.camera.update(ctx.input, ctx.input_frame);
        self.handle_keys(ctx);

        let aspect = ctx.gpu.aspect();
        let camera = CameraUniform::new(self.camera.view(), self.projection.matrix(aspect), self.camera.eye());
        let hit = self.pick_ground(ctx, &camera);
        let count = self.settings.count();
        if self.schedule.set_snow_count(count.get()) {
            log::info!("snow quantum: {:.1} ms", self.schedule.quantum_ms());
        }
        let tick = self.schedule.poll(ctx.time.elapsed_ms());
        let clear = std::mem::take(&mut self.clear_requested);
        let sweep = self.broom_enabled && hit.is_some();

        let Some(state) = self.state.as_mut() else {
            return AppControl::Continue;
        };
        let device = ctx.gpu.device();
        let queue = ctx.gpu.queue();
        let format = ctx.gpu.surface_format();

        if state.flakes.count() != count {
            state.flakes.respawn(queue, count);
        }
        state.accumulator.set_deposit_amount(self.settings.deposit_amount);
        self.settings.wireframe = state.scene.set_wireframe(device, self.settings.wireframe);
        for shading in FINAL_SHADINGS {
            state.scene.prepare(device, shading, format);
        }

        let light = light_position(self.settings.light_angle);
        state.registry.get_mut(state.light_marker).model =
            Mat4::from_translation(light) * Mat4::from_scale(Vec3::splat(0.2));
        if let Some(p) = hit {
            state.registry.get_mut(state.broom).model =
                Mat4::from_translation(p + Vec3::Y * BROOM_LIFT) * Mat4::from_scale(Vec3::splat(4.0));
            let radius = self.settings.broom_radius;
            state.registry.get_mut(state.broom_disc).model =
                Mat4::from_translation(p) * Mat4::from_scale(Vec3::new(radius, 0.05, radius));
        }
        state.scene.write_objects(device, queue, &state.registry);
        state.scene.write_lights(
            queue,
            &LightsUniform::new(Vec3::ZERO, &[Light::point(light, Vec3::splat(0.1), Vec3::splat(0.9), Vec3::ONE)]),
        );
        let mut params = SceneParams::default();
        if self.settings.show_snow_layer {
            params = params.with_snow(snow_matrix(), SNOW_MAX_DEPTH);
        }
        state.scene.write_params(queue, &params);
        state.view.write(queue, &camera);
        state.flakes.prepare(device, queue, format, ctx.time.elapsed as f32);

        let (display, show_flakes) = (self.display, self.settings.show_snow);
        let show_terrain = self.settings.show_snow_terrain;
        let SnowScene {
            scene,
            registry,
            grounds,
            snow_terrain,
            light_marker,
            broom,
            broom_disc,
            view,
            ortho,
            depth,
            accumulator,
            flakes,
            snow_groups,
            blit,
        } = state;

        let control = ctx.render(|rctx, target| {
            for step in snow_steps(tick, sweep, clear) {
                match step {
                    SnowStep::Overhead => {
                        let mut pass = accumulator.begin_overhead(target.encoder);
                        scene.draw(&mut pass, ortho, None, Shading::Overhead, OVERHEAD_FORMAT, registry, &grounds.all());
                    }
                    SnowStep::Tick => accumulator.tick(rctx.queue, target.encoder),
                    SnowStep::Sweep => {
                        let mut pass = accumulator.sweep(target.encoder);
                        scene.draw(&mut pass, ortho, None, Shading::Broom, ACCUMULATION_FORMAT, registry, &[*broom_disc]);
                    }
                    SnowStep::Clear => accumulator.clear(target.encoder),
                }
            }

            match display {
                SnowDisplay::Final => {
                    let mut pass = begin_pass(
                        target.encoder,
                        "snow final",
                        PassTarget::cleared(target.color_view, Some(depth.view()), SKY),
                    );
                    let snow = &snow_groups[accumulator.latest_slot().index()];
                    scene.draw(&mut pass, view, Some(snow), Shading::Lit, format, registry, &grounds.all());
                    if show_terrain {
                        scene.draw(&mut pass, view, Some(snow), Shading::SnowTerrain, format, registry, &[*snow_terrain]);
                    }
                    scene.draw(&mut pass, view, None, Shading::Lit, format, registry, &[*broom]);
                    scene.draw(&mut pass, view, None, Shading::Unlit, format, registry, &[*light_marker]);
                    if show_flakes {
                        flakes.draw(&mut pass);
                    }
                }
                SnowDisplay::Field(slot) => {
                    let source = accumulator.field(slot).view();
                    blit.draw(rctx, target.encoder, source, target.color_view, rctx.surface_format, true);
                }
                SnowDisplay::Overhead => {
                    let source = accumulator.overhead().view();
                    blit.draw(rctx, target.encoder, source, target.color_view, rctx.surface_format, false);
                }
            }
        });

        let status = format!(
            "{} | {} flakes | {} ticks",
            self.display.label(),
            count,
            self.schedule.ticks()
        );
        self.diagnostics.frame(ctx, &status);
        control
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── display ───────────────────────────────────────────────────────────

    #[test]
    fn display_cycles_through_every_view() {
        let mut d = SnowDisplay::default();
        let mut seen = vec![d];
        for _ in 0..3 {
            d = d.next();
            seen.push(d);
        }
        assert_eq!(
            seen,
            vec![
                SnowDisplay::Final,
                SnowDisplay::Field(Slot::A),
                SnowDisplay::Field(Slot::B),
                SnowDisplay::Overhead
            ]
        );
        assert_eq!(d.next(), SnowDisplay::Final);
    }

    // ── frame steps ───────────────────────────────────────────────────────

    #[test]
    fn overhead_runs_every_frame() {
        assert_eq!(snow_steps(false, false, false).collect::<Vec<_>>(), vec![SnowStep::Overhead]);
    }

    #[test]
    fn steps_keep_overhead_tick_sweep_clear_order() {
        assert_eq!(
            snow_steps(true, true, true).collect::<Vec<_>>(),
            vec![SnowStep::Overhead, SnowStep::Tick, SnowStep::Sweep, SnowStep::Clear]
        );
        assert_eq!(
            snow_steps(false, true, false).collect::<Vec<_>>(),
            vec![SnowStep::Overhead, SnowStep::Sweep]
        );
    }

    // ── light ─────────────────────────────────────────────────────────────

    #[test]
    fn light_stays_on_its_sphere() {
        for a in [0.0, 1.0, 3.0, std::f32::consts::TAU] {
            assert!((light_position(a).length() - 15.0).abs() < 1e-3);
        }
    }

    #[test]
    fn light_starts_at_the_horizon_facing_z() {
        let p = light_position(0.0);
        assert!((p - Vec3::new(0.0, 0.0, 15.0)).length() < 1e-5);
    }

    #[test]
    fn full_turn_raises_the_light() {
        assert!(light_position(std::f32::consts::TAU).y > 8.0);
    }
}
